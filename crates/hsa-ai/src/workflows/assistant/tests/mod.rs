mod common;

mod chunker;

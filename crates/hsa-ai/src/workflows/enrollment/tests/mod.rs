mod common;

mod matchers;

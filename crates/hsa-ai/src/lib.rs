//! Core library for the HSA enrollment automation service.
//!
//! Two independent pipelines live under [`workflows`]: the enrollment
//! decision pipeline (field validation, risk scoring, business-rule
//! adjudication, audit trail) and the assistant pipeline (knowledge-base
//! chunking, vector retrieval, answer generation with citations).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

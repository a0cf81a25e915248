//! HSA enrollment decision pipeline.
//!
//! Declared application data is cross-validated against OCR-extracted
//! document fields, validation failures are aggregated into a weighted risk
//! score, and ordered business rules turn that into an approve / reject /
//! manual-review decision. Every decision is appended to an audit trail
//! together with the input snapshot that produced it.

pub mod audit;
pub mod domain;
pub mod engine;
pub(crate) mod matchers;
pub mod risk;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use audit::{
    AuditEntry, AuditError, AuditService, AuditStore, InMemoryAuditStore, ENGINE_VERSION,
};
pub use domain::{
    ApplicationData, ApplicationId, DecisionConfig, DecisionConfigError, DecisionKind,
    DecisionResult, DocumentExtract, ValidationKind, ValidationResult,
};
pub use engine::{DecisionEngine, DecisionEngineError};
pub use risk::{
    aggregate_risk, weight_for, RiskFactor, RiskKind, DEFAULT_RISK_WEIGHT, RISK_WEIGHTS,
};
pub use router::enrollment_router;
pub use service::{EnrollmentService, EnrollmentServiceError};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for enrollment applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Field names a government ID extract may carry for the address comparison.
pub(crate) const ADDRESS_FIELDS: [&str; 4] = [
    "address_street",
    "address_city",
    "address_state",
    "address_zip",
];

/// Structured payload produced by the OCR collaborator for one document:
/// extracted field values plus a per-field extraction confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtract {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub confidence: BTreeMap<String, f32>,
}

impl DocumentExtract {
    /// Returns the named field, treating blank values as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn has_address_fields(&self) -> bool {
        ADDRESS_FIELDS.iter().any(|name| self.field(name).is_some())
    }
}

/// Applicant-declared data plus any extracted document payloads, snapshotted
/// for one decision evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationData {
    pub application_id: ApplicationId,
    pub full_name: String,
    pub date_of_birth: String,
    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_zip: String,
    pub social_security_number: String,
    pub employer_name: String,
    #[serde(default)]
    pub government_id: Option<DocumentExtract>,
    #[serde(default)]
    pub employer_document: Option<DocumentExtract>,
}

/// Kinds of field-level validation the decision pipeline performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    NameMatch,
    DobMatch,
    AddressMatch,
    IdExpiry,
    EmployerMatch,
    DocumentQuality,
}

/// Outcome of comparing one declared field against its extracted counterpart.
/// Field-level problems never escape as errors; they become an invalid result
/// with an explanatory detail string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub field_name: String,
    pub kind: ValidationKind,
    pub is_valid: bool,
    pub confidence: f32,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_value: Option<String>,
}

/// Terminal decision outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Approve,
    Reject,
    ManualReview,
}

impl DecisionKind {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionKind::Approve => "approve",
            DecisionKind::Reject => "reject",
            DecisionKind::ManualReview => "manual_review",
        }
    }
}

/// Tunable thresholds for the decision rules.
///
/// No cross-field relation is enforced between the approve and review
/// thresholds; a risk score between them falls through to manual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    pub name_match_threshold: f32,
    pub auto_approve_threshold: f32,
    pub manual_review_threshold: f32,
    pub expired_id_auto_reject: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            name_match_threshold: 0.7,
            auto_approve_threshold: 0.1,
            manual_review_threshold: 0.3,
            expired_id_auto_reject: true,
        }
    }
}

impl DecisionConfig {
    pub fn validate(&self) -> Result<(), DecisionConfigError> {
        for (name, value) in [
            ("name_match_threshold", self.name_match_threshold),
            ("auto_approve_threshold", self.auto_approve_threshold),
            ("manual_review_threshold", self.manual_review_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DecisionConfigError::OutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// Error raised when a decision config update falls outside [0, 1].
#[derive(Debug, thiserror::Error)]
pub enum DecisionConfigError {
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    OutOfRange { name: &'static str, value: f32 },
}

impl DecisionConfigError {
    pub fn name(&self) -> &'static str {
        match self {
            DecisionConfigError::OutOfRange { name, .. } => name,
        }
    }
}

/// Immutable outcome of one application evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub application_id: ApplicationId,
    pub decision: DecisionKind,
    pub risk_score: f32,
    pub reasoning: String,
    pub validations: Vec<ValidationResult>,
    pub decided_at: DateTime<Utc>,
}

use chrono::{Local, NaiveDate, Utc};
use tracing::info;

use super::domain::{
    ApplicationData, DecisionConfig, DecisionKind, DecisionResult, ValidationKind, ValidationResult,
};
use super::matchers;
use super::risk::{aggregate_risk, RiskFactor, RiskKind};

/// Error raised for malformed top-level input. Field-level problems never
/// surface here; they are recorded as failed validations instead.
#[derive(Debug, thiserror::Error)]
pub enum DecisionEngineError {
    #[error("application is missing an identifier")]
    MissingApplicationId,
}

/// Stateless evaluator applying the ordered business rules to one
/// application snapshot.
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn evaluate(&self, data: &ApplicationData) -> Result<DecisionResult, DecisionEngineError> {
        self.evaluate_at(data, Local::now().date_naive())
    }

    /// Evaluation with an explicit "today" so expiry boundaries are testable.
    pub fn evaluate_at(
        &self,
        data: &ApplicationData,
        today: NaiveDate,
    ) -> Result<DecisionResult, DecisionEngineError> {
        if data.application_id.0.trim().is_empty() {
            return Err(DecisionEngineError::MissingApplicationId);
        }

        let mut validations = Vec::new();
        let mut factors = Vec::new();

        if let Some(id) = &data.government_id {
            let expiry = matchers::check_id_expiry(id, today);
            if !expiry.is_valid && self.config.expired_id_auto_reject {
                factors.push(RiskFactor::new(RiskKind::ExpiredId, 1.0));
            }
            validations.push(expiry);

            let name = matchers::match_name(
                &data.full_name,
                id.field("full_name"),
                self.config.name_match_threshold,
            );
            if !name.is_valid {
                factors.push(RiskFactor::new(
                    RiskKind::NameMismatch,
                    1.0 - name.confidence,
                ));
            }
            validations.push(name);

            let dob = matchers::match_dob(&data.date_of_birth, id.field("date_of_birth"));
            if !dob.is_valid {
                factors.push(RiskFactor::new(RiskKind::DobMismatch, 1.0));
            }
            validations.push(dob);

            if id.has_address_fields() {
                let address = matchers::match_address(data, id);
                if !address.is_valid {
                    factors.push(RiskFactor::new(
                        RiskKind::AddressMismatch,
                        1.0 - address.confidence,
                    ));
                }
                validations.push(address);
            }
        }

        if let Some(document) = &data.employer_document {
            let employer =
                matchers::match_employer(&data.employer_name, document.field("employer_name"));
            if !employer.is_valid {
                factors.push(RiskFactor::new(
                    RiskKind::EmployerMismatch,
                    1.0 - employer.confidence,
                ));
            }
            validations.push(employer);
        }

        let risk_score = aggregate_risk(&factors);
        let decision = decide(&validations, risk_score, &self.config);
        let reasoning = build_reasoning(&validations, &factors, decision);

        info!(
            application_id = %data.application_id.0,
            decision = decision.label(),
            risk_score = format!("{risk_score:.3}"),
            "application evaluated"
        );

        Ok(DecisionResult {
            application_id: data.application_id.clone(),
            decision,
            risk_score,
            reasoning,
            validations,
            decided_at: Utc::now(),
        })
    }
}

/// Ordered rule cascade; the first matching rule wins.
pub(crate) fn decide(
    validations: &[ValidationResult],
    risk_score: f32,
    config: &DecisionConfig,
) -> DecisionKind {
    let expired_id = validations
        .iter()
        .any(|validation| validation.kind == ValidationKind::IdExpiry && !validation.is_valid);
    if expired_id && config.expired_id_auto_reject {
        return DecisionKind::Reject;
    }

    if risk_score >= config.manual_review_threshold {
        return DecisionKind::ManualReview;
    }

    if validations.iter().any(|validation| !validation.is_valid) {
        return DecisionKind::ManualReview;
    }

    if risk_score <= config.auto_approve_threshold {
        return DecisionKind::Approve;
    }

    // Risk between the two thresholds with all validations valid: a grey
    // zone that always goes to a human.
    DecisionKind::ManualReview
}

fn build_reasoning(
    validations: &[ValidationResult],
    factors: &[RiskFactor],
    decision: DecisionKind,
) -> String {
    let mut reasons: Vec<String> = Vec::new();

    match decision {
        DecisionKind::Reject => {
            let expired_id = validations
                .iter()
                .any(|validation| validation.kind == ValidationKind::IdExpiry && !validation.is_valid);
            if expired_id {
                reasons.push("Government ID is expired".to_string());
            }
        }
        DecisionKind::ManualReview => {
            let failed: Vec<&ValidationResult> = validations
                .iter()
                .filter(|validation| !validation.is_valid)
                .collect();
            for validation in &failed {
                reasons.push(format!("{}: {}", validation.field_name, validation.details));
            }
            if failed.is_empty() && !factors.is_empty() {
                reasons.push("Moderate risk score requires human review".to_string());
            }
        }
        DecisionKind::Approve => {
            reasons.push("All validation checks passed".to_string());
            let passed = validations
                .iter()
                .filter(|validation| validation.is_valid)
                .count();
            if passed > 0 {
                reasons.push(format!("Validated {passed} data points successfully"));
            }
        }
    }

    if reasons.is_empty() {
        reasons.push("Decision based on configured business rules".to_string());
    }

    reasons.join(". ") + "."
}

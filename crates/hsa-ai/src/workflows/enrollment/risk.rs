use serde::{Deserialize, Serialize};

/// Named signal of decision uncertainty derived from one failed or
/// low-confidence validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    ExpiredId,
    NameMismatch,
    DobMismatch,
    AddressMismatch,
    EmployerMismatch,
    DocumentQuality,
}

/// Per-kind weights for risk aggregation. Kept as an explicit table so the
/// weighting is testable independently of the decision control flow.
pub const RISK_WEIGHTS: &[(RiskKind, f32)] = &[
    (RiskKind::ExpiredId, 1.0),
    (RiskKind::NameMismatch, 0.8),
    (RiskKind::DobMismatch, 0.9),
    (RiskKind::AddressMismatch, 0.3),
    (RiskKind::EmployerMismatch, 0.4),
];

/// Weight applied to kinds absent from [`RISK_WEIGHTS`].
pub const DEFAULT_RISK_WEIGHT: f32 = 0.5;

pub fn weight_for(kind: RiskKind) -> f32 {
    RISK_WEIGHTS
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_RISK_WEIGHT)
}

/// One contribution to the aggregate risk score. Magnitude is typically
/// `1 - confidence` of the failed validation and always lies in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskFactor {
    pub kind: RiskKind,
    pub magnitude: f32,
}

impl RiskFactor {
    pub fn new(kind: RiskKind, magnitude: f32) -> Self {
        Self { kind, magnitude }
    }
}

/// Weighted average of the factor magnitudes, clamped to 1.0. Passed
/// validations contribute nothing; an empty set scores exactly 0.0.
pub fn aggregate_risk(factors: &[RiskFactor]) -> f32 {
    if factors.is_empty() {
        return 0.0;
    }

    let mut total_risk = 0.0;
    let mut total_weight = 0.0;
    for factor in factors {
        let weight = weight_for(factor.kind);
        total_risk += factor.magnitude * weight;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return 0.0;
    }

    (total_risk / total_weight).min(1.0)
}

use std::sync::{Arc, RwLock};

use super::audit::{AuditEntry, AuditError, AuditService, AuditStore};
use super::domain::{
    ApplicationData, ApplicationId, DecisionConfig, DecisionConfigError, DecisionResult,
};
use super::engine::{DecisionEngine, DecisionEngineError};

/// Service composing the decision engine and the audit trail. The decision
/// config can be read and replaced at runtime; each evaluation sees a
/// consistent snapshot of it.
pub struct EnrollmentService<S> {
    config: RwLock<DecisionConfig>,
    audit: AuditService<S>,
}

impl<S: AuditStore> EnrollmentService<S> {
    pub fn new(store: Arc<S>, config: DecisionConfig) -> Self {
        Self {
            config: RwLock::new(config),
            audit: AuditService::new(store),
        }
    }

    /// Evaluate an application and append the outcome to the audit trail.
    pub fn decide(&self, data: ApplicationData) -> Result<DecisionResult, EnrollmentServiceError> {
        let engine = DecisionEngine::new(self.config());
        let result = engine.evaluate(&data)?;
        self.audit.record(&result, &data)?;
        Ok(result)
    }

    pub fn audit_trail(
        &self,
        id: &ApplicationId,
    ) -> Result<Vec<AuditEntry>, EnrollmentServiceError> {
        Ok(self.audit.trail(id)?)
    }

    pub fn config(&self) -> DecisionConfig {
        self.config.read().expect("config lock poisoned").clone()
    }

    pub fn update_config(&self, config: DecisionConfig) -> Result<(), EnrollmentServiceError> {
        config.validate()?;
        *self.config.write().expect("config lock poisoned") = config;
        Ok(())
    }
}

/// Error raised by the enrollment service.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentServiceError {
    #[error(transparent)]
    Engine(#[from] DecisionEngineError),
    #[error(transparent)]
    Config(#[from] DecisionConfigError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

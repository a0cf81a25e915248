use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationData, ApplicationId, DecisionKind, DecisionResult, ValidationResult,
};

/// Version string recorded with every audit entry.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Immutable record of one decision and the exact inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub application_id: ApplicationId,
    pub decision: DecisionKind,
    pub risk_score: f32,
    pub reasoning: String,
    pub validations: Vec<ValidationResult>,
    pub application_snapshot: ApplicationData,
    pub recorded_at: DateTime<Utc>,
    pub engine_version: String,
}

/// Append-only storage abstraction for the decision trail. No mutation or
/// deletion is exposed.
pub trait AuditStore: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;
    fn trail(&self, id: &ApplicationId) -> Result<Vec<AuditEntry>, AuditError>;
}

/// Error enumeration for audit storage failures.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory store keeping per-application trails in insertion order.
#[derive(Default, Clone)]
pub struct InMemoryAuditStore {
    entries: Arc<Mutex<HashMap<ApplicationId, Vec<AuditEntry>>>>,
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut guard = self.entries.lock().expect("audit mutex poisoned");
        guard
            .entry(entry.application_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    fn trail(&self, id: &ApplicationId) -> Result<Vec<AuditEntry>, AuditError> {
        let guard = self.entries.lock().expect("audit mutex poisoned");
        Ok(guard.get(id).cloned().unwrap_or_default())
    }
}

/// Records decisions with their input snapshot, tagged with the engine
/// version that produced them.
pub struct AuditService<S> {
    store: Arc<S>,
    engine_version: String,
}

impl<S: AuditStore> AuditService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }

    pub fn record(
        &self,
        result: &DecisionResult,
        snapshot: &ApplicationData,
    ) -> Result<AuditEntry, AuditError> {
        let entry = AuditEntry {
            application_id: result.application_id.clone(),
            decision: result.decision,
            risk_score: result.risk_score,
            reasoning: result.reasoning.clone(),
            validations: result.validations.clone(),
            application_snapshot: snapshot.clone(),
            recorded_at: Utc::now(),
            engine_version: self.engine_version.clone(),
        };
        self.store.append(entry.clone())?;
        Ok(entry)
    }

    /// Chronological trail for one application; empty when none exist.
    pub fn trail(&self, id: &ApplicationId) -> Result<Vec<AuditEntry>, AuditError> {
        self.store.trail(id)
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;

use crate::workflows::enrollment::audit::InMemoryAuditStore;
use crate::workflows::enrollment::domain::{
    ApplicationData, ApplicationId, DecisionConfig, DocumentExtract,
};
use crate::workflows::enrollment::engine::DecisionEngine;
use crate::workflows::enrollment::service::EnrollmentService;

pub(super) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(super) fn future_expiry() -> NaiveDate {
    today() + Duration::days(365)
}

pub(super) fn application() -> ApplicationData {
    ApplicationData {
        application_id: ApplicationId("APP-1001".to_string()),
        full_name: "John Doe".to_string(),
        date_of_birth: "1990-01-15".to_string(),
        address_street: "123 Main St".to_string(),
        address_city: "Des Moines".to_string(),
        address_state: "IA".to_string(),
        address_zip: "50309".to_string(),
        social_security_number: "123-45-6789".to_string(),
        employer_name: "Acme Corp.".to_string(),
        government_id: None,
        employer_document: None,
    }
}

/// Government ID extract whose fields agree with [`application`].
pub(super) fn government_id(expiry: NaiveDate) -> DocumentExtract {
    let mut fields = BTreeMap::new();
    fields.insert("full_name".to_string(), "John Doe".to_string());
    fields.insert("date_of_birth".to_string(), "1990-01-15".to_string());
    fields.insert("address_street".to_string(), "123 Main St".to_string());
    fields.insert("address_city".to_string(), "Des Moines".to_string());
    fields.insert("address_state".to_string(), "IA".to_string());
    fields.insert("address_zip".to_string(), "50309".to_string());
    fields.insert("expiry_date".to_string(), expiry.to_string());

    let confidence = fields.keys().map(|key| (key.clone(), 0.98)).collect();

    DocumentExtract { fields, confidence }
}

pub(super) fn employer_document(employer: &str) -> DocumentExtract {
    let mut fields = BTreeMap::new();
    fields.insert("employer_name".to_string(), employer.to_string());
    DocumentExtract {
        fields,
        confidence: BTreeMap::new(),
    }
}

pub(super) fn config() -> DecisionConfig {
    DecisionConfig::default()
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::new(config())
}

pub(super) fn build_service() -> (
    Arc<EnrollmentService<InMemoryAuditStore>>,
    Arc<InMemoryAuditStore>,
) {
    let store = Arc::new(InMemoryAuditStore::default());
    let service = Arc::new(EnrollmentService::new(Arc::clone(&store), config()));
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

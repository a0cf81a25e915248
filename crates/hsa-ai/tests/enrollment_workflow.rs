//! Integration specifications for the enrollment decision workflow.
//!
//! Scenarios exercise the public service facade end to end: evaluation,
//! audit recording, and runtime configuration updates, without reaching into
//! private modules.

mod common {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::{Duration, Local, NaiveDate};

    use hsa_ai::workflows::enrollment::{
        ApplicationData, ApplicationId, DecisionConfig, DocumentExtract, EnrollmentService,
        InMemoryAuditStore,
    };

    pub(super) fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub(super) fn application() -> ApplicationData {
        ApplicationData {
            application_id: ApplicationId("APP-2001".to_string()),
            full_name: "Maria Santos Garcia".to_string(),
            date_of_birth: "1985-06-02".to_string(),
            address_street: "42 Elm Ave".to_string(),
            address_city: "Austin".to_string(),
            address_state: "TX".to_string(),
            address_zip: "78701".to_string(),
            social_security_number: "987-65-4321".to_string(),
            employer_name: "Initech LLC".to_string(),
            government_id: None,
            employer_document: None,
        }
    }

    pub(super) fn government_id(expiry: NaiveDate) -> DocumentExtract {
        let mut fields = BTreeMap::new();
        fields.insert("full_name".to_string(), "Maria Santos Garcia".to_string());
        fields.insert("date_of_birth".to_string(), "1985-06-02".to_string());
        fields.insert("address_street".to_string(), "42 Elm Ave".to_string());
        fields.insert("address_city".to_string(), "Austin".to_string());
        fields.insert("address_state".to_string(), "TX".to_string());
        fields.insert("address_zip".to_string(), "78701".to_string());
        fields.insert("expiry_date".to_string(), expiry.to_string());
        DocumentExtract {
            fields,
            confidence: BTreeMap::new(),
        }
    }

    pub(super) fn employer_document(employer: &str) -> DocumentExtract {
        let mut fields = BTreeMap::new();
        fields.insert("employer_name".to_string(), employer.to_string());
        DocumentExtract {
            fields,
            confidence: BTreeMap::new(),
        }
    }

    pub(super) fn valid_expiry() -> NaiveDate {
        today() + Duration::days(730)
    }

    pub(super) fn build_service() -> Arc<EnrollmentService<InMemoryAuditStore>> {
        Arc::new(EnrollmentService::new(
            Arc::new(InMemoryAuditStore::default()),
            DecisionConfig::default(),
        ))
    }
}

use chrono::Duration;
use common::*;
use hsa_ai::workflows::enrollment::{DecisionConfig, DecisionKind, ValidationKind};

#[test]
fn clean_application_with_matching_documents_is_approved() {
    let service = build_service();
    let mut data = application();
    data.government_id = Some(government_id(valid_expiry()));
    data.employer_document = Some(employer_document("Initech"));

    let result = service.decide(data.clone()).expect("decides");

    assert_eq!(result.decision, DecisionKind::Approve);
    assert_eq!(result.risk_score, 0.0);
    assert!(result.reasoning.contains("All validation checks passed"));

    let trail = service
        .audit_trail(&data.application_id)
        .expect("trail reads");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].application_snapshot, data);
}

#[test]
fn expired_government_id_is_auto_rejected() {
    let service = build_service();
    let mut data = application();
    data.government_id = Some(government_id(today() - Duration::days(10)));

    let result = service.decide(data).expect("decides");

    assert_eq!(result.decision, DecisionKind::Reject);
    assert_eq!(result.risk_score, 1.0);
    assert!(result.reasoning.contains("Government ID is expired"));
}

#[test]
fn conflicting_identity_fields_route_to_manual_review() {
    let service = build_service();
    let mut id = government_id(valid_expiry());
    id.fields
        .insert("date_of_birth".to_string(), "1985-06-03".to_string());
    let mut data = application();
    data.government_id = Some(id);

    let result = service.decide(data).expect("decides");

    assert_eq!(result.decision, DecisionKind::ManualReview);
    let dob = result
        .validations
        .iter()
        .find(|validation| validation.kind == ValidationKind::DobMatch)
        .expect("dob validation present");
    assert!(!dob.is_valid);
    assert!(result.reasoning.contains("date_of_birth"));
}

#[test]
fn config_updates_take_effect_for_subsequent_decisions() {
    let service = build_service();
    let mut data = application();
    data.government_id = Some(government_id(today() - Duration::days(10)));

    let relaxed = DecisionConfig {
        expired_id_auto_reject: false,
        ..DecisionConfig::default()
    };
    service.update_config(relaxed).expect("config updates");

    let result = service.decide(data).expect("decides");

    // Expired ID no longer auto-rejects, but the failed check still blocks
    // approval.
    assert_eq!(result.decision, DecisionKind::ManualReview);
}

#[test]
fn out_of_range_config_is_rejected_without_side_effects() {
    let service = build_service();
    let broken = DecisionConfig {
        manual_review_threshold: 1.7,
        ..DecisionConfig::default()
    };

    assert!(service.update_config(broken).is_err());
    assert_eq!(service.config(), DecisionConfig::default());
}

use chrono::{Duration, NaiveDate};

use super::common::*;
use crate::workflows::enrollment::matchers::{
    check_id_expiry, match_address, match_dob, match_employer, match_name,
};

const THRESHOLD: f32 = 0.7;

#[test]
fn name_exact_match_after_normalization() {
    let result = match_name("John Doe", Some("JOHN DOE."), THRESHOLD);

    assert!(result.is_valid);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.details, "Exact match");
}

#[test]
fn name_subset_match_is_symmetric() {
    let forward = match_name("John Doe", Some("John Michael Doe"), THRESHOLD);
    let backward = match_name("John Michael Doe", Some("John Doe"), THRESHOLD);

    assert!(forward.is_valid);
    assert!(backward.is_valid);
    assert_eq!(forward.confidence, 0.85);
    assert_eq!(backward.confidence, 0.85);
}

#[test]
fn name_character_similarity_is_capped() {
    let result = match_name("John Doe", Some("Dohn Joe"), THRESHOLD);

    // Identical character sets would score 1.0 uncapped.
    assert!(result.confidence <= 0.8);
    assert!(result.details.starts_with("Character similarity"));
}

#[test]
fn name_dissimilar_fails_threshold() {
    let result = match_name("John Doe", Some("Quincy Bartholomew Vexler"), THRESHOLD);

    assert!(!result.is_valid);
    assert!(result.confidence < THRESHOLD);
}

#[test]
fn name_missing_document_value_is_invalid() {
    let result = match_name("John Doe", None, THRESHOLD);

    assert!(!result.is_valid);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.details, "Missing name data");
    assert_eq!(result.document_value, None);
}

#[test]
fn dob_exact_match() {
    let result = match_dob("1990-01-15", Some("1990-01-15"));

    assert!(result.is_valid);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn dob_mismatch_is_binary() {
    let result = match_dob("1990-01-15", Some("1990-01-16"));

    assert!(!result.is_valid);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.details, "Date of birth mismatch");
}

#[test]
fn dob_missing_data_is_invalid() {
    let result = match_dob("", Some("1990-01-15"));

    assert!(!result.is_valid);
    assert_eq!(result.details, "Missing date of birth data");
}

#[test]
fn address_full_match() {
    let result = match_address(&application(), &government_id(future_expiry()));

    assert!(result.is_valid);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn address_partial_match_averages_components() {
    let mut id = government_id(future_expiry());
    id.fields
        .insert("address_city".to_string(), "Cedar Rapids".to_string());

    let result = match_address(&application(), &id);

    // Three of four compared components agree.
    assert!(result.is_valid);
    assert!((result.confidence - 0.75).abs() < f32::EPSILON);
}

#[test]
fn address_street_tolerates_containment() {
    let mut id = government_id(future_expiry());
    id.fields.insert(
        "address_street".to_string(),
        "123 Main St Apt 4".to_string(),
    );

    let result = match_address(&application(), &id);

    assert!(result.is_valid);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn address_without_comparable_components_is_invalid() {
    let mut id = government_id(future_expiry());
    for field in [
        "address_street",
        "address_city",
        "address_state",
        "address_zip",
    ] {
        id.fields.remove(field);
    }

    let result = match_address(&application(), &id);

    assert!(!result.is_valid);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.details, "No address components could be compared");
}

#[test]
fn employer_exact_after_suffix_stripping() {
    let result = match_employer("Acme Corp.", Some("Acme"));

    assert!(result.is_valid);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn employer_substring_partial_match() {
    let result = match_employer("Acme Widgets", Some("Acme Widgets International"));

    assert!(result.is_valid);
    assert_eq!(result.confidence, 0.8);
}

#[test]
fn employer_word_overlap_is_capped() {
    let result = match_employer("Acme Global Widgets", Some("Acme Regional Gadgets"));

    // One shared word out of three; below the validity bar.
    assert!(!result.is_valid);
    assert!(result.confidence <= 0.7);
    assert!(result.details.starts_with("Common words found"));
}

#[test]
fn employer_no_common_words() {
    let result = match_employer("Acme Corp.", Some("Globex"));

    assert!(!result.is_valid);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.details, "No matching words found");
}

#[test]
fn expiry_today_counts_as_valid() {
    let id = government_id(today());

    let result = check_id_expiry(&id, today());

    assert!(result.is_valid);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn expiry_in_past_is_invalid() {
    let id = government_id(today() - Duration::days(1));

    let result = check_id_expiry(&id, today());

    assert!(!result.is_valid);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn expiry_missing_is_distinguished() {
    let mut id = government_id(future_expiry());
    id.fields.remove("expiry_date");

    let result = check_id_expiry(&id, today());

    assert!(!result.is_valid);
    assert_eq!(result.details, "No expiry date found on ID");
}

#[test]
fn expiry_malformed_is_distinguished() {
    let mut id = government_id(future_expiry());
    id.fields
        .insert("expiry_date".to_string(), "01/15/2030".to_string());

    let result = check_id_expiry(&id, NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"));

    assert!(!result.is_valid);
    assert!(result.details.starts_with("Invalid expiry date format"));
    assert_eq!(result.document_value.as_deref(), Some("01/15/2030"));
}

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::domain::{
    ApplicationData, DocumentExtract, ValidationKind, ValidationResult, ADDRESS_FIELDS,
};

/// Confidence assigned when one name's tokens are a subset of the other's
/// (middle names, initials, suffixes).
const NAME_SUBSET_CONFIDENCE: f32 = 0.85;
/// Cap for the character-overlap fallback so it never outranks a subset match.
const NAME_CHAR_SIMILARITY_CAP: f32 = 0.8;
/// Confidence for substring containment between normalized employer names.
const EMPLOYER_PARTIAL_CONFIDENCE: f32 = 0.8;
/// Cap for the shared-word employer fallback.
const EMPLOYER_WORD_OVERLAP_CAP: f32 = 0.7;

const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn normalize_name(raw: &str) -> String {
    raw.to_lowercase().replace([',', '.'], "").trim().to_string()
}

/// Fuzzy comparison of the declared applicant name against the ID extract.
pub(crate) fn match_name(
    app_name: &str,
    doc_name: Option<&str>,
    threshold: f32,
) -> ValidationResult {
    let (Some(app_raw), Some(doc_raw)) = (non_empty(app_name), doc_name.and_then(non_empty)) else {
        return ValidationResult {
            field_name: "full_name".to_string(),
            kind: ValidationKind::NameMatch,
            is_valid: false,
            confidence: 0.0,
            details: "Missing name data".to_string(),
            application_value: non_empty(app_name).map(str::to_string),
            document_value: doc_name.and_then(non_empty).map(str::to_string),
        };
    };

    let app_clean = normalize_name(app_raw);
    let doc_clean = normalize_name(doc_raw);

    let (confidence, is_valid, details) = if app_clean == doc_clean {
        (1.0, true, "Exact match".to_string())
    } else {
        let app_words: BTreeSet<&str> = app_clean.split_whitespace().collect();
        let doc_words: BTreeSet<&str> = doc_clean.split_whitespace().collect();

        if app_words.is_subset(&doc_words) || doc_words.is_subset(&app_words) {
            let confidence = NAME_SUBSET_CONFIDENCE;
            (
                confidence,
                confidence >= threshold,
                "Subset match (middle name/initial variation)".to_string(),
            )
        } else {
            let app_chars: BTreeSet<char> = app_clean.chars().collect();
            let doc_chars: BTreeSet<char> = doc_clean.chars().collect();
            let common = app_chars.intersection(&doc_chars).count();
            let longest = app_clean.chars().count().max(doc_clean.chars().count());
            let similarity = common as f32 / longest as f32;
            let confidence = similarity.min(NAME_CHAR_SIMILARITY_CAP);
            (
                confidence,
                confidence >= threshold,
                format!("Character similarity: {similarity:.2}"),
            )
        }
    };

    ValidationResult {
        field_name: "full_name".to_string(),
        kind: ValidationKind::NameMatch,
        is_valid,
        confidence,
        details,
        application_value: Some(app_raw.to_string()),
        document_value: Some(doc_raw.to_string()),
    }
}

/// Exact date-of-birth comparison. Any difference is a full mismatch.
pub(crate) fn match_dob(app_dob: &str, doc_dob: Option<&str>) -> ValidationResult {
    let (Some(app_date), Some(doc_date)) = (non_empty(app_dob), doc_dob.and_then(non_empty)) else {
        return ValidationResult {
            field_name: "date_of_birth".to_string(),
            kind: ValidationKind::DobMatch,
            is_valid: false,
            confidence: 0.0,
            details: "Missing date of birth data".to_string(),
            application_value: non_empty(app_dob).map(str::to_string),
            document_value: doc_dob.and_then(non_empty).map(str::to_string),
        };
    };

    let is_valid = app_date == doc_date;

    ValidationResult {
        field_name: "date_of_birth".to_string(),
        kind: ValidationKind::DobMatch,
        is_valid,
        confidence: if is_valid { 1.0 } else { 0.0 },
        details: if is_valid {
            "Exact match".to_string()
        } else {
            "Date of birth mismatch".to_string()
        },
        application_value: Some(app_date.to_string()),
        document_value: Some(doc_date.to_string()),
    }
}

/// Component-wise address comparison. Only components present on both sides
/// participate; confidence is the mean of the compared components.
pub(crate) fn match_address(data: &ApplicationData, id: &DocumentExtract) -> ValidationResult {
    let doc_components: Vec<String> = ADDRESS_FIELDS
        .iter()
        .map(|name| id.field(name).unwrap_or_default().to_lowercase())
        .collect();
    let app_components: Vec<String> = [
        data.address_street.as_str(),
        data.address_city.as_str(),
        data.address_state.as_str(),
        data.address_zip.as_str(),
    ]
    .iter()
    .map(|value| value.trim().to_lowercase())
    .collect();

    let mut matches: Vec<f32> = Vec::new();
    for (index, (doc_value, app_value)) in doc_components.iter().zip(&app_components).enumerate() {
        if doc_value.is_empty() || app_value.is_empty() {
            continue;
        }
        // Street tolerates containment either way; the rest require equality.
        let matched = if index == 0 {
            doc_value.contains(app_value.as_str()) || app_value.contains(doc_value.as_str())
        } else {
            doc_value == app_value
        };
        matches.push(if matched { 1.0 } else { 0.0 });
    }

    let (confidence, is_valid, details) = if matches.is_empty() {
        (
            0.0,
            false,
            "No address components could be compared".to_string(),
        )
    } else {
        let confidence = matches.iter().sum::<f32>() / matches.len() as f32;
        (
            confidence,
            confidence > 0.5,
            format!("Address component match score: {confidence:.2}"),
        )
    };

    ValidationResult {
        field_name: "address".to_string(),
        kind: ValidationKind::AddressMatch,
        is_valid,
        confidence,
        details,
        application_value: Some(app_components.join(" ").trim().to_string()),
        document_value: Some(doc_components.join(" ").trim().to_string()),
    }
}

fn normalize_employer(raw: &str) -> String {
    raw.to_lowercase()
        .replace("inc.", "")
        .replace("corp.", "")
        .replace("llc", "")
        .trim()
        .to_string()
}

/// Fuzzy employer comparison tolerating legal-suffix and wording variations.
pub(crate) fn match_employer(app_employer: &str, doc_employer: Option<&str>) -> ValidationResult {
    let (Some(app_raw), Some(doc_raw)) =
        (non_empty(app_employer), doc_employer.and_then(non_empty))
    else {
        return ValidationResult {
            field_name: "employer_name".to_string(),
            kind: ValidationKind::EmployerMatch,
            is_valid: false,
            confidence: 0.0,
            details: "Missing employer data".to_string(),
            application_value: non_empty(app_employer).map(str::to_string),
            document_value: doc_employer.and_then(non_empty).map(str::to_string),
        };
    };

    let app_clean = normalize_employer(app_raw);
    let doc_clean = normalize_employer(doc_raw);

    let (confidence, is_valid, details) = if app_clean == doc_clean {
        (1.0, true, "Exact match".to_string())
    } else if app_clean.contains(&doc_clean) || doc_clean.contains(&app_clean) {
        (
            EMPLOYER_PARTIAL_CONFIDENCE,
            true,
            "Partial match (company name variation)".to_string(),
        )
    } else {
        let app_words: BTreeSet<&str> = app_clean.split_whitespace().collect();
        let doc_words: BTreeSet<&str> = doc_clean.split_whitespace().collect();
        let common: Vec<&str> = app_words.intersection(&doc_words).copied().collect();

        if common.is_empty() {
            (0.0, false, "No matching words found".to_string())
        } else {
            let longest = app_words.len().max(doc_words.len());
            let confidence =
                (common.len() as f32 / longest as f32).min(EMPLOYER_WORD_OVERLAP_CAP);
            (
                confidence,
                confidence > 0.5,
                format!("Common words found: {}", common.join(", ")),
            )
        }
    };

    ValidationResult {
        field_name: "employer_name".to_string(),
        kind: ValidationKind::EmployerMatch,
        is_valid,
        confidence,
        details,
        application_value: Some(app_raw.to_string()),
        document_value: Some(doc_raw.to_string()),
    }
}

/// Checks whether the government ID is still valid. Expiring today counts as
/// valid; missing and unparsable dates are distinguished in the details.
pub(crate) fn check_id_expiry(id: &DocumentExtract, today: NaiveDate) -> ValidationResult {
    let Some(raw) = id.field("expiry_date") else {
        return ValidationResult {
            field_name: "id_expiry".to_string(),
            kind: ValidationKind::IdExpiry,
            is_valid: false,
            confidence: 0.0,
            details: "No expiry date found on ID".to_string(),
            application_value: None,
            document_value: None,
        };
    };

    match NaiveDate::parse_from_str(raw, EXPIRY_DATE_FORMAT) {
        Ok(expiry_date) => ValidationResult {
            field_name: "id_expiry".to_string(),
            kind: ValidationKind::IdExpiry,
            is_valid: expiry_date >= today,
            confidence: 1.0,
            details: format!("ID expires on {expiry_date}. Current date: {today}"),
            application_value: None,
            document_value: Some(expiry_date.to_string()),
        },
        Err(source) => ValidationResult {
            field_name: "id_expiry".to_string(),
            kind: ValidationKind::IdExpiry,
            is_valid: false,
            confidence: 0.0,
            details: format!("Invalid expiry date format: {source}"),
            application_value: None,
            document_value: Some(raw.to_string()),
        },
    }
}

//! Field validators.
//!
//! Each validator looks at a single value or a single entity and never touches
//! shared state, so the engine can compose them freely and attribute findings
//! to the entity they came from.

use std::sync::LazyLock;

use regex::Regex;

use e2b_model::codes::{DRUG_CHARACTERIZATION_CODES, SEX_CODES};
use e2b_model::{DrugRecord, Finding, PatientRecord, ReactionRecord, non_empty, parse_number};

/// `COUNTRY-ORGANIZATION-NUMBER`, e.g. `US-COMPANY-2025-001234`.
static REPORT_ID_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}-[\w-]+-[\w]+$").ok());

/// Inclusive patient age range in years.
const AGE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=120.0;

/// Upper bound of a plausible patient weight in kilograms (lower bound is exclusive zero).
const MAX_WEIGHT_KG: f64 = 500.0;

/// Check a safety report id against the E2B report id pattern.
///
/// Case-sensitive; no trimming or normalization is applied.
pub fn validate_report_id_format(report_id: &str) -> bool {
    if report_id.is_empty() {
        return false;
    }
    REPORT_ID_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(report_id))
}

/// Check a partial-precision E2B date: `CCYY`, `CCYYMM`, or `CCYYMMDD`.
pub fn validate_date_format(date: &str) -> bool {
    matches!(date.len(), 4 | 6 | 8) && date.bytes().all(|b| b.is_ascii_digit())
}

/// Validate patient demographics.
///
/// Unparseable numbers and unknown sex codes are errors; implausible ages and
/// weights are warnings.
pub fn validate_patient_data(patient: &PatientRecord) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(age) = non_empty(&patient.age) {
        match parse_number(age) {
            Some(value) if AGE_RANGE.contains(&value) => {}
            Some(_) => findings.push(Finding::warning(format!("Unusual patient age: {age}"))),
            None => findings.push(Finding::error(format!("Age must be numeric: {age}"))),
        }
    }

    if let Some(sex) = non_empty(&patient.sex)
        && !SEX_CODES.contains(&sex)
    {
        findings.push(Finding::error(format!("Invalid sex code: {sex}")));
    }

    if let Some(weight) = non_empty(&patient.weight) {
        match parse_number(weight) {
            Some(value) if value > 0.0 && value <= MAX_WEIGHT_KG => {}
            Some(_) => findings.push(Finding::warning(format!(
                "Unusual patient weight: {weight}"
            ))),
            None => findings.push(Finding::error(format!("Weight must be numeric: {weight}"))),
        }
    }

    findings
}

/// Validate one drug entry.
pub fn validate_drug_data(drug: &DrugRecord) -> Vec<Finding> {
    let mut findings = Vec::new();

    if non_empty(&drug.drug_name).is_none() && non_empty(&drug.medicinal_product).is_none() {
        findings.push(Finding::error("Missing drug_name and medicinal_product"));
    }

    if let Some(code) = non_empty(&drug.characterization)
        && !DRUG_CHARACTERIZATION_CODES.contains(&code)
    {
        findings.push(Finding::error(format!(
            "Invalid drug_characterization: {code}"
        )));
    }

    findings
}

/// Validate one reaction entry.
pub fn validate_reaction_data(reaction: &ReactionRecord) -> Vec<Finding> {
    let mut findings = Vec::new();

    if non_empty(&reaction.reaction_term).is_none() {
        findings.push(Finding::error("Missing reaction_term"));
    }

    if let Some(code) = non_empty(&reaction.meddra_code)
        && !code.chars().all(|c| c.is_ascii_digit())
    {
        findings.push(Finding::error(format!("Invalid MedDRA code format: {code}")));
    }

    findings
}

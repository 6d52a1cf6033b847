//! Report-level validation engine.
//!
//! Runs the field validators across a whole form and folds their findings into
//! a single [`ValidationResult`]. Nothing here short-circuits: every problem in a
//! report is collected so the submitter can fix them in one pass.

use tracing::{debug, info, warn};

use e2b_model::codes::{REPORT_TYPE_CODES, SERIOUS_CODES};
use e2b_model::{Finding, RawForm, UNKNOWN_REPORT_ID, ValidationResult, non_empty};

use crate::fields::{
    validate_date_format, validate_drug_data, validate_patient_data, validate_reaction_data,
    validate_report_id_format,
};

/// Validate the administrative part of a form (safety report header, sender,
/// receiver, primary source, message metadata).
pub fn validate_e2b_data(form: &RawForm) -> ValidationResult {
    let findings = header_findings(form);
    finish(form, findings)
}

/// Validate a form including its patient, drug, and reaction entities.
///
/// Drug and reaction findings are prefixed with their 1-based position, e.g.
/// `Drug 2: Missing drug_name and medicinal_product`.
pub fn validate_complete_report(form: &RawForm) -> ValidationResult {
    let mut findings = header_findings(form);

    match form.patient.as_ref() {
        Some(patient) => findings.extend(validate_patient_data(patient)),
        None => findings.push(Finding::warning("Missing patient section")),
    }

    if form.drugs.is_empty() {
        findings.push(Finding::error(
            "No drug information provided: missing drug_name and medicinal_product",
        ));
    }
    for (idx, drug) in form.drugs.iter().enumerate() {
        let prefix = format!("Drug {}", idx + 1);
        findings.extend(
            validate_drug_data(drug)
                .into_iter()
                .map(|finding| finding.prefixed(&prefix)),
        );
    }

    if form.reactions.is_empty() {
        findings.push(Finding::warning("No adverse reactions reported"));
    }
    for (idx, reaction) in form.reactions.iter().enumerate() {
        let prefix = format!("Reaction {}", idx + 1);
        findings.extend(
            validate_reaction_data(reaction)
                .into_iter()
                .map(|finding| finding.prefixed(&prefix)),
        );
    }

    finish(form, findings)
}

fn header_findings(form: &RawForm) -> Vec<Finding> {
    let mut findings = Vec::new();

    match form.safety_report.as_ref() {
        None => findings.push(Finding::error("Missing required safety_report section")),
        Some(report) => {
            match non_empty(&report.report_id) {
                None => findings.push(Finding::error("Missing safety_report_id")),
                Some(id) if !validate_report_id_format(id) => {
                    findings.push(Finding::error(format!("Invalid report ID format: {id}")));
                }
                Some(_) => {}
            }

            match non_empty(&report.report_type) {
                None => findings.push(Finding::error("Missing report_type")),
                Some(kind) if !REPORT_TYPE_CODES.contains(&kind) => {
                    findings.push(Finding::error(format!("Invalid report_type: {kind}")));
                }
                Some(_) => {}
            }

            if let Some(serious) = non_empty(&report.serious).map(str::trim)
                && !SERIOUS_CODES.contains(&serious)
            {
                findings.push(Finding::error(format!("Invalid serious flag: {serious}")));
            }

            match non_empty(&report.receive_date) {
                None => findings.push(Finding::warning("Missing receive_date")),
                Some(date) if !validate_date_format(date) => {
                    findings.push(Finding::error(format!("Invalid receive_date format: {date}")));
                }
                Some(_) => {}
            }
        }
    }

    let sender = form.sender.as_ref().and_then(|org| non_empty(&org.organization));
    if sender.is_none() {
        findings.push(Finding::warning("Missing sender organization"));
    }
    let receiver = form
        .receiver
        .as_ref()
        .and_then(|org| non_empty(&org.organization));
    if receiver.is_none() {
        findings.push(Finding::warning("Missing receiver organization"));
    }
    let qualification = form
        .primary_source
        .as_ref()
        .and_then(|source| non_empty(&source.qualification));
    if qualification.is_none() {
        findings.push(Finding::warning("Missing reporter qualification"));
    }
    if non_empty(&form.message_format_version).is_none() {
        findings.push(Finding::warning("Missing message_format_version"));
    }

    findings
}

fn finish(form: &RawForm, findings: Vec<Finding>) -> ValidationResult {
    let report_id = form.report_id().unwrap_or(UNKNOWN_REPORT_ID);
    let result = ValidationResult::from_findings(report_id, findings);
    if result.is_valid {
        info!(
            report_id = %result.report_id,
            warnings = result.warning_count(),
            "validation passed"
        );
    } else {
        warn!(
            report_id = %result.report_id,
            errors = result.error_count(),
            warnings = result.warning_count(),
            "validation failed"
        );
    }
    for error in &result.errors {
        debug!(report_id = %result.report_id, %error, "validation error");
    }
    result
}

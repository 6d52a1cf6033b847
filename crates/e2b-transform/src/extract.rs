//! Form extraction.

use tracing::{debug, error};

use e2b_model::codes::FLAG_YES;
use e2b_model::{AdverseEvent, ModelError, RawForm, Result, UNKNOWN_REPORT_ID, non_empty};

/// Flatten a form into the entity set keyed by domain concept.
///
/// Fails only when the safety report section is absent. Sections the form
/// does not carry stay `None` or empty.
pub fn extract_adverse_event_data(form: &RawForm) -> Result<AdverseEvent> {
    let Some(report) = form.safety_report.as_ref() else {
        error!(file_id = %form.file_id, "cannot extract a form without a safety report");
        return Err(ModelError::MissingSection("safety_report"));
    };

    let report_id = non_empty(&report.report_id).map(str::to_string);
    let patient_id = format!(
        "PATIENT-{}",
        report_id.as_deref().unwrap_or(UNKNOWN_REPORT_ID)
    );

    let serious_code = non_empty(&report.serious).map(|code| code.trim().to_string());
    let event = AdverseEvent {
        report_version: report.report_version.clone(),
        report_type: report.report_type.clone(),
        message_number: form.message_number.clone(),
        serious: serious_code.as_deref() == Some(FLAG_YES),
        serious_code,
        seriousness: report.seriousness.clone(),
        seriousness_criteria: report.seriousness_criteria.clone(),
        receive_date: report.receive_date.clone(),
        receipt_date: report.receipt_date.clone(),
        transmission_date: report.transmission_date.clone(),
        occur_country: report.occur_country.clone(),
        patient_id,
        patient: form.patient.clone(),
        drugs: form.drugs.clone(),
        reactions: form.reactions.clone(),
        sender: form.sender.clone(),
        receiver: form.receiver.clone(),
        primary_source: form.primary_source.clone(),
        report_id,
    };

    debug!(
        report_id = event.report_id.as_deref().unwrap_or(UNKNOWN_REPORT_ID),
        drugs = event.drugs.len(),
        reactions = event.reactions.len(),
        "extracted adverse event data"
    );
    Ok(event)
}

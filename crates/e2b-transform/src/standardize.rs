//! Standardization of extracted events into [`StandardRecord`]s.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use e2b_model::codes::{FLAG_YES, REPORT_SOURCE};
use e2b_model::{
    AdverseEvent, AdverseReaction, Demographics, DrugRecord, ModelError, Medication,
    PatientRecord, ReactionRecord, Reporter, Result, Seriousness, SeriousnessFlags,
    StandardRecord, UNKNOWN_REPORT_ID, non_empty, parse_number,
};

use crate::options::StandardizeOptions;

/// Report version used when the safety report has none.
pub const DEFAULT_REPORT_VERSION: &str = "1";

/// Map an extracted event onto the canonical record consumed by the renderer.
///
/// # Errors
///
/// [`ModelError::MissingSection`] when the event has no patient and
/// [`ModelError::InvalidNumber`] when the patient weight is not numeric.
pub fn transform_to_standard(
    event: &AdverseEvent,
    options: &StandardizeOptions,
) -> Result<StandardRecord> {
    let report_identifier = event
        .report_id
        .clone()
        .unwrap_or_else(|| UNKNOWN_REPORT_ID.to_string());

    let Some(patient) = event.patient.as_ref() else {
        warn!(report_id = %report_identifier, "cannot standardize a report without a patient");
        return Err(ModelError::MissingSection("patient"));
    };
    let patient_demographics = demographics(patient, options)?;

    let transmission_date = owned(&event.transmission_date)
        .or_else(|| options.default_transmission_date.clone())
        .or_else(|| owned(&event.receipt_date))
        .or_else(|| owned(&event.receive_date));

    let source = event.primary_source.clone().unwrap_or_default();
    let reporter = Reporter {
        reporter_type: owned(&source.reporter_title),
        qualification: owned(&source.qualification),
        given_name: owned(&source.reporter_given_name),
        family_name: owned(&source.reporter_family_name),
        country: owned(&source.reporter_country),
    };

    let record = StandardRecord {
        report_source: REPORT_SOURCE.to_string(),
        report_version: owned(&event.report_version)
            .unwrap_or_else(|| DEFAULT_REPORT_VERSION.to_string()),
        report_type: owned(&event.report_type),
        message_number: owned(&event.message_number)
            .unwrap_or_else(|| report_identifier.clone()),
        is_serious: event.serious,
        serious_code: owned(&event.serious_code),
        seriousness: seriousness(&event.seriousness),
        seriousness_reasons: event
            .seriousness_criteria
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>(),
        received_date: owned(&event.receive_date),
        receipt_date: owned(&event.receipt_date),
        transmission_date,
        occurrence_country: owned(&event.occur_country),
        patient_identifier: event.patient_id.clone(),
        patient_demographics,
        medications: event
            .drugs
            .iter()
            .map(|drug| medication(drug, options))
            .collect(),
        adverse_reactions: event.reactions.iter().map(adverse_reaction).collect(),
        reporter,
        submitter_organization: event
            .sender
            .as_ref()
            .and_then(|org| owned(&org.organization)),
        receiver_organization: event
            .receiver
            .as_ref()
            .and_then(|org| owned(&org.organization)),
        report_identifier,
    };

    debug!(
        report_id = %record.report_identifier,
        medications = record.medications.len(),
        reactions = record.adverse_reactions.len(),
        reporter_type = record.reporter.display_type(),
        "standardized report"
    );
    Ok(record)
}

fn demographics(patient: &PatientRecord, options: &StandardizeOptions) -> Result<Demographics> {
    let weight_kg = match non_empty(&patient.weight) {
        None => 0.0,
        Some(raw) => parse_number(raw).ok_or_else(|| ModelError::InvalidNumber {
            field: "patient.weight",
            value: raw.to_string(),
        })?,
    };
    Ok(Demographics {
        initials: owned(&patient.initials),
        age_value: owned(&patient.age),
        age_unit: owned(&patient.age_unit),
        gender: options.gender_mapping.map(non_empty(&patient.sex)),
        sex_code: owned(&patient.sex),
        weight_kg,
    })
}

fn medication(drug: &DrugRecord, options: &StandardizeOptions) -> Medication {
    let name = non_empty(&drug.drug_name)
        .or_else(|| non_empty(&drug.medicinal_product))
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    Medication {
        name,
        product_code: owned(&drug.medicinal_product),
        role: options.role_mapping.map(non_empty(&drug.characterization)),
        characterization: owned(&drug.characterization),
        indication: owned(&drug.indication),
        dose: owned(&drug.dosage),
        dose_amount: owned(&drug.dosage_amount),
        dose_unit: owned(&drug.dosage_unit),
        dosage_form: owned(&drug.dosage_form),
        administration_route: owned(&drug.route),
        start_date: owned(&drug.start_date),
        end_date: owned(&drug.end_date),
    }
}

fn adverse_reaction(reaction: &ReactionRecord) -> AdverseReaction {
    AdverseReaction {
        term: non_empty(&reaction.reaction_term)
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        meddra_code: owned(&reaction.meddra_code),
        meddra_version: owned(&reaction.meddra_version),
        preferred_term: owned(&reaction.meddra_preferred_term),
        outcome: owned(&reaction.outcome),
    }
}

fn seriousness(flags: &SeriousnessFlags) -> Seriousness {
    let set = |flag: &Option<String>| non_empty(flag).map(str::trim) == Some(FLAG_YES);
    Seriousness {
        death: set(&flags.death),
        life_threatening: set(&flags.life_threatening),
        hospitalization: set(&flags.hospitalization),
        disabling: set(&flags.disabling),
        congenital_anomaly: set(&flags.congenital_anomaly),
        other: set(&flags.other),
    }
}

/// Trimmed copy of a present, non-blank value.
fn owned(value: &Option<String>) -> Option<String> {
    non_empty(value).map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_patient(patient: PatientRecord) -> AdverseEvent {
        AdverseEvent {
            report_id: Some("US-ACME-2025-1".to_string()),
            patient_id: "PATIENT-US-ACME-2025-1".to_string(),
            patient: Some(patient),
            ..AdverseEvent::default()
        }
    }

    #[test]
    fn missing_weight_defaults_to_zero() {
        let record = transform_to_standard(
            &event_with_patient(PatientRecord::default()),
            &StandardizeOptions::default(),
        )
        .expect("standardize");
        assert_eq!(record.patient_demographics.weight_kg, 0.0);
    }

    #[test]
    fn unparseable_weight_is_an_error() {
        let event = event_with_patient(PatientRecord {
            weight: Some("seventy".to_string()),
            ..PatientRecord::default()
        });
        let err = transform_to_standard(&event, &StandardizeOptions::default())
            .expect_err("weight");
        assert!(matches!(
            err,
            ModelError::InvalidNumber { field: "patient.weight", ref value } if value == "seventy"
        ));
    }

    #[test]
    fn non_finite_weight_is_an_error() {
        for raw in ["inf", "NaN"] {
            let event = event_with_patient(PatientRecord {
                weight: Some(raw.to_string()),
                ..PatientRecord::default()
            });
            let err = transform_to_standard(&event, &StandardizeOptions::default())
                .expect_err("weight");
            assert!(matches!(err, ModelError::InvalidNumber { .. }), "{raw}");
        }
    }

    #[test]
    fn negative_weight_is_kept() {
        let event = event_with_patient(PatientRecord {
            weight: Some("-5".to_string()),
            ..PatientRecord::default()
        });
        let record =
            transform_to_standard(&event, &StandardizeOptions::default()).expect("standardize");
        assert_eq!(record.patient_demographics.weight_kg, -5.0);
    }

    #[test]
    fn reported_codes_survive_collapsed_mapping() {
        let mut event = event_with_patient(PatientRecord {
            sex: Some(" 0 ".to_string()),
            ..PatientRecord::default()
        });
        event.serious = false;
        event.serious_code = Some("0".to_string());
        let record =
            transform_to_standard(&event, &StandardizeOptions::default()).expect("standardize");
        assert_eq!(record.patient_demographics.gender, e2b_model::Gender::Male);
        assert_eq!(record.patient_demographics.sex_code.as_deref(), Some("0"));
        assert_eq!(record.serious_code.as_deref(), Some("0"));
        assert!(!record.is_serious);
    }

    #[test]
    fn defaults_fill_version_reporter_and_message_number() {
        let record = transform_to_standard(
            &event_with_patient(PatientRecord::default()),
            &StandardizeOptions::default(),
        )
        .expect("standardize");
        assert_eq!(record.report_version, DEFAULT_REPORT_VERSION);
        assert_eq!(record.reporter.reporter_type, None);
        assert_eq!(record.reporter.display_type(), e2b_model::codes::UNKNOWN_REPORTER_TYPE);
        assert_eq!(record.message_number, "US-ACME-2025-1");
        assert_eq!(record.report_source, REPORT_SOURCE);
    }

    #[test]
    fn transmission_date_fallback_order() {
        let mut event = event_with_patient(PatientRecord::default());
        event.receive_date = Some("20250101".to_string());
        let options = StandardizeOptions::default();
        let date = |event: &AdverseEvent, options: &StandardizeOptions| {
            transform_to_standard(event, options)
                .expect("standardize")
                .transmission_date
        };

        assert_eq!(date(&event, &options).as_deref(), Some("20250101"));

        event.receipt_date = Some("20250102".to_string());
        assert_eq!(date(&event, &options).as_deref(), Some("20250102"));

        let with_default = StandardizeOptions {
            default_transmission_date: Some("20250103".to_string()),
            ..StandardizeOptions::default()
        };
        assert_eq!(date(&event, &with_default).as_deref(), Some("20250103"));

        event.transmission_date = Some("20250104".to_string());
        assert_eq!(date(&event, &with_default).as_deref(), Some("20250104"));
    }

    #[test]
    fn seriousness_reasons_are_deduplicated_and_ordered() {
        let mut event = event_with_patient(PatientRecord::default());
        event.seriousness_criteria = vec![
            "life_threatening".to_string(),
            "death".to_string(),
            "death".to_string(),
            " ".to_string(),
        ];
        let record =
            transform_to_standard(&event, &StandardizeOptions::default()).expect("standardize");
        let reasons: Vec<_> = record.seriousness_reasons.iter().map(String::as_str).collect();
        assert_eq!(reasons, vec!["death", "life_threatening"]);
    }
}

use e2b_model::{
    DrugRecord, DrugRole, Gender, ModelError, Organization, PatientRecord, PrimarySource,
    RawForm, ReactionRecord, SafetyReport,
};
use e2b_transform::{
    GenderMapping, StandardizeOptions, extract_adverse_event_data, transform_to_standard,
};

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn sample_form() -> RawForm {
    RawForm {
        file_id: "sample_e2b_001".to_string(),
        message_format_version: text("2.1"),
        sender: Some(Organization {
            organization: text("Sample Pharmaceutical Company"),
            organization_type: text("1"),
        }),
        safety_report: Some(SafetyReport {
            report_id: text("US-COMPANY-2025-001234"),
            report_type: text("1"),
            serious: text("1"),
            seriousness_criteria: vec!["death".to_string(), "life_threatening".to_string()],
            receive_date: text("20250101"),
            ..SafetyReport::default()
        }),
        primary_source: Some(PrimarySource {
            qualification: text("1"),
            ..PrimarySource::default()
        }),
        patient: Some(PatientRecord {
            initials: text("ABC"),
            age: text("45"),
            age_unit: text("801"),
            sex: text("2"),
            weight: text("70.5"),
            weight_unit: text("kg"),
        }),
        drugs: vec![
            DrugRecord {
                drug_name: text("Sample Drug A"),
                medicinal_product: text("SAMPLE-DRUG-A"),
                characterization: text("1"),
                indication: text("Hypertension"),
                dosage: text("50mg"),
                route: text("oral"),
                ..DrugRecord::default()
            },
            DrugRecord {
                medicinal_product: text("IBUPROFEN"),
                characterization: text("3"),
                ..DrugRecord::default()
            },
        ],
        reactions: vec![ReactionRecord {
            reaction_term: text("Nausea"),
            meddra_version: text("24.0"),
            meddra_code: text("10028813"),
            ..ReactionRecord::default()
        }],
        ..RawForm::default()
    }
}

#[test]
fn sample_report_standardizes_with_legacy_mappings() {
    let event = extract_adverse_event_data(&sample_form()).expect("extract");
    let record = transform_to_standard(&event, &StandardizeOptions::default()).expect("standardize");

    assert_eq!(record.report_identifier, "US-COMPANY-2025-001234");
    assert_eq!(record.patient_identifier, "PATIENT-US-COMPANY-2025-001234");
    assert!(record.is_serious);
    assert_eq!(record.serious_code.as_deref(), Some("1"));
    assert_eq!(record.patient_demographics.gender, Gender::Female);
    assert_eq!(record.patient_demographics.weight_kg, 70.5);
    assert_eq!(record.transmission_date.as_deref(), Some("20250101"));
    assert_eq!(
        record.submitter_organization.as_deref(),
        Some("Sample Pharmaceutical Company")
    );
    assert_eq!(record.reporter.qualification.as_deref(), Some("1"));

    let first = &record.medications[0];
    assert_eq!(first.name, "Sample Drug A");
    assert_eq!(first.product_code.as_deref(), Some("SAMPLE-DRUG-A"));
    assert_eq!(first.role, DrugRole::Suspect);
    assert_eq!(first.dose.as_deref(), Some("50mg"));

    let second = &record.medications[1];
    assert_eq!(second.name, "IBUPROFEN");
    assert_eq!(second.role, DrugRole::Concomitant);

    assert_eq!(record.adverse_reactions[0].term, "Nausea");
    assert_eq!(record.adverse_reactions[0].meddra_code.as_deref(), Some("10028813"));
}

#[test]
fn demographics_snapshot() {
    let event = extract_adverse_event_data(&sample_form()).expect("extract");
    let record = transform_to_standard(&event, &StandardizeOptions::default()).expect("standardize");

    insta::assert_json_snapshot!(record.patient_demographics, @r#"
    {
      "initials": "ABC",
      "age_value": "45",
      "age_unit": "801",
      "gender": "F",
      "sex_code": "2",
      "weight_kg": 70.5
    }
    "#);
}

#[test]
fn strict_mappings_keep_unknown_and_interacting() {
    let mut form = sample_form();
    if let Some(patient) = form.patient.as_mut() {
        patient.sex = text("0");
    }
    let event = extract_adverse_event_data(&form).expect("extract");

    let legacy = transform_to_standard(&event, &StandardizeOptions::default()).expect("legacy");
    assert_eq!(legacy.patient_demographics.gender, Gender::Male);
    assert_eq!(legacy.patient_demographics.sex_code.as_deref(), Some("0"));

    let strict = transform_to_standard(&event, &StandardizeOptions::strict()).expect("strict");
    assert_eq!(strict.patient_demographics.gender, Gender::Unknown);
    assert_eq!(strict.medications[1].role, DrugRole::Interacting);

    let gender_only = StandardizeOptions {
        gender_mapping: GenderMapping::Strict,
        ..StandardizeOptions::default()
    };
    let mixed = transform_to_standard(&event, &gender_only).expect("mixed");
    assert_eq!(mixed.medications[1].role, DrugRole::Concomitant);
}

#[test]
fn missing_patient_is_a_structural_error() {
    let mut form = sample_form();
    form.patient = None;
    let event = extract_adverse_event_data(&form).expect("extract");

    let err = transform_to_standard(&event, &StandardizeOptions::default()).expect_err("patient");

    assert!(matches!(err, ModelError::MissingSection("patient")));
}

#[test]
fn standardization_is_deterministic() {
    let event = extract_adverse_event_data(&sample_form()).expect("extract");
    let options = StandardizeOptions::default();
    assert_eq!(
        transform_to_standard(&event, &options).expect("first"),
        transform_to_standard(&event, &options).expect("second")
    );
}

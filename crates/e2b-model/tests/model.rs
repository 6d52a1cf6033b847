use e2b_model::{Finding, RawForm, Severity};

#[test]
fn json_form_accepts_source_key_aliases() {
    let json = r#"{
        "file_id": "sample_e2b_001",
        "message_format_version": "2.1",
        "sender": {"organization": "Sample Pharmaceutical Company", "sender_type": "1"},
        "safety_report": {
            "safety_report_id": "US-ACME-2025-001234",
            "report_type": "1",
            "serious": "1",
            "seriousness_death": "2",
            "seriousness_hospitalization": "1",
            "seriousness_criteria": ["hospitalization"],
            "receive_date": "20250101"
        },
        "drugs": [{"drug_name": "ASPIRIN", "drug_characterization": "1", "drug_indication": "Pain"}]
    }"#;
    let form: RawForm = serde_json::from_str(json).expect("parse form");

    assert_eq!(form.report_id(), Some("US-ACME-2025-001234"));
    let sender = form.sender.as_ref().expect("sender");
    assert_eq!(sender.organization_type.as_deref(), Some("1"));
    let report = form.safety_report.as_ref().expect("safety report");
    assert_eq!(report.seriousness.hospitalization.as_deref(), Some("1"));
    assert_eq!(report.seriousness.death.as_deref(), Some("2"));
    assert_eq!(report.seriousness_criteria, vec!["hospitalization"]);
    assert_eq!(form.drugs[0].characterization.as_deref(), Some("1"));
    assert_eq!(form.drugs[0].indication.as_deref(), Some("Pain"));
    assert!(form.reactions.is_empty());
    assert!(form.patient.is_none());
}

#[test]
fn missing_safety_report_has_no_id() {
    let form = RawForm::default();
    assert_eq!(form.report_id(), None);
}

#[test]
fn prefixed_finding_keeps_severity() {
    let finding = Finding::warning("Unusual patient age: 130").prefixed("Patient");
    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(finding.message, "Patient: Unusual patient age: 130");
}

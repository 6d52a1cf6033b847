//! End-to-end runs of the batch pipeline over temporary directories.

use std::fs;
use std::path::Path;

use e2b_cli::pipeline::{run_pipeline, validate_directory};
use e2b_cli::types::{FileStatus, PipelineConfig};
use e2b_model::ValidationResult;

const VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ichicsr lang="en">
  <ichicsrmessageheader>
    <messageformatversion>2.1</messageformatversion>
    <messagenumb>US-ACME-2025-000042</messagenumb>
    <messagesenderidentifier>ACME Pharma</messagesenderidentifier>
    <messagereceiveridentifier>FDA</messagereceiveridentifier>
  </ichicsrmessageheader>
  <safetyreport>
    <safetyreportid>US-ACME-2025-000042</safetyreportid>
    <reporttype>1</reporttype>
    <serious>1</serious>
    <seriousnesshospitalization>1</seriousnesshospitalization>
    <receivedate>20250211</receivedate>
    <transmissiondate>20250212</transmissiondate>
    <primarysource>
      <reporterfamilyname>Smith</reporterfamilyname>
      <qualification>1</qualification>
    </primarysource>
    <patient>
      <patientinitial>ABC</patientinitial>
      <patientonsetage>65</patientonsetage>
      <patientsex>1</patientsex>
      <patientweight>75.5</patientweight>
      <reaction>
        <primarysourcereaction>Nausea</primarysourcereaction>
      </reaction>
      <drug>
        <drugcharacterization>1</drugcharacterization>
        <medicinalproduct>ASPIRIN</medicinalproduct>
      </drug>
    </patient>
  </safetyreport>
</ichicsr>
"#;

const INVALID_JSON: &str = r#"{
  "safety_report": {
    "report_id": "US-ACME-2025-000043",
    "report_type": "1",
    "receive_date": "20250211"
  },
  "patient": {"sex": "2"},
  "drugs": [{"dosage_amount": "100"}],
  "reactions": [{"reaction_term": "Headache"}]
}"#;

const NO_PATIENT_JSON: &str = r#"{
  "safety_report": {
    "report_id": "US-ACME-2025-000044",
    "report_type": "1",
    "receive_date": "20250211"
  },
  "drugs": [{"drug_name": "IBUPROFEN"}],
  "reactions": [{"reaction_term": "Rash"}]
}"#;

const TRUNCATED_XML: &str = "<ichicsr><safetyreport><safetyreportid>US-ACME-1";

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}

fn mixed_batch(dir: &Path) {
    write(dir, "a_valid.xml", VALID_XML);
    write(dir, "b_invalid.json", INVALID_JSON);
    write(dir, "c_truncated.xml", TRUNCATED_XML);
}

#[test]
fn batch_converts_quarantines_and_continues_past_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    mixed_batch(dir.path());
    let config = PipelineConfig::new(dir.path());

    let summary = run_pipeline(&config).expect("run");

    assert_eq!(summary.total_files, 3);
    assert_eq!(
        (summary.converted, summary.rejected, summary.failed),
        (1, 1, 1)
    );
    assert_eq!(summary.success_rate, 33.33);
    assert!(summary.has_failures());

    let statuses: Vec<_> = summary
        .files
        .iter()
        .map(|outcome| (outcome.file_id.as_str(), outcome.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a_valid", FileStatus::Converted),
            ("b_invalid", FileStatus::Rejected),
            ("c_truncated", FileStatus::Failed),
        ]
    );

    let xml_path = config.output_dir.join("US-ACME-2025-000042.xml");
    let xml = fs::read_to_string(&xml_path).expect("xml output");
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<safetyreportid>US-ACME-2025-000042</safetyreportid>"));
    assert_eq!(summary.files[0].output.as_deref(), Some(xml_path.as_path()));
    assert_eq!(summary.files[0].sha256.as_ref().map(String::len), Some(64));

    let quarantined = fs::read_to_string(config.error_dir.join("b_invalid.validation.json"))
        .expect("quarantine file");
    let result: ValidationResult = serde_json::from_str(&quarantined).expect("result json");
    assert!(!result.is_valid);
    assert_eq!(result.report_id, "US-ACME-2025-000043");
    assert_eq!(
        result.errors,
        vec!["Drug 1: Missing drug_name and medicinal_product"]
    );

    assert!(summary.files[2].sha256.is_none());
    assert!(!summary.files[2].errors.is_empty());
}

#[test]
fn summary_json_records_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    mixed_batch(dir.path());
    let config = PipelineConfig::new(dir.path());

    run_pipeline(&config).expect("run");

    let raw = fs::read_to_string(config.summary_path()).expect("summary.json");
    let summary: serde_json::Value = serde_json::from_str(&raw).expect("summary json");
    assert_eq!(summary["total_files"], 3);
    assert_eq!(summary["converted"], 1);
    assert_eq!(summary["rejected"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["files"][0]["status"], "converted");
    assert_eq!(summary["files"][2]["status"], "failed");
    assert!(summary["started_at"].is_string());
    assert!(summary["duration_ms"].is_u64());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    mixed_batch(dir.path());
    let mut config = PipelineConfig::new(dir.path());
    config.dry_run = true;

    let summary = run_pipeline(&config).expect("run");

    assert_eq!(summary.converted, 1);
    assert!(summary.files.iter().all(|outcome| outcome.output.is_none()));
    assert!(!config.output_dir.exists());
}

#[test]
fn overrides_and_json_output_are_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "case.xml", VALID_XML);
    let out = tempfile::tempdir().expect("out");
    let mut config = PipelineConfig::new(dir.path());
    config.output_dir = out.path().to_path_buf();
    config.write_json = true;
    config.render.occurrence_country = Some("DE".to_string());

    let summary = run_pipeline(&config).expect("run");

    assert!(!summary.has_failures());
    let xml = fs::read_to_string(out.path().join("US-ACME-2025-000042.xml")).expect("xml");
    assert!(xml.contains("<occurcountry>DE</occurcountry>"));
    let json = fs::read_to_string(out.path().join("json/US-ACME-2025-000042.json"))
        .expect("standard record json");
    assert!(json.contains("\"report_identifier\": \"US-ACME-2025-000042\""));
}

#[test]
fn valid_report_without_patient_fails_conversion() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "no_patient.json", NO_PATIENT_JSON);
    write(dir.path(), "valid.xml", VALID_XML);
    let config = PipelineConfig::new(dir.path());

    let summary = run_pipeline(&config).expect("run");

    assert_eq!((summary.converted, summary.failed), (1, 1));
    let failed = &summary.files[0];
    assert_eq!(failed.file_id, "no_patient");
    assert_eq!(failed.status, FileStatus::Failed);
    assert!(failed.errors[0].contains("missing required section: patient"));
}

#[test]
fn shared_stems_get_distinct_quarantine_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "case.json", INVALID_JSON);
    write(
        dir.path(),
        "case.xml",
        "<safetyreport><safetyreportid>US-ACME-2025-000045</safetyreportid>\
         <reporttype>1</reporttype></safetyreport>",
    );
    let config = PipelineConfig::new(dir.path());

    let summary = run_pipeline(&config).expect("run");

    assert_eq!(summary.rejected, 2);
    let ids: Vec<_> = summary.files.iter().map(|o| o.file_id.as_str()).collect();
    assert_eq!(ids, vec!["case", "case.xml"]);
    assert!(config.error_dir.join("case.validation.json").is_file());
    assert!(config.error_dir.join("case.xml.validation.json").is_file());
}

#[test]
fn missing_input_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = PipelineConfig::new(dir.path().join("absent"));

    assert!(run_pipeline(&config).is_err());
}

#[test]
fn validate_directory_reports_each_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    mixed_batch(dir.path());

    let outcomes = validate_directory(dir.path(), u64::MAX).expect("validate");

    let valid: Vec<_> = outcomes.iter().map(|outcome| outcome.is_valid()).collect();
    assert_eq!(valid, vec![true, false, false]);
    assert!(outcomes[2].result.is_err());
    assert!(!dir.path().join("output").exists());
}

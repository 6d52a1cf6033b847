pub mod codes;
pub mod error;
pub mod event;
pub mod form;
pub mod numeric;
pub mod standard;
pub mod validation;

pub use codes::{DrugRole, Gender};
pub use error::{ModelError, Result};
pub use event::AdverseEvent;
pub use form::{
    DrugRecord, Organization, PatientRecord, PrimarySource, RawForm, ReactionRecord,
    SafetyReport, SeriousnessFlags, non_empty,
};
pub use numeric::parse_number;
pub use standard::{
    AdverseReaction, Demographics, Medication, Reporter, Seriousness, StandardRecord,
};
pub use validation::{Finding, Severity, UNKNOWN_REPORT_ID, ValidationResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_result_counts() {
        let result = ValidationResult::from_findings(
            "US-ACME-0001",
            vec![
                Finding::error("Missing report_type"),
                Finding::warning("Missing sender organization"),
                Finding::warning("No adverse reactions reported"),
            ],
        );
        assert!(!result.is_valid);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 2);
    }

    #[test]
    fn result_serializes() {
        let result = ValidationResult::from_findings(UNKNOWN_REPORT_ID, vec![]);
        let json = serde_json::to_string(&result).expect("serialize result");
        let round: ValidationResult = serde_json::from_str(&json).expect("deserialize result");
        assert_eq!(round, result);
        assert!(round.is_valid);
    }
}

//! E2B(R2) report validation.
//!
//! - **fields**: single-value and single-entity validators
//! - **engine**: report-level validation built from the field validators

mod engine;
pub mod fields;

pub use engine::{validate_complete_report, validate_e2b_data};
pub use fields::{
    validate_date_format, validate_drug_data, validate_patient_data, validate_reaction_data,
    validate_report_id_format,
};

use e2b_model::{RawForm, ValidationResult};
use tracing::info;

/// A form that failed validation together with the result explaining why.
#[derive(Debug, Clone)]
pub struct RejectedForm {
    pub form: RawForm,
    pub result: ValidationResult,
}

/// A batch of forms split by validity.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub valid: Vec<(RawForm, ValidationResult)>,
    pub invalid: Vec<RejectedForm>,
}

impl Partition {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }
}

/// Run [`validate_complete_report`] over a batch and split it into valid and
/// invalid forms. Batch order is preserved within each side.
pub fn partition_forms(forms: Vec<RawForm>) -> Partition {
    let mut partition = Partition::default();
    for form in forms {
        let result = validate_complete_report(&form);
        if result.is_valid {
            partition.valid.push((form, result));
        } else {
            partition.invalid.push(RejectedForm { form, result });
        }
    }
    info!(
        valid = partition.valid.len(),
        invalid = partition.invalid.len(),
        "validation complete"
    );
    partition
}

//! ICH E2B(R2) code lists used by validation, standardization, and rendering.

use serde::{Deserialize, Serialize};

/// Report type codes (1=spontaneous, 2=study, 3=other, 4=not available to sender).
pub const REPORT_TYPE_CODES: &[&str] = &["1", "2", "3", "4"];

/// Accepted values of the report-level `serious` flag. Absence is also accepted.
pub const SERIOUS_CODES: &[&str] = &["0", "1"];

/// Patient sex codes (0=unknown, 1=male, 2=female).
pub const SEX_CODES: &[&str] = &["0", "1", "2"];

/// Drug characterization codes (1=suspect, 2=concomitant, 3=interacting).
pub const DRUG_CHARACTERIZATION_CODES: &[&str] = &["1", "2", "3"];

/// Date format code for CCYYMMDD dates in the safety report block.
pub const DATE_FORMAT_CCYYMMDD: &str = "102";

/// Date format code for the message header date.
pub const DATE_FORMAT_MESSAGE: &str = "204";

/// Source tag stamped on every standardized record.
pub const REPORT_SOURCE: &str = "E2B_R2_MEDWATCH";

/// Reporter type recorded when the primary source carries no title.
pub const UNKNOWN_REPORTER_TYPE: &str = "Unknown";

/// Flag value meaning "yes" in E2B(R2) boolean-as-enum fields.
pub const FLAG_YES: &str = "1";

/// Flag value meaning "no" in E2B(R2) boolean-as-enum fields.
pub const FLAG_NO: &str = "2";

/// Normalized patient gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "F",
            Gender::Male => "M",
            Gender::Unknown => "U",
        }
    }
}

/// Normalized role of a drug in the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrugRole {
    Suspect,
    Concomitant,
    Interacting,
}

impl DrugRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DrugRole::Suspect => "suspect",
            DrugRole::Concomitant => "concomitant",
            DrugRole::Interacting => "interacting",
        }
    }

    /// The E2B(R2) `drugcharacterization` code for this role.
    pub fn characterization_code(self) -> &'static str {
        match self {
            DrugRole::Suspect => "1",
            DrugRole::Concomitant => "2",
            DrugRole::Interacting => "3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_letters() {
        assert_eq!(Gender::Female.as_str(), "F");
        assert_eq!(Gender::Unknown.as_str(), "U");
    }

    #[test]
    fn role_codes() {
        assert_eq!(DrugRole::Suspect.characterization_code(), "1");
        assert_eq!(DrugRole::Interacting.as_str(), "interacting");
    }
}

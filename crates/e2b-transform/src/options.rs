//! Standardization options.
//!
//! The defaults reproduce the legacy code mappings, which collapse unknown
//! sex to male and interacting drugs to concomitant. The strict mappings keep
//! those distinctions.

use serde::{Deserialize, Serialize};

use e2b_model::{DrugRole, Gender};

/// How the E2B `patientsex` code is mapped to a [`Gender`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderMapping {
    /// `2` is female, everything else (including absent) is male.
    #[default]
    Legacy,
    /// `1` is male, `2` is female, everything else is unknown.
    Strict,
}

impl GenderMapping {
    pub fn map(self, sex: Option<&str>) -> Gender {
        let sex = sex.map(str::trim);
        match self {
            GenderMapping::Legacy => {
                if sex == Some("2") {
                    Gender::Female
                } else {
                    Gender::Male
                }
            }
            GenderMapping::Strict => match sex {
                Some("1") => Gender::Male,
                Some("2") => Gender::Female,
                _ => Gender::Unknown,
            },
        }
    }
}

/// How the E2B `drugcharacterization` code is mapped to a [`DrugRole`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleMapping {
    /// `1` is suspect, everything else is concomitant.
    #[default]
    Legacy,
    /// `1` is suspect, `3` is interacting, everything else is concomitant.
    Strict,
}

impl RoleMapping {
    pub fn map(self, characterization: Option<&str>) -> DrugRole {
        match (self, characterization.map(str::trim)) {
            (_, Some("1")) => DrugRole::Suspect,
            (RoleMapping::Strict, Some("3")) => DrugRole::Interacting,
            _ => DrugRole::Concomitant,
        }
    }
}

/// Options for [`transform_to_standard`](crate::transform_to_standard).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizeOptions {
    pub gender_mapping: GenderMapping,
    pub role_mapping: RoleMapping,
    /// Transmission date used when the report does not carry one.
    pub default_transmission_date: Option<String>,
}

impl StandardizeOptions {
    /// Options with both strict mappings enabled.
    pub fn strict() -> Self {
        Self {
            gender_mapping: GenderMapping::Strict,
            role_mapping: RoleMapping::Strict,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_gender_collapses_to_male() {
        let legacy = GenderMapping::Legacy;
        assert_eq!(legacy.map(Some("2")), Gender::Female);
        assert_eq!(legacy.map(Some("1")), Gender::Male);
        assert_eq!(legacy.map(Some("0")), Gender::Male);
        assert_eq!(legacy.map(None), Gender::Male);
    }

    #[test]
    fn strict_gender_keeps_unknown() {
        let strict = GenderMapping::Strict;
        assert_eq!(strict.map(Some("2")), Gender::Female);
        assert_eq!(strict.map(Some("1")), Gender::Male);
        assert_eq!(strict.map(Some("0")), Gender::Unknown);
        assert_eq!(strict.map(None), Gender::Unknown);
    }

    #[test]
    fn role_mappings() {
        assert_eq!(RoleMapping::Legacy.map(Some("1")), DrugRole::Suspect);
        assert_eq!(RoleMapping::Legacy.map(Some("3")), DrugRole::Concomitant);
        assert_eq!(RoleMapping::Legacy.map(None), DrugRole::Concomitant);
        assert_eq!(RoleMapping::Strict.map(Some("3")), DrugRole::Interacting);
        assert_eq!(RoleMapping::Strict.map(Some("2")), DrugRole::Concomitant);
    }
}

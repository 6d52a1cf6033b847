//! Canonical standardized record consumed by the XML renderer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codes::{DrugRole, Gender, UNKNOWN_REPORTER_TYPE};

/// A fully standardized safety report.
///
/// Every value the renderer writes is present here; optional source values are
/// kept as `Option` and rendered as empty elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRecord {
    pub report_identifier: String,
    pub report_source: String,
    pub report_version: String,
    pub report_type: Option<String>,
    pub message_number: String,
    pub is_serious: bool,
    /// Serious flag as reported, written back unchanged.
    pub serious_code: Option<String>,
    pub seriousness: Seriousness,
    pub seriousness_reasons: BTreeSet<String>,
    pub received_date: Option<String>,
    pub receipt_date: Option<String>,
    pub transmission_date: Option<String>,
    pub occurrence_country: Option<String>,
    pub patient_identifier: String,
    pub patient_demographics: Demographics,
    pub medications: Vec<Medication>,
    pub adverse_reactions: Vec<AdverseReaction>,
    pub reporter: Reporter,
    pub submitter_organization: Option<String>,
    pub receiver_organization: Option<String>,
}

/// Seriousness sub-flags resolved to booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seriousness {
    pub death: bool,
    pub life_threatening: bool,
    pub hospitalization: bool,
    pub disabling: bool,
    pub congenital_anomaly: bool,
    pub other: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub initials: Option<String>,
    pub age_value: Option<String>,
    pub age_unit: Option<String>,
    pub gender: Gender,
    /// Sex code as reported; `gender` may collapse it.
    pub sex_code: Option<String>,
    /// Weight in kilograms, `0.0` when not reported.
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub product_code: Option<String>,
    pub role: DrugRole,
    /// Characterization code as reported, kept so rendering does not depend on
    /// how roles were collapsed.
    pub characterization: Option<String>,
    pub indication: Option<String>,
    pub dose: Option<String>,
    pub dose_amount: Option<String>,
    pub dose_unit: Option<String>,
    pub dosage_form: Option<String>,
    pub administration_route: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Medication {
    /// Free-text dosage, falling back to the structured amount and unit.
    pub fn dosage_text(&self) -> String {
        if let Some(dose) = self.dose.as_deref().filter(|d| !d.trim().is_empty()) {
            return dose.trim().to_string();
        }
        [self.dose_amount.as_deref(), self.dose_unit.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdverseReaction {
    pub term: String,
    pub meddra_code: Option<String>,
    pub meddra_version: Option<String>,
    pub preferred_term: Option<String>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    /// Reporter title, `None` when the source gave none.
    pub reporter_type: Option<String>,
    pub qualification: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub country: Option<String>,
}

impl Reporter {
    /// Title for display, with a placeholder when none was reported.
    pub fn display_type(&self) -> &str {
        self.reporter_type.as_deref().unwrap_or(UNKNOWN_REPORTER_TYPE)
    }
}

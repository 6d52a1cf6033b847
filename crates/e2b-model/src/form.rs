//! As-parsed input forms.
//!
//! Every scalar is optional: a form is whatever the source document contained,
//! and deciding what is missing is the validator's job, not the parser's.

use serde::{Deserialize, Serialize};

use crate::codes::FLAG_YES;

/// Returns the value when it is present and not blank.
///
/// Source documents frequently carry empty elements; those count as absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// A parsed adverse-event report form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawForm {
    /// Identifier of the source file (usually the file stem).
    pub file_id: String,
    pub message_type: Option<String>,
    pub message_format_version: Option<String>,
    pub message_format_release: Option<String>,
    pub message_number: Option<String>,
    pub sender: Option<Organization>,
    pub receiver: Option<Organization>,
    pub safety_report: Option<SafetyReport>,
    pub primary_source: Option<PrimarySource>,
    pub patient: Option<PatientRecord>,
    pub drugs: Vec<DrugRecord>,
    pub reactions: Vec<ReactionRecord>,
}

impl RawForm {
    /// The report id, if the safety report block carries one.
    pub fn report_id(&self) -> Option<&str> {
        self.safety_report
            .as_ref()
            .and_then(|report| non_empty(&report.report_id))
    }
}

/// Sender or receiver organization of the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub organization: Option<String>,
    /// Organization type code (1=pharmaceutical company, 3=regulatory authority, ...).
    #[serde(alias = "sender_type", alias = "receiver_type")]
    pub organization_type: Option<String>,
}

/// The `safetyreport` administrative block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyReport {
    #[serde(alias = "safety_report_id")]
    pub report_id: Option<String>,
    #[serde(alias = "safety_report_version")]
    pub report_version: Option<String>,
    pub report_type: Option<String>,
    pub serious: Option<String>,
    #[serde(flatten)]
    pub seriousness: SeriousnessFlags,
    /// Criterion names (e.g. `death`, `hospitalization`) as given by the source.
    pub seriousness_criteria: Vec<String>,
    pub receive_date: Option<String>,
    pub receipt_date: Option<String>,
    pub transmission_date: Option<String>,
    pub occur_country: Option<String>,
}

/// Individual seriousness sub-flags, each "1" (yes) or "2" (no).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriousnessFlags {
    #[serde(rename = "seriousness_death")]
    pub death: Option<String>,
    #[serde(rename = "seriousness_life_threatening")]
    pub life_threatening: Option<String>,
    #[serde(rename = "seriousness_hospitalization")]
    pub hospitalization: Option<String>,
    #[serde(rename = "seriousness_disabling")]
    pub disabling: Option<String>,
    #[serde(rename = "seriousness_congenital_anomaly")]
    pub congenital_anomaly: Option<String>,
    #[serde(rename = "seriousness_other")]
    pub other: Option<String>,
}

impl SeriousnessFlags {
    /// Criterion names whose flag is set to "1", in E2B(R2) field order.
    pub fn criteria(&self) -> Vec<String> {
        [
            ("death", &self.death),
            ("life_threatening", &self.life_threatening),
            ("hospitalization", &self.hospitalization),
            ("disabling", &self.disabling),
            ("congenital_anomaly", &self.congenital_anomaly),
            ("other", &self.other),
        ]
        .into_iter()
        .filter(|(_, flag)| non_empty(flag).map(str::trim) == Some(FLAG_YES))
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

/// The person or organization that first reported the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimarySource {
    pub reporter_title: Option<String>,
    pub reporter_given_name: Option<String>,
    pub reporter_family_name: Option<String>,
    pub reporter_country: Option<String>,
    /// Qualification code (1=physician, 2=pharmacist, 3=other health professional, ...).
    pub qualification: Option<String>,
}

/// Patient demographics as reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    pub initials: Option<String>,
    pub age: Option<String>,
    pub age_unit: Option<String>,
    pub sex: Option<String>,
    pub weight: Option<String>,
    pub weight_unit: Option<String>,
}

/// One drug entry of the case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugRecord {
    #[serde(alias = "drug_characterization")]
    pub characterization: Option<String>,
    pub drug_name: Option<String>,
    pub medicinal_product: Option<String>,
    #[serde(alias = "drug_indication")]
    pub indication: Option<String>,
    /// Free-text dosage description (e.g. "50mg twice daily").
    pub dosage: Option<String>,
    pub dosage_amount: Option<String>,
    pub dosage_unit: Option<String>,
    pub dosage_form: Option<String>,
    pub route: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One adverse reaction of the case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionRecord {
    pub reaction_term: Option<String>,
    /// MedDRA lowest level term code.
    pub meddra_code: Option<String>,
    pub meddra_version: Option<String>,
    /// MedDRA preferred term.
    pub meddra_preferred_term: Option<String>,
    pub outcome: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_treats_blank_as_absent() {
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&Some("X".to_string())), Some("X"));
    }

    #[test]
    fn criteria_follow_flags_set_to_yes() {
        let flags = SeriousnessFlags {
            death: Some("2".to_string()),
            hospitalization: Some("1".to_string()),
            other: Some("1".to_string()),
            ..SeriousnessFlags::default()
        };
        assert_eq!(flags.criteria(), vec!["hospitalization", "other"]);
    }
}

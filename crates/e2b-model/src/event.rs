//! Intermediate entity set produced by the form extractor.

use serde::{Deserialize, Serialize};

use crate::form::{
    DrugRecord, Organization, PatientRecord, PrimarySource, ReactionRecord, SeriousnessFlags,
};

/// Clinically relevant content of one form, keyed by concept rather than by
/// source schema position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdverseEvent {
    pub report_id: Option<String>,
    pub report_version: Option<String>,
    pub report_type: Option<String>,
    pub message_number: Option<String>,
    pub serious: bool,
    pub serious_code: Option<String>,
    pub seriousness: SeriousnessFlags,
    pub seriousness_criteria: Vec<String>,
    pub receive_date: Option<String>,
    pub receipt_date: Option<String>,
    pub transmission_date: Option<String>,
    pub occur_country: Option<String>,
    pub patient_id: String,
    pub patient: Option<PatientRecord>,
    pub drugs: Vec<DrugRecord>,
    pub reactions: Vec<ReactionRecord>,
    pub sender: Option<Organization>,
    pub receiver: Option<Organization>,
    pub primary_source: Option<PrimarySource>,
}

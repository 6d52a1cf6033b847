//! ICH E2B(R2) XML rendering.

use std::io::Write;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use e2b_model::codes::{DATE_FORMAT_CCYYMMDD, DATE_FORMAT_MESSAGE, FLAG_NO, FLAG_YES};
use e2b_model::{AdverseReaction, Demographics, Medication, Reporter, StandardRecord};

use crate::common::{
    DEFAULT_OCCURRENCE_COUNTRY, ICHICSR_LANG, MESSAGE_FORMAT_RELEASE, MESSAGE_FORMAT_VERSION,
    MESSAGE_TYPE, ensure_parent_dir, format_numeric, strip_blank_lines, write_optional_element,
    write_text_element,
};
use crate::error::{ReportError, Result};

/// Overrides applied while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// `occurcountry` override. Without it the record's occurrence country is
    /// used, then [`DEFAULT_OCCURRENCE_COUNTRY`].
    pub occurrence_country: Option<String>,
    /// `messagesenderidentifier` override for the submitter organization.
    pub sender_identifier: Option<String>,
    /// `messagereceiveridentifier` override for the receiver organization.
    pub receiver_identifier: Option<String>,
}

/// Render a standardized record as an E2B(R2) `ichicsr` document.
///
/// Output is indented with two spaces, contains no blank lines, and ends with
/// a newline. Identical input always yields identical bytes.
pub fn render_e2b_xml(record: &StandardRecord, options: &RenderOptions) -> Result<String> {
    if record.report_identifier.trim().is_empty() {
        return Err(ReportError::MissingValue("report_identifier"));
    }

    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("ichicsr");
    root.push_attribute(("lang", ICHICSR_LANG));
    xml.write_event(Event::Start(root))?;

    write_message_header(&mut xml, record, options)?;
    write_safety_report(&mut xml, record, options)?;

    xml.write_event(Event::End(BytesEnd::new("ichicsr")))?;

    let document = String::from_utf8(xml.into_inner())?;
    let document = strip_blank_lines(&document);
    debug!(
        report_id = %record.report_identifier,
        bytes = document.len(),
        "rendered E2B XML"
    );
    Ok(document)
}

/// Render `record` and write it to `path`, creating parent directories.
pub fn write_e2b_xml(path: &Path, record: &StandardRecord, options: &RenderOptions) -> Result<()> {
    let document = render_e2b_xml(record, options)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, document.as_bytes()).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        report_id = %record.report_identifier,
        path = %path.display(),
        "wrote E2B XML"
    );
    Ok(())
}

fn write_message_header<W: Write>(
    xml: &mut Writer<W>,
    record: &StandardRecord,
    options: &RenderOptions,
) -> Result<()> {
    let sender = options
        .sender_identifier
        .as_deref()
        .or(record.submitter_organization.as_deref());
    let receiver = options
        .receiver_identifier
        .as_deref()
        .or(record.receiver_organization.as_deref());

    xml.write_event(Event::Start(BytesStart::new("ichicsrmessageheader")))?;
    write_text_element(xml, "messagetype", MESSAGE_TYPE)?;
    write_text_element(xml, "messageformatversion", MESSAGE_FORMAT_VERSION)?;
    write_text_element(xml, "messageformatrelease", MESSAGE_FORMAT_RELEASE)?;
    write_text_element(xml, "messagenumb", &record.message_number)?;
    write_optional_element(xml, "messagesenderidentifier", sender)?;
    write_optional_element(xml, "messagereceiveridentifier", receiver)?;
    write_text_element(xml, "messagedateformat", DATE_FORMAT_MESSAGE)?;
    write_optional_element(xml, "messagedate", record.transmission_date.as_deref())?;
    xml.write_event(Event::End(BytesEnd::new("ichicsrmessageheader")))?;
    Ok(())
}

fn write_safety_report<W: Write>(
    xml: &mut Writer<W>,
    record: &StandardRecord,
    options: &RenderOptions,
) -> Result<()> {
    let occurrence_country = options
        .occurrence_country
        .as_deref()
        .or(record.occurrence_country.as_deref())
        .unwrap_or(DEFAULT_OCCURRENCE_COUNTRY);
    let flag = |set: bool| if set { FLAG_YES } else { FLAG_NO };
    let serious = record
        .serious_code
        .as_deref()
        .or(record.is_serious.then_some(FLAG_YES));

    xml.write_event(Event::Start(BytesStart::new("safetyreport")))?;
    write_text_element(xml, "safetyreportversion", &record.report_version)?;
    write_text_element(xml, "safetyreportid", &record.report_identifier)?;
    write_optional_element(xml, "primarysourcecountry", record.reporter.country.as_deref())?;
    write_text_element(xml, "occurcountry", occurrence_country)?;
    write_optional_element(xml, "transmissiondate", record.transmission_date.as_deref())?;
    write_text_element(xml, "transmissiondateformat", DATE_FORMAT_CCYYMMDD)?;
    write_optional_element(xml, "reporttype", record.report_type.as_deref())?;
    write_optional_element(xml, "serious", serious)?;
    write_text_element(xml, "seriousnessdeath", flag(record.seriousness.death))?;
    write_text_element(
        xml,
        "seriousnesslifethreatening",
        flag(record.seriousness.life_threatening),
    )?;
    write_text_element(
        xml,
        "seriousnesshospitalization",
        flag(record.seriousness.hospitalization),
    )?;
    write_text_element(xml, "seriousnessdisabling", flag(record.seriousness.disabling))?;
    write_optional_element(xml, "receivedate", record.received_date.as_deref())?;
    write_text_element(xml, "receivedateformat", DATE_FORMAT_CCYYMMDD)?;
    write_optional_element(xml, "receiptdate", record.receipt_date.as_deref())?;
    write_text_element(xml, "receiptdateformat", DATE_FORMAT_CCYYMMDD)?;

    write_primary_source(xml, &record.reporter)?;

    xml.write_event(Event::Start(BytesStart::new("patient")))?;
    write_demographics(xml, &record.patient_demographics)?;
    for reaction in &record.adverse_reactions {
        write_reaction(xml, reaction)?;
    }
    for medication in &record.medications {
        write_drug(xml, medication)?;
    }
    xml.write_event(Event::End(BytesEnd::new("patient")))?;

    xml.write_event(Event::End(BytesEnd::new("safetyreport")))?;
    Ok(())
}

fn write_primary_source<W: Write>(xml: &mut Writer<W>, reporter: &Reporter) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("primarysource")))?;
    write_optional_element(xml, "reportertitle", reporter.reporter_type.as_deref())?;
    write_optional_element(xml, "reportergivename", reporter.given_name.as_deref())?;
    write_optional_element(xml, "reporterfamilyname", reporter.family_name.as_deref())?;
    write_optional_element(xml, "reportercountry", reporter.country.as_deref())?;
    write_optional_element(xml, "qualification", reporter.qualification.as_deref())?;
    xml.write_event(Event::End(BytesEnd::new("primarysource")))?;
    Ok(())
}

fn write_demographics<W: Write>(xml: &mut Writer<W>, demographics: &Demographics) -> Result<()> {
    // Zero is the "not reported" weight.
    let weight = if demographics.weight_kg == 0.0 {
        String::new()
    } else {
        format_numeric(demographics.weight_kg)
    };

    write_optional_element(xml, "patientinitial", demographics.initials.as_deref())?;
    write_optional_element(xml, "patientonsetage", demographics.age_value.as_deref())?;
    write_optional_element(xml, "patientonsetageunit", demographics.age_unit.as_deref())?;
    write_optional_element(xml, "patientsex", demographics.sex_code.as_deref())?;
    write_text_element(xml, "patientweight", &weight)?;
    Ok(())
}

fn write_reaction<W: Write>(xml: &mut Writer<W>, reaction: &AdverseReaction) -> Result<()> {
    let llt = reaction.meddra_code.as_deref().unwrap_or(&reaction.term);

    xml.write_event(Event::Start(BytesStart::new("reaction")))?;
    write_text_element(xml, "primarysourcereaction", &reaction.term)?;
    write_optional_element(xml, "reactionmeddraversionllt", reaction.meddra_version.as_deref())?;
    write_text_element(xml, "reactionmeddrallt", llt)?;
    write_optional_element(xml, "reactionmeddrapt", reaction.preferred_term.as_deref())?;
    write_optional_element(xml, "reactionoutcome", reaction.outcome.as_deref())?;
    xml.write_event(Event::End(BytesEnd::new("reaction")))?;
    Ok(())
}

fn write_drug<W: Write>(xml: &mut Writer<W>, medication: &Medication) -> Result<()> {
    let characterization = medication
        .characterization
        .as_deref()
        .unwrap_or(medication.role.characterization_code());
    let product = medication.product_code.as_deref().unwrap_or(&medication.name);

    xml.write_event(Event::Start(BytesStart::new("drug")))?;
    write_text_element(xml, "drugcharacterization", characterization)?;
    write_text_element(xml, "medicinalproduct", product)?;

    xml.write_event(Event::Start(BytesStart::new("drugdosage")))?;
    write_text_element(xml, "drugdosagetext", &medication.dosage_text())?;
    write_optional_element(xml, "drugstructuredosagenumb", medication.dose_amount.as_deref())?;
    write_optional_element(xml, "drugstructuredosageunit", medication.dose_unit.as_deref())?;
    xml.write_event(Event::End(BytesEnd::new("drugdosage")))?;

    write_optional_element(xml, "drugdosageform", medication.dosage_form.as_deref())?;
    write_optional_element(
        xml,
        "drugadministrationroute",
        medication.administration_route.as_deref(),
    )?;
    write_optional_element(xml, "drugindication", medication.indication.as_deref())?;
    write_optional_element(xml, "drugstartdate", medication.start_date.as_deref())?;
    write_text_element(xml, "drugstartdateformat", DATE_FORMAT_CCYYMMDD)?;
    write_optional_element(xml, "drugenddate", medication.end_date.as_deref())?;
    write_text_element(xml, "drugenddateformat", DATE_FORMAT_CCYYMMDD)?;

    // The active substance is only distinct when the product is named separately.
    if medication.product_code.is_some() && product != medication.name && !medication.name.is_empty()
    {
        xml.write_event(Event::Start(BytesStart::new("activesubstance")))?;
        write_text_element(xml, "activesubstancename", &medication.name)?;
        xml.write_event(Event::End(BytesEnd::new("activesubstance")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("drug")))?;
    Ok(())
}

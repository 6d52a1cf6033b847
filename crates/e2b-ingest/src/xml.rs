//! E2B(R2) XML form parsing.
//!
//! The document is first read into a small element tree, then the tree is
//! mapped onto a [`RawForm`]. Accepted roots are `ichicsr` (message header plus
//! safety report) and a bare `safetyreport`. Unknown elements are ignored,
//! text is trimmed, and empty elements are treated as absent.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use tracing::debug;

use e2b_model::{
    DrugRecord, Organization, PatientRecord, PrimarySource, RawForm, ReactionRecord,
    SafetyReport, SeriousnessFlags,
};

use crate::discovery::file_id_for;
use crate::error::{IngestError, Result};

/// Parse an E2B(R2) XML file. The file stem becomes the form's `file_id`.
pub fn parse_e2b_xml(path: &Path) -> Result<RawForm> {
    let xml = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_e2b_xml_str(&xml, &file_id_for(path))
}

/// Parse an E2B(R2) XML document held in memory.
pub fn parse_e2b_xml_str(xml: &str, file_id: &str) -> Result<RawForm> {
    let root = read_tree(xml, file_id)?;

    let (header, report) = match root.name.as_str() {
        "ichicsr" => (root.child("ichicsrmessageheader"), root.child("safetyreport")),
        "safetyreport" => (None, Some(&root)),
        other => {
            return Err(IngestError::MissingRoot {
                file_id: file_id.to_string(),
                found: other.to_string(),
            });
        }
    };

    let mut form = RawForm {
        file_id: file_id.to_string(),
        ..RawForm::default()
    };

    if let Some(header) = header {
        form.message_type = header.text_of("messagetype");
        form.message_format_version = header.text_of("messageformatversion");
        form.message_format_release = header.text_of("messageformatrelease");
        form.message_number = header.text_of("messagenumb");
    }

    form.sender = report
        .and_then(|r| r.child("sender"))
        .map(|block| organization(block, "senderorganization", "sendertype"))
        .or_else(|| header_organization(header, "messagesenderidentifier"));
    form.receiver = report
        .and_then(|r| r.child("receiver"))
        .map(|block| organization(block, "receiverorganization", "receivertype"))
        .or_else(|| header_organization(header, "messagereceiveridentifier"));

    if let Some(report) = report {
        form.safety_report = Some(safety_report(report));
        form.primary_source = report.child("primarysource").map(primary_source);
        if let Some(patient) = report.child("patient") {
            form.patient = Some(patient_record(patient));
            form.reactions = patient.children_named("reaction").map(reaction).collect();
            form.drugs = patient.children_named("drug").map(drug).collect();
        }
    }

    debug!(
        file_id,
        report_id = form.report_id().unwrap_or_default(),
        drugs = form.drugs.len(),
        reactions = form.reactions.len(),
        "parsed E2B XML form"
    );
    Ok(form)
}

fn safety_report(el: &Element) -> SafetyReport {
    let seriousness = SeriousnessFlags {
        death: el.text_of("seriousnessdeath"),
        life_threatening: el.text_of("seriousnesslifethreatening"),
        hospitalization: el.text_of("seriousnesshospitalization"),
        disabling: el.text_of("seriousnessdisabling"),
        congenital_anomaly: el.text_of("seriousnesscongenitalanomali"),
        other: el.text_of("seriousnessother"),
    };
    SafetyReport {
        report_id: el.text_of("safetyreportid"),
        report_version: el.text_of("safetyreportversion"),
        report_type: el.text_of("reporttype"),
        serious: el.text_of("serious"),
        seriousness_criteria: seriousness.criteria(),
        seriousness,
        receive_date: el.text_of("receivedate"),
        receipt_date: el.text_of("receiptdate"),
        transmission_date: el.text_of("transmissiondate"),
        occur_country: el.text_of("occurcountry"),
    }
}

fn organization(el: &Element, name_tag: &str, type_tag: &str) -> Organization {
    Organization {
        organization: el.text_of(name_tag),
        organization_type: el.text_of(type_tag),
    }
}

fn header_organization(header: Option<&Element>, tag: &str) -> Option<Organization> {
    header.and_then(|h| h.text_of(tag)).map(|name| Organization {
        organization: Some(name),
        organization_type: None,
    })
}

fn primary_source(el: &Element) -> PrimarySource {
    PrimarySource {
        reporter_title: el.text_of("reportertitle"),
        reporter_given_name: el.text_of("reportergivename"),
        reporter_family_name: el.text_of("reporterfamilyname"),
        reporter_country: el.text_of("reportercountry"),
        qualification: el.text_of("qualification"),
    }
}

fn patient_record(el: &Element) -> PatientRecord {
    PatientRecord {
        initials: el.text_of("patientinitial"),
        age: el.text_of("patientonsetage"),
        age_unit: el.text_of("patientonsetageunit"),
        sex: el.text_of("patientsex"),
        weight: el.text_of("patientweight"),
        weight_unit: el.text_of("patientweightunit"),
    }
}

/// `reactionmeddrallt` carries either a numeric LLT code or, in older
/// senders, the term itself.
fn reaction(el: &Element) -> ReactionRecord {
    let mut record = ReactionRecord {
        reaction_term: el.text_of("primarysourcereaction"),
        meddra_code: None,
        meddra_version: el.text_of("reactionmeddraversionllt"),
        meddra_preferred_term: el.text_of("reactionmeddrapt"),
        outcome: el.text_of("reactionoutcome"),
    };
    if let Some(llt) = el.text_of("reactionmeddrallt") {
        if llt.bytes().all(|b| b.is_ascii_digit()) {
            record.meddra_code = Some(llt);
        } else if record.reaction_term.is_none() {
            record.reaction_term = Some(llt);
        }
    }
    record
}

fn drug(el: &Element) -> DrugRecord {
    // Dosage fields normally sit in <drugdosage>, some senders put them directly on <drug>.
    let dosage = el.child("drugdosage");
    let dosage_field = |tag: &str| {
        dosage
            .and_then(|d| d.text_of(tag))
            .or_else(|| el.text_of(tag))
    };
    DrugRecord {
        characterization: el.text_of("drugcharacterization"),
        drug_name: el
            .child("activesubstance")
            .and_then(|s| s.text_of("activesubstancename")),
        medicinal_product: el.text_of("medicinalproduct"),
        indication: el.text_of("drugindication"),
        dosage: dosage_field("drugdosagetext"),
        dosage_amount: dosage_field("drugstructuredosagenumb"),
        dosage_unit: dosage_field("drugstructuredosageunit"),
        dosage_form: el.text_of("drugdosageform"),
        route: el.text_of("drugadministrationroute"),
        start_date: el.text_of("drugstartdate"),
        end_date: el.text_of("drugenddate"),
    }
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).to_ascii_lowercase(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn text_of(&self, name: &str) -> Option<String> {
        self.child(name).and_then(Element::value)
    }

    fn value(&self) -> Option<String> {
        let text = self.text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn read_tree(xml: &str, file_id: &str) -> Result<Element> {
    let xml_error = |message: String| IngestError::Xml {
        file_id: file_id.to_string(),
        message,
    };

    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(e.to_string()))?
        {
            Event::Start(e) => stack.push(Element::named(e.local_name().as_ref())),
            Event::Empty(e) => attach(&mut stack, &mut root, Element::named(e.local_name().as_ref())),
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|err| xml_error(err.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(r) => {
                let resolved = resolve_reference(&r).map_err(xml_error)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| xml_error("document has no root element".to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn resolve_reference(reference: &BytesRef<'_>) -> std::result::Result<String, String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(|e| e.to_string())? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|e| e.to_string())?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| format!("unknown entity &{name};"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_references_are_resolved() {
        let xml = r#"<safetyreport>
            <safetyreportid>US-ACME-1</safetyreportid>
            <primarysource><reportergivename>Ann &amp; Lee &#233;</reportergivename></primarysource>
        </safetyreport>"#;
        let form = parse_e2b_xml_str(xml, "entities").expect("parse");
        let source = form.primary_source.expect("primary source");
        assert_eq!(source.reporter_given_name.as_deref(), Some("Ann & Lee é"));
    }

    #[test]
    fn empty_elements_are_absent() {
        let xml = "<safetyreport><safetyreportid/><reporttype>  </reporttype></safetyreport>";
        let form = parse_e2b_xml_str(xml, "empty").expect("parse");
        let report = form.safety_report.expect("report");
        assert_eq!(report.report_id, None);
        assert_eq!(report.report_type, None);
    }

    #[test]
    fn numeric_llt_is_a_code_and_text_llt_is_a_term() {
        let xml = r#"<safetyreport><patient>
            <reaction><primarysourcereaction>Nausea</primarysourcereaction><reactionmeddrallt>10028813</reactionmeddrallt></reaction>
            <reaction><reactionmeddrallt>Dizziness</reactionmeddrallt></reaction>
        </patient></safetyreport>"#;
        let form = parse_e2b_xml_str(xml, "llt").expect("parse");
        assert_eq!(form.reactions.len(), 2);
        assert_eq!(form.reactions[0].reaction_term.as_deref(), Some("Nausea"));
        assert_eq!(form.reactions[0].meddra_code.as_deref(), Some("10028813"));
        assert_eq!(form.reactions[1].reaction_term.as_deref(), Some("Dizziness"));
        assert_eq!(form.reactions[1].meddra_code, None);
    }

    #[test]
    fn unknown_root_is_rejected() {
        let err = parse_e2b_xml_str("<report/>", "other").expect_err("root");
        assert!(matches!(err, IngestError::MissingRoot { ref found, .. } if found == "report"));
    }

    #[test]
    fn mismatched_tags_are_xml_errors() {
        let err = parse_e2b_xml_str("<safetyreport><serious>1</reporttype></safetyreport>", "bad")
            .expect_err("mismatch");
        assert!(matches!(err, IngestError::Xml { .. }));
    }

    #[test]
    fn truncated_document_is_an_xml_error() {
        let err = parse_e2b_xml_str("<ichicsr><safetyreport>", "cut").expect_err("truncated");
        assert!(matches!(err, IngestError::Xml { .. }));
    }
}

//! E2B(R2) report output.
//!
//! - **E2B XML**: `ichicsr` documents for regulatory submission
//! - **JSON**: standard records, validation results, and run summaries

mod common;
mod e2b_xml;
mod error;
mod json;

pub use common::{DEFAULT_OCCURRENCE_COUNTRY, format_numeric};
pub use e2b_xml::{RenderOptions, render_e2b_xml, write_e2b_xml};
pub use error::{ReportError, Result};
pub use json::{write_json, write_standard_record_json, write_validation_result_json};

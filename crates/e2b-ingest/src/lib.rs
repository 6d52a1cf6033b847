//! Report form ingestion.
//!
//! Locates input files, parses E2B(R2) XML and JSON forms into
//! [`RawForm`](e2b_model::RawForm), and computes source checksums.

pub mod checksum;
pub mod discovery;
pub mod error;
pub mod json;
pub mod xml;

use std::path::Path;

use e2b_model::RawForm;
use tracing::debug;

pub use checksum::compute_file_sha256;
pub use discovery::{file_id_for, scan_for_files};
pub use error::{IngestError, Result};
pub use json::load_json_form;
pub use xml::{parse_e2b_xml, parse_e2b_xml_str};

/// Extensions [`read_form`] knows how to parse.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xml", "json"];

/// Default per-file size limit in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

/// Read one form, choosing the parser from the file extension.
///
/// Files larger than `max_bytes` are refused before being read.
pub fn read_form(path: &Path, max_bytes: u64) -> Result<RawForm> {
    let size = std::fs::metadata(path)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();
    if size > max_bytes {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }
    debug!(file = %path.display(), size, "reading form");

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xml") => parse_e2b_xml(path),
        Some("json") => load_json_form(path),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

//! JSON output writers.
//!
//! Standard records are the warehouse-facing sink; validation results are
//! written to the quarantine directory for rejected reports.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use e2b_model::{StandardRecord, ValidationResult};

use crate::common::ensure_parent_dir;
use crate::error::{ReportError, Result};

/// Write any serializable value as pretty JSON with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut body = serde_json::to_string_pretty(value).map_err(|e| ReportError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    body.push('\n');
    ensure_parent_dir(path)?;
    std::fs::write(path, body).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), "wrote JSON output");
    Ok(())
}

/// Persist a standardized record.
pub fn write_standard_record_json(path: &Path, record: &StandardRecord) -> Result<()> {
    write_json(path, record)
}

/// Persist the validation result of a rejected report.
pub fn write_validation_result_json(path: &Path, result: &ValidationResult) -> Result<()> {
    write_json(path, result)
}

//! JSON form loading.

use std::path::Path;

use tracing::debug;

use e2b_model::RawForm;

use crate::discovery::file_id_for;
use crate::error::{IngestError, Result};

/// Load a form serialized as JSON.
///
/// Keys follow the [`RawForm`] field names (with the aliases it accepts). A
/// missing or empty `file_id` is filled from the file stem.
pub fn load_json_form(path: &Path) -> Result<RawForm> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut form: RawForm = serde_json::from_str(&content).map_err(|e| IngestError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    if form.file_id.trim().is_empty() {
        form.file_id = file_id_for(path);
    }
    debug!(
        file_id = %form.file_id,
        drugs = form.drugs.len(),
        reactions = form.reactions.len(),
        "loaded JSON form"
    );
    Ok(form)
}

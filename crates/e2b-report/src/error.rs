use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rendering or writing report outputs.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The XML writer failed.
    #[error("failed to write XML: {0}")]
    Xml(#[from] std::io::Error),

    /// Rendered output was not valid UTF-8.
    #[error("rendered output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A value the document cannot be written without is empty.
    #[error("missing required value: {0}")]
    MissingValue(&'static str),

    /// Failed to create or write an output file.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a JSON output.
    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;

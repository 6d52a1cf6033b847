//! Error types for form ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating and reading report forms.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input directory does not exist or is not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// File extension is not a supported form format.
    #[error("unsupported form format: {path}")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    /// Malformed XML document.
    #[error("invalid XML in {file_id}: {message}")]
    Xml { file_id: String, message: String },

    /// Well-formed XML whose root is neither `ichicsr` nor `safetyreport`.
    #[error("unexpected root element <{found}> in {file_id}")]
    MissingRoot { file_id: String, found: String },

    /// Malformed JSON form.
    #[error("invalid JSON form {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

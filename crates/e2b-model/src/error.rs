use thiserror::Error;

/// Structural errors raised while moving a report between pipeline stages.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A section the stage cannot work without is absent.
    #[error("missing required section: {0}")]
    MissingSection(&'static str),
    /// A value that must be numeric could not be parsed.
    #[error("invalid numeric value for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;

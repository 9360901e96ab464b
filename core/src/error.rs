use thiserror::Error;

/// Result type for dicom2mids operations
pub type Result<T> = std::result::Result<T, MidsError>;

/// Error types for dicom2mids operations
///
/// Classification never produces an error: every classifier returns a
/// sentinel (`Unknown` / `None`) when no rule applies. Errors here are
/// reserved for I/O, the external converter, and malformed inputs.
#[derive(Error, Debug)]
pub enum MidsError {
    /// Expected metadata tag absent and no documented default applies
    #[error("missing metadata: {0}")]
    MissingMetadata(String),

    /// External converter exited with a non-zero status
    #[error("converter `{program}` exited with status {status}")]
    Conversion { program: String, status: i32 },

    /// A canonical key or filename component could not be parsed
    #[error("invalid canonical key: {0}")]
    InvalidKey(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar or metadata record (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tabular output error
    #[error("table error: {0}")]
    Table(#[from] csv::Error),
}

// Helper conversions
impl From<String> for MidsError {
    fn from(s: String) -> Self {
        MidsError::MissingMetadata(s)
    }
}

impl From<&str> for MidsError {
    fn from(s: &str) -> Self {
        MidsError::MissingMetadata(s.to_string())
    }
}

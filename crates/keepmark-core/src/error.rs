//! Error types for keepmark.

use thiserror::Error;

/// Result type alias using keepmark's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for keepmark operations.
///
/// Variants split into two severities: batch-fatal errors that abort a sync
/// run before or during note processing, and per-note recoverable errors
/// that skip the failing note and let the batch continue. See
/// [`Error::is_fatal`].
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication against the note source failed (fatal)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Querying the note source failed (fatal)
    #[error("Source query error: {0}")]
    SourceQuery(String),

    /// LLM enrichment failed after exhausting the retry budget (per-note)
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// A required field was absent from the extractor output (per-note)
    #[error("Extraction incomplete: missing field '{field}'")]
    Extraction { field: &'static str },

    /// Writing the note or an attachment to disk failed (per-note)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Version-control operation failed (per-note)
    #[error("VCS error: {0}")]
    Vcs(String),

    /// Configuration error (fatal)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True if this error aborts the whole batch rather than one note.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Authentication(_) | Error::SourceQuery(_) | Error::Config(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

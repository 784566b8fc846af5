//! Collaborator traits for keepmark.
//!
//! These seams keep the sync engine testable and the external services
//! (note source, LLM backend, attachment host, version control)
//! pluggable.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::NoteRecord;

/// Label transition applied to a note after export.
#[derive(Debug, Clone)]
pub struct LabelTransition {
    /// Label to remove (the "ready" marker).
    pub remove_label: String,
    /// Label to add (the "exported" marker).
    pub add_label: String,
    /// Whether to archive the note in the source.
    pub archive: bool,
}

/// Source of notes to export.
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Fetch all unarchived notes carrying `label`.
    async fn fetch_ready(&self, label: &str) -> Result<Vec<NoteRecord>>;

    /// Apply a label/archive transition to one note.
    async fn transition(&self, note_id: &str, transition: &LabelTransition) -> Result<()>;
}

/// LLM capability producing structured note metadata.
///
/// Returns the raw function-call argument string: best-effort
/// JSON-object-shaped text that is not guaranteed well-formed. Callers
/// recover fields with [`crate::extract::extract`]. Implementations own
/// their retry policy.
#[async_trait]
pub trait NoteEnricher: Send + Sync {
    async fn enrich(&self, title: &str, body: &str) -> Result<String>;
}

/// Fetches attachment bytes from the note source's media host.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    /// Fetch one attachment: bytes plus declared content type.
    async fn fetch(&self, media_url: &str) -> Result<(Vec<u8>, String)>;
}

/// Version-control sink for the archive repository.
#[async_trait]
pub trait VcsSink: Send + Sync {
    /// Make sure a usable local working copy exists (clone or pull).
    async fn ensure_local_copy(&self) -> Result<()>;

    /// Stage everything, commit with `message`, push the configured
    /// branch (creating it from the base branch on first push).
    async fn commit_and_push(&self, message: &str) -> Result<()>;
}

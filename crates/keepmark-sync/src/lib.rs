//! # keepmark-sync
//!
//! Sync orchestration and collaborator clients for keepmark: the note
//! source HTTP client, attachment downloads, the filesystem note store,
//! the git sink, and the engine sequencing them per note.

pub mod attachments;
pub mod engine;
pub mod git;
pub mod keep;
pub mod store;

pub use attachments::{extension_for_content_type, HttpAttachmentFetcher};
pub use engine::{NoteFailure, SyncEngine, SyncReport, SyncStage};
pub use git::GitSink;
pub use keep::{KeepClient, KeepConfig};
pub use store::NoteStore;

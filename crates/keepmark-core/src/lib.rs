//! # keepmark-core
//!
//! Core types, transforms, and traits for keepmark: exporting labeled
//! notes from a cloud note service into an LLM-enriched markdown archive.
//!
//! This crate is pure (no I/O beyond what callers inject): the tolerant
//! field extractor, the document assembler, artifact naming, and the
//! collaborator trait seams the sync engine is built on.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod markdown;
pub mod models;
pub mod naming;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::Config;
pub use document::{assemble_document, attachment_stem, AttachmentLink};
pub use error::{Error, Result};
pub use extract::{
    extract, ExtractedFields, FieldKind, FieldSpec, FieldValue, NOTE_FIELD_SCHEMA,
    NOTE_FIELD_SCHEMA_REDUCED,
};
pub use markdown::{autolink_urls, bulletize, replace_checkboxes};
pub use models::{AttachmentRef, GeneratedFields, NoteRecord, NOTE_TYPES};
pub use naming::{resolve_unique, sanitize_title, ILLEGAL_FILE_CHARS, MAX_FILENAME_LENGTH};
pub use traits::{AttachmentFetcher, LabelTransition, NoteEnricher, NoteSource, VcsSink};

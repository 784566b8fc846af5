//! Data model for keepmark.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::{ExtractedFields, FieldValue};

/// Known note type classifications produced by enrichment.
///
/// The extractor does not enforce membership; values outside this set are
/// preserved as-is.
pub const NOTE_TYPES: &[&str] = &["source", "idea", "entity", "definition"];

/// Reference to a media attachment owned by the note source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Source-side identifier of the attachment.
    pub id: String,
    /// URL the attachment bytes can be fetched from.
    pub media_url: String,
}

/// Read-only snapshot of one note fetched from the note source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Source-side note identifier.
    pub id: String,
    /// Note title, possibly empty.
    pub title: String,
    /// Note body text.
    pub body: String,
    /// Ordered attachment references.
    pub attachments: Vec<AttachmentRef>,
    /// Labels currently applied to the note.
    pub labels: Vec<String>,
    /// Whether the note is archived in the source.
    pub archived: bool,
}

/// Validated enrichment fields for one note.
///
/// Built from the tolerant extractor output; construction fails with
/// [`Error::Extraction`] when a required field is absent, which callers
/// treat as a per-note recoverable failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFields {
    /// Suggested title, non-empty after trim.
    pub note_title: String,
    /// Note type classification (see [`NOTE_TYPES`]; not enforced).
    pub note_type: String,
    /// Rewritten note body, markdown, may span multiple lines.
    pub note_rewrite: String,
    /// Key ideas as a raw markdown bullet list.
    pub note_ideas: String,
    /// Topics discussed in the note.
    pub note_topics_contained: Vec<String>,
    /// Related topics not directly discussed.
    pub note_topics_related: Vec<String>,
}

impl GeneratedFields {
    /// Validate extractor output into typed fields.
    pub fn from_extracted(fields: ExtractedFields) -> Result<Self> {
        let note_title = required_text(&fields, "note_title")?;
        if note_title.trim().is_empty() {
            return Err(Error::Extraction { field: "note_title" });
        }

        Ok(Self {
            note_title,
            note_type: required_text(&fields, "note_type")?,
            note_rewrite: required_text(&fields, "note_rewrite")?,
            note_ideas: required_text(&fields, "note_ideas")?,
            note_topics_contained: required_list(&fields, "note_topics_contained")?,
            note_topics_related: required_list(&fields, "note_topics_related")?,
        })
    }
}

fn required_text(fields: &ExtractedFields, field: &'static str) -> Result<String> {
    match fields.get(field) {
        Some(FieldValue::Text(s)) => Ok(s.clone()),
        _ => Err(Error::Extraction { field }),
    }
}

fn required_list(fields: &ExtractedFields, field: &'static str) -> Result<Vec<String>> {
    match fields.get(field) {
        Some(FieldValue::List(items)) => Ok(items.clone()),
        _ => Err(Error::Extraction { field }),
    }
}

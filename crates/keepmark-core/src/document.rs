//! Note document assembly.
//!
//! Combines the original note body (with inline transforms) and the
//! enrichment fields into the final markdown document. The section order
//! and literal tokens below are a compatibility surface with existing
//! archives; do not reorder or reword them.

use crate::markdown::{autolink_urls, bulletize, replace_checkboxes};
use crate::models::GeneratedFields;

/// A downloaded attachment referenced from the note document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    /// Display name for the embed, the file stem without extension.
    pub name: String,
    /// Path relative to the note file, pointing into the attachment dir.
    pub relative_path: String,
}

/// Derive the attachment file stem for one attachment of a note.
///
/// `{artifact-name-lowercased-with-spaces-as-hyphens}-{index}`.
pub fn attachment_stem(artifact_name: &str, index: usize) -> String {
    format!("{}-{}", artifact_name.to_lowercase().replace(' ', "-"), index)
}

/// Assemble the final markdown document for one note.
///
/// Pure transform: body glyph/URL rewrites, then attachment embeds, then
/// the generated-metadata section. Writing the result to storage is the
/// sink's responsibility.
pub fn assemble_document(
    body: &str,
    fields: &GeneratedFields,
    attachments: &[AttachmentLink],
) -> String {
    let mut doc = autolink_urls(&replace_checkboxes(body));

    for attachment in attachments {
        doc.push_str(&format!(
            "\n![{}]({})\n",
            attachment.name, attachment.relative_path
        ));
    }

    let contained = bulletize(&fields.note_topics_contained, true);
    let related = bulletize(&fields.note_topics_related, true);

    doc.push_str("\n\n---\n");
    doc.push_str(&format!("#type/{} (generated)\n\n", fields.note_type));
    doc.push_str(&format!("**Contained Topics**:\n{contained}\n\n"));
    doc.push_str(&format!("**Related Topics**:\n{related}\n\n"));
    doc.push_str("---\n\n");
    doc.push_str(&format!("**Suggested Title**: {}\n\n", fields.note_title));
    doc.push_str(&format!("**Key Ideas**:\n{}\n\n", fields.note_ideas));
    doc.push_str(&format!("**Rewritten Note**:\n{}\n\n", fields.note_rewrite));

    doc
}

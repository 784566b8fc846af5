//! Filesystem note store: the Inbox/Attachments layout inside the
//! archive working copy.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use keepmark_core::{Config, Error, Result};

/// Writes note documents and attachment files into the working copy.
///
/// Markdown files land in the inbox directory; attachment bytes land in
/// the attachment directory and are referenced from the note by a
/// relative link. Single-writer: uniqueness checks race against nobody.
pub struct NoteStore {
    inbox: PathBuf,
    attachments: PathBuf,
    /// Attachment directory name as used in relative links.
    attachments_rel: String,
}

impl NoteStore {
    /// Create a store for the configured working copy layout.
    pub fn new(config: &Config) -> Self {
        Self {
            inbox: config.inbox_path(),
            attachments: config.attachments_path(),
            attachments_rel: config.attachments_dir.clone(),
        }
    }

    /// Base names (extension stripped) of artifacts already in the inbox.
    pub fn existing_stems(&self) -> Result<HashSet<String>> {
        if !self.inbox.exists() {
            return Ok(HashSet::new());
        }
        let mut stems = HashSet::new();
        for entry in fs::read_dir(&self.inbox).map_err(storage_err)? {
            let entry = entry.map_err(storage_err)?;
            if let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) {
                stems.insert(stem.to_string());
            }
        }
        Ok(stems)
    }

    /// Write the markdown document for `stem`, returning its path.
    pub fn write_note(&self, stem: &str, content: &str) -> Result<PathBuf> {
        create_dir(&self.inbox)?;
        let path = self.inbox.join(format!("{stem}.md"));
        fs::write(&path, content).map_err(storage_err)?;
        debug!(path = %path.display(), "Wrote note document");
        Ok(path)
    }

    /// Write attachment bytes under `file_name`, returning the path.
    pub fn write_attachment(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        create_dir(&self.attachments)?;
        let path = self.attachments.join(file_name);
        fs::write(&path, bytes).map_err(storage_err)?;
        debug!(path = %path.display(), size = bytes.len(), "Wrote attachment");
        Ok(path)
    }

    /// Relative link from a note document to one attachment file.
    pub fn attachment_link(&self, file_name: &str) -> String {
        format!("{}/{}", self.attachments_rel, file_name)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(storage_err)
}

fn storage_err(e: std::io::Error) -> Error {
    Error::Storage(e.to_string())
}

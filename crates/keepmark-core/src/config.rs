//! Sync configuration.
//!
//! One explicit [`Config`] is constructed at process start and passed by
//! reference to collaborators. Core logic never reads the environment on
//! its own; `from_env` is the single place environment variables are
//! consulted.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default label marking notes ready for export.
pub const DEFAULT_READY_LABEL: &str = "Ready to Export";

/// Default label applied after a successful export.
pub const DEFAULT_EXPORTED_LABEL: &str = "Succesfully Exported";

/// Default feature branch receiving exported notes.
pub const DEFAULT_BRANCH: &str = "exported-notes";

/// Default branch the feature branch is created from.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Directory (relative to the working copy) holding exported markdown files.
pub const INBOX_DIR: &str = "Inbox";

/// Directory (relative to the working copy) holding downloaded attachments.
pub const ATTACHMENTS_DIR: &str = "Attachments";

/// Configuration for one sync process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Label selecting notes to export.
    pub ready_label: String,
    /// Label applied to notes after durable export.
    pub exported_label: String,
    /// Remote URL of the archive repository.
    pub repo_remote_url: String,
    /// Local working copy directory.
    pub repo_dir: PathBuf,
    /// Git remote name.
    pub git_remote: String,
    /// Feature branch exported notes are committed to.
    pub git_branch: String,
    /// Branch the feature branch is created from if it does not exist.
    pub git_base_branch: String,
    /// SSH command passed to git per invocation (no global env mutation).
    pub git_ssh_command: Option<String>,
    /// Markdown output directory, relative to the working copy.
    pub inbox_dir: String,
    /// Attachment directory, relative to the working copy.
    pub attachments_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ready_label: DEFAULT_READY_LABEL.to_string(),
            exported_label: DEFAULT_EXPORTED_LABEL.to_string(),
            repo_remote_url: String::new(),
            repo_dir: PathBuf::from("./archive"),
            git_remote: "origin".to_string(),
            git_branch: DEFAULT_BRANCH.to_string(),
            git_base_branch: DEFAULT_BASE_BRANCH.to_string(),
            git_ssh_command: None,
            inbox_dir: INBOX_DIR.to_string(),
            attachments_dir: ATTACHMENTS_DIR.to_string(),
        }
    }
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// `KEEPMARK_REPO_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let repo_remote_url = std::env::var("KEEPMARK_REPO_URL")
            .map_err(|_| Error::Config("KEEPMARK_REPO_URL is not set".to_string()))?;

        Ok(Self {
            ready_label: std::env::var("KEEPMARK_READY_LABEL")
                .unwrap_or_else(|_| DEFAULT_READY_LABEL.to_string()),
            exported_label: std::env::var("KEEPMARK_EXPORTED_LABEL")
                .unwrap_or_else(|_| DEFAULT_EXPORTED_LABEL.to_string()),
            repo_remote_url,
            repo_dir: std::env::var("KEEPMARK_REPO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./archive")),
            git_remote: std::env::var("KEEPMARK_GIT_REMOTE")
                .unwrap_or_else(|_| "origin".to_string()),
            git_branch: std::env::var("KEEPMARK_GIT_BRANCH")
                .unwrap_or_else(|_| DEFAULT_BRANCH.to_string()),
            git_base_branch: std::env::var("KEEPMARK_GIT_BASE_BRANCH")
                .unwrap_or_else(|_| DEFAULT_BASE_BRANCH.to_string()),
            git_ssh_command: std::env::var("KEEPMARK_GIT_SSH_COMMAND").ok(),
            inbox_dir: std::env::var("KEEPMARK_INBOX_DIR")
                .unwrap_or_else(|_| INBOX_DIR.to_string()),
            attachments_dir: std::env::var("KEEPMARK_ATTACHMENTS_DIR")
                .unwrap_or_else(|_| ATTACHMENTS_DIR.to_string()),
        })
    }

    /// Absolute path of the markdown output directory.
    pub fn inbox_path(&self) -> PathBuf {
        self.repo_dir.join(&self.inbox_dir)
    }

    /// Absolute path of the attachment directory.
    pub fn attachments_path(&self) -> PathBuf {
        self.repo_dir.join(&self.attachments_dir)
    }
}

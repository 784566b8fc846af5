//! HTTP client for the note source.
//!
//! Implements [`NoteSource`] against the note service's REST surface:
//! label-filtered listing plus per-note label/archive transitions.
//! Authentication failures (401/403) map to the batch-fatal
//! [`Error::Authentication`]. Listing failures are [`Error::SourceQuery`]
//! (batch-fatal, nothing to process); transition failures are the
//! recoverable [`Error::Request`], so one note's failed label flip never
//! aborts the rest of the batch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use keepmark_core::{
    AttachmentRef, Error, LabelTransition, NoteRecord, NoteSource, Result,
};

/// Default note service endpoint.
pub const DEFAULT_KEEP_URL: &str = "https://keep.googleapis.com/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the note source client.
#[derive(Debug, Clone)]
pub struct KeepConfig {
    /// Base URL of the note service API.
    pub base_url: String,
    /// Access token presented as a bearer credential.
    pub access_token: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl KeepConfig {
    /// Build from environment variables. `KEEP_ACCESS_TOKEN` is required.
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var("KEEP_ACCESS_TOKEN")
            .map_err(|_| Error::Config("KEEP_ACCESS_TOKEN is not set".to_string()))?;
        Ok(Self {
            base_url: std::env::var("KEEP_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_KEEP_URL.to_string()),
            access_token,
            timeout_seconds: std::env::var("KEEP_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

// Wire types for the note service.

#[derive(Debug, Deserialize)]
struct ListNotesResponse {
    #[serde(default)]
    notes: Vec<WireNote>,
}

#[derive(Debug, Deserialize)]
struct WireNote {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    labels: Vec<WireLabel>,
    #[serde(default)]
    attachments: Vec<WireAttachment>,
}

#[derive(Debug, Deserialize)]
struct WireLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireAttachment {
    id: String,
    #[serde(rename = "mediaUrl")]
    media_url: String,
}

#[derive(Debug, Serialize)]
struct TransitionRequest<'a> {
    #[serde(rename = "removeLabels")]
    remove_labels: Vec<&'a str>,
    #[serde(rename = "addLabels")]
    add_labels: Vec<&'a str>,
    archived: bool,
}

impl From<WireNote> for NoteRecord {
    fn from(note: WireNote) -> Self {
        NoteRecord {
            id: note.id,
            title: note.title,
            body: note.text,
            attachments: note
                .attachments
                .into_iter()
                .map(|a| AttachmentRef {
                    id: a.id,
                    media_url: a.media_url,
                })
                .collect(),
            labels: note.labels.into_iter().map(|l| l.name).collect(),
            archived: note.archived,
        }
    }
}

/// Note source client.
pub struct KeepClient {
    client: Client,
    config: KeepConfig,
}

impl KeepClient {
    /// Create a new client with the given configuration.
    pub fn new(config: KeepConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!("Initializing note source client: url={}", config.base_url);
        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(KeepConfig::from_env()?)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.access_token)
    }

    /// Map a non-success status on the listing path to the error taxonomy.
    fn query_error(status: u16, context: &str) -> Error {
        if status == 401 || status == 403 {
            Error::Authentication(format!("{context}: service returned {status}"))
        } else {
            Error::SourceQuery(format!("{context}: service returned {status}"))
        }
    }

    /// Map a non-success status on the transition path. Non-auth failures
    /// here are per-note recoverable.
    fn transition_error(status: u16, context: &str) -> Error {
        if status == 401 || status == 403 {
            Error::Authentication(format!("{context}: service returned {status}"))
        } else {
            Error::Request(format!("{context}: service returned {status}"))
        }
    }
}

#[async_trait]
impl NoteSource for KeepClient {
    async fn fetch_ready(&self, label: &str) -> Result<Vec<NoteRecord>> {
        let response = self
            .client
            .get(self.url("/notes"))
            .header("Authorization", self.bearer())
            .query(&[("label", label), ("archived", "false")])
            .send()
            .await
            .map_err(|e| Error::SourceQuery(format!("List notes failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::query_error(
                response.status().as_u16(),
                "List notes",
            ));
        }

        let body: ListNotesResponse = response
            .json()
            .await
            .map_err(|e| Error::SourceQuery(format!("Malformed note listing: {}", e)))?;

        let notes: Vec<NoteRecord> = body.notes.into_iter().map(NoteRecord::from).collect();
        debug!(result_count = notes.len(), label, "Fetched ready notes");
        Ok(notes)
    }

    async fn transition(&self, note_id: &str, transition: &LabelTransition) -> Result<()> {
        let request = TransitionRequest {
            remove_labels: vec![transition.remove_label.as_str()],
            add_labels: vec![transition.add_label.as_str()],
            archived: transition.archive,
        };

        let response = self
            .client
            .patch(self.url(&format!("/notes/{note_id}")))
            .header("Authorization", self.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Note transition failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::transition_error(
                response.status().as_u16(),
                "Note transition",
            ));
        }

        debug!(note_id, "Applied label transition");
        Ok(())
    }
}

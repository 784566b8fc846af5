//! Attachment download and content-type handling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use keepmark_core::{AttachmentFetcher, Error, Result};

/// Default request timeout for media downloads, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Map a declared content type to a file extension (with leading dot).
///
/// Only formats the note service actually serves are mapped; unknown types
/// get no extension rather than a guessed one. Parameters after `;` are
/// ignored.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/svg+xml" => ".svg",
        "audio/3gpp" => ".3gp",
        "audio/mpeg" => ".mp3",
        "audio/mp4" => ".m4a",
        "application/pdf" => ".pdf",
        _ => "",
    }
}

/// Fetches attachment bytes over HTTP.
pub struct HttpAttachmentFetcher {
    client: Client,
    /// Bearer token forwarded to the media host, if it requires one.
    access_token: Option<String>,
}

impl HttpAttachmentFetcher {
    /// Create a new fetcher, optionally authenticating downloads.
    pub fn new(access_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            access_token,
        })
    }
}

#[async_trait]
impl AttachmentFetcher for HttpAttachmentFetcher {
    async fn fetch(&self, media_url: &str) -> Result<(Vec<u8>, String)> {
        let mut req = self.client.get(media_url);
        if let Some(ref token) = self.access_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Request(format!("Attachment fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "Attachment fetch returned {}",
                response.status().as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Request(format!("Attachment body read failed: {}", e)))?;

        debug!(
            media_url,
            content_type,
            size = bytes.len(),
            "Downloaded attachment"
        );
        Ok((bytes.to_vec(), content_type))
    }
}

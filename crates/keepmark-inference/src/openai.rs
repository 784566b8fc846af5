//! OpenAI-compatible note enrichment backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use keepmark_core::{Error, NoteEnricher, Result};

use crate::types::*;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default retry budget per enrichment call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default fixed backoff between attempts, in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

const SYSTEM_PROMPT: &str = "You are an expert in personal knowledge management systems. \
     Review the user's note and produce a structured summary with the provided \
     function schema.";

/// Configuration for the OpenAI-compatible enrichment backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model used for enrichment.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum attempts per enrichment call (capped retry budget).
    pub max_attempts: u32,
    /// Fixed backoff between attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

/// Classification of a failed enrichment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    /// 429 or 5xx, worth retrying.
    Transient,
    /// Transport-level failure, worth retrying.
    Network,
    /// Anything else (auth, bad request, malformed response).
    Permanent,
}

impl FailureClass {
    fn from_status(status: u16) -> Self {
        match status {
            429 | 500..=599 => Self::Transient,
            _ => Self::Permanent,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient | Self::Network)
    }
}

/// One failed attempt: the error plus whether another attempt makes sense.
struct AttemptFailure {
    class: FailureClass,
    message: String,
}

/// OpenAI-compatible enrichment backend.
///
/// Sends the note title and body through a function-calling chat
/// completion and returns the raw `function.arguments` string without
/// parsing it; tolerant field recovery is the caller's job.
pub struct OpenAiEnricher {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiEnricher {
    /// Create a new enricher with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing OpenAI enricher: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_attempts: std::env::var("OPENAI_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            retry_backoff_ms: std::env::var("OPENAI_RETRY_BACKOFF_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_BACKOFF_MS),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn build_request(&self, title: &str, body: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("NOTE TITLE: {title}\n\nNOTE CONTENT:\n{body}"),
                },
            ],
            tools: vec![Tool {
                tool_type: "function".to_string(),
                function: note_fields_function(),
            }],
            tool_choice: serde_json::json!({
                "type": "function",
                "function": {"name": NOTE_FIELDS_FUNCTION}
            }),
            temperature: 0.0,
        }
    }

    /// One attempt against the chat completions endpoint.
    async fn request_fields(
        &self,
        request: &ChatCompletionRequest,
    ) -> std::result::Result<String, AttemptFailure> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut req = self.client.post(&url).json(request);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| AttemptFailure {
            class: FailureClass::Network,
            message: format!("Request failed: {}", e),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = match response.json::<ApiErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => "Unknown error".to_string(),
            };
            return Err(AttemptFailure {
                class: FailureClass::from_status(status),
                message: format!("API returned {}: {}", status, message),
            });
        }

        let result: ChatCompletionResponse =
            response.json().await.map_err(|e| AttemptFailure {
                class: FailureClass::Permanent,
                message: format!("Failed to parse response: {}", e),
            })?;

        let arguments = result
            .choices
            .first()
            .and_then(|choice| choice.message.tool_calls.first())
            .map(|call| call.function.arguments.clone())
            .ok_or(AttemptFailure {
                class: FailureClass::Permanent,
                message: "Response carried no function call".to_string(),
            })?;

        debug!(response_len = arguments.len(), "Received enrichment fields");
        Ok(arguments)
    }
}

#[async_trait]
impl NoteEnricher for OpenAiEnricher {
    async fn enrich(&self, title: &str, body: &str) -> Result<String> {
        let request = self.build_request(title, body);

        let mut attempt = 1u32;
        loop {
            match self.request_fields(&request).await {
                Ok(raw) => return Ok(raw),
                Err(failure) => {
                    if failure.class.is_retryable() && attempt < self.config.max_attempts {
                        warn!(
                            attempt,
                            max_attempts = self.config.max_attempts,
                            "Enrichment attempt failed, retrying: {}",
                            failure.message
                        );
                        sleep(Duration::from_millis(self.config.retry_backoff_ms)).await;
                        attempt += 1;
                    } else {
                        return Err(Error::Enrichment(failure.message));
                    }
                }
            }
        }
    }
}

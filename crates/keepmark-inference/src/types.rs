//! Wire types for the OpenAI-compatible chat completions API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<Tool>,
    pub tool_choice: Value,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDef,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Raw argument text. Contracted to be a JSON object with the note
    /// field schema, but not guaranteed well-formed; passed through to the
    /// tolerant extractor unparsed.
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
}

/// Name of the note enrichment function exposed to the model.
pub const NOTE_FIELDS_FUNCTION: &str = "generate_note_fields";

/// Function definition for structured note enrichment.
///
/// Six fields: suggested title, type classification, rewrite, key ideas,
/// contained topics, related topics. Mirrors the extractor's
/// `NOTE_FIELD_SCHEMA`.
pub fn note_fields_function() -> FunctionDef {
    FunctionDef {
        name: NOTE_FIELDS_FUNCTION.to_string(),
        description: "Summarize a personal note, constructing the structured fields \
                      required for a personal knowledge management vault."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "note_title": {
                    "type": "string",
                    "description": "A short, declarative filename for the note. \
                                    Four or fewer words; six at most."
                },
                "note_type": {
                    "type": "string",
                    "enum": ["source", "idea", "entity", "definition"],
                    "description": "The primary note classification."
                },
                "note_rewrite": {
                    "type": "string",
                    "description": "The note body reorganized into clear, readable \
                                    markdown without adding information."
                },
                "note_ideas": {
                    "type": "string",
                    "description": "Key ideas as a markdown bullet list."
                },
                "note_topics_contained": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "maxItems": 6,
                    "description": "Discrete topics discussed in the note."
                },
                "note_topics_related": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "maxItems": 6,
                    "description": "Adjacent topics not directly discussed."
                }
            },
            "required": [
                "note_title",
                "note_type",
                "note_rewrite",
                "note_ideas",
                "note_topics_contained",
                "note_topics_related"
            ]
        }),
    }
}

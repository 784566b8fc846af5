//! # keepmark-inference
//!
//! LLM enrichment backend for keepmark.
//!
//! Implements [`keepmark_core::NoteEnricher`] over an OpenAI-compatible
//! chat completions endpoint with function calling, wrapped in a bounded
//! fixed-backoff retry policy. The raw function-call argument string is
//! returned unparsed; tolerant field recovery lives in `keepmark-core`.

pub mod openai;
pub mod types;

pub use openai::{OpenAiConfig, OpenAiEnricher};
pub use types::{note_fields_function, NOTE_FIELDS_FUNCTION};

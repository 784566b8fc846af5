//! Integration tests for the OpenAI enrichment backend against a mock
//! HTTP server.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use keepmark_core::NoteEnricher;
use keepmark_inference::{OpenAiConfig, OpenAiEnricher};

const RAW_ARGUMENTS: &str = "{\"note_title\": \"Buy Milk\", \"note_type\": \"idea\"}";

fn completion_body(arguments: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": {
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "generate_note_fields",
                        "arguments": arguments
                    }
                }]
            }
        }]
    })
}

fn test_config(server: &MockServer) -> OpenAiConfig {
    OpenAiConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        retry_backoff_ms: 1,
        max_attempts: 3,
        ..OpenAiConfig::default()
    }
}

#[tokio::test]
async fn enrich_returns_raw_arguments_unparsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(RAW_ARGUMENTS)))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = OpenAiEnricher::new(test_config(&server)).unwrap();
    let raw = enricher.enrich("Groceries", "Buy milk").await.unwrap();
    assert_eq!(raw, RAW_ARGUMENTS);
}

#[tokio::test]
async fn enrich_passes_through_malformed_arguments() {
    // The backend does not validate the argument text; even broken JSON
    // comes back verbatim for the tolerant extractor to deal with.
    let malformed = "{\"note_title\": \"Unterminated";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(malformed)))
        .mount(&server)
        .await;

    let enricher = OpenAiEnricher::new(test_config(&server)).unwrap();
    let raw = enricher.enrich("t", "b").await.unwrap();
    assert_eq!(raw, malformed);
}

#[tokio::test]
async fn enrich_retries_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "upstream hiccup", "type": "server_error"}
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(RAW_ARGUMENTS)))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = OpenAiEnricher::new(test_config(&server)).unwrap();
    let raw = enricher.enrich("t", "b").await.unwrap();
    assert_eq!(raw, RAW_ARGUMENTS);
}

#[tokio::test]
async fn enrich_gives_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"message": "overloaded", "type": "server_error"}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let enricher = OpenAiEnricher::new(test_config(&server)).unwrap();
    let err = enricher.enrich("t", "b").await.unwrap_err();
    assert!(err.to_string().contains("Enrichment error"));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn enrich_does_not_retry_auth_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "invalid api key", "type": "invalid_request_error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = OpenAiEnricher::new(test_config(&server)).unwrap();
    let err = enricher.enrich("t", "b").await.unwrap_err();
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn enrich_fails_when_response_has_no_function_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "I refuse to call functions" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = OpenAiEnricher::new(test_config(&server)).unwrap();
    let err = enricher.enrich("t", "b").await.unwrap_err();
    assert!(err.to_string().contains("no function call"));
}

//! Note source client tests against a mock HTTP service.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use keepmark_core::{Error, LabelTransition, NoteSource};
use keepmark_sync::{KeepClient, KeepConfig};

fn client_for(server: &MockServer) -> KeepClient {
    KeepClient::new(KeepConfig {
        base_url: server.uri(),
        access_token: "test-token".to_string(),
        timeout_seconds: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_ready_maps_wire_notes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("label", "Ready to Export"))
        .and(query_param("archived", "false"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [
                {
                    "id": "n1",
                    "title": "Buy Milk",
                    "text": "Buy milk\u{2610}",
                    "labels": [{"name": "Ready to Export"}],
                    "attachments": [
                        {"id": "a0", "mediaUrl": "https://media.example/a0"}
                    ]
                },
                {"id": "n2"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let notes = client.fetch_ready("Ready to Export").await.unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, "n1");
    assert_eq!(notes[0].title, "Buy Milk");
    assert_eq!(notes[0].body, "Buy milk\u{2610}");
    assert_eq!(notes[0].labels, vec!["Ready to Export".to_string()]);
    assert_eq!(notes[0].attachments.len(), 1);
    assert_eq!(notes[0].attachments[0].media_url, "https://media.example/a0");

    // Absent wire fields default to empty.
    assert_eq!(notes[1].title, "");
    assert_eq!(notes[1].body, "");
    assert!(notes[1].attachments.is_empty());
    assert!(!notes[1].archived);
}

#[tokio::test]
async fn test_fetch_ready_unauthorized_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.fetch_ready("Ready to Export").await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_fetch_ready_server_error_is_source_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.fetch_ready("Ready to Export").await.unwrap_err();
    assert!(matches!(err, Error::SourceQuery(_)));
}

#[tokio::test]
async fn test_transition_patches_labels_and_archive() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/notes/n1"))
        .and(header("Authorization", "Bearer test-token"))
        .and(wiremock::matchers::body_json(json!({
            "removeLabels": ["Ready to Export"],
            "addLabels": ["Succesfully Exported"],
            "archived": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transition = LabelTransition {
        remove_label: "Ready to Export".to_string(),
        add_label: "Succesfully Exported".to_string(),
        archive: true,
    };
    client.transition("n1", &transition).await.unwrap();
}

#[tokio::test]
async fn test_transition_not_found_is_recoverable() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/notes/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transition = LabelTransition {
        remove_label: "Ready to Export".to_string(),
        add_label: "Succesfully Exported".to_string(),
        archive: true,
    };
    let err = client.transition("missing", &transition).await.unwrap_err();
    assert!(matches!(err, Error::Request(_)));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_transition_server_error_is_recoverable() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transition = LabelTransition {
        remove_label: "Ready to Export".to_string(),
        add_label: "Succesfully Exported".to_string(),
        archive: true,
    };
    let err = client.transition("n1", &transition).await.unwrap_err();
    assert!(matches!(err, Error::Request(_)));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_transition_unauthorized_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transition = LabelTransition {
        remove_label: "Ready to Export".to_string(),
        add_label: "Succesfully Exported".to_string(),
        archive: true,
    };
    let err = client.transition("n1", &transition).await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
    assert!(err.is_fatal());
}

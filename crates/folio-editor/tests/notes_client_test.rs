//! HTTP client tests against a mock server.

use std::time::Duration;

use folio_editor::{
    Block, BlockType, CreateNoteRequest, Error, NoteRepository, NotesClient, UpdateNoteRequest,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn note_json(id: i32, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "blocks": [{"id": "b1", "type": "paragraph", "content": "hi"}],
        "createdAt": "2026-10-01T12:00:00Z",
        "updatedAt": "2026-10-01T12:00:00Z"
    })
}

fn client(server: &MockServer) -> NotesClient {
    NotesClient::new(server.uri(), Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn test_get_decodes_note() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(3, "Three")))
        .expect(1)
        .mount(&server)
        .await;

    let note = client(&server).get(3).await.unwrap();
    assert_eq!(note.id, 3);
    assert_eq!(note.title, "Three");
    assert_eq!(note.blocks[0].block_type, BlockType::Paragraph);
}

#[tokio::test]
async fn test_not_found_maps_to_note_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/notes/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Note not found"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .update(9, UpdateNoteRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoteNotFound(9)));
}

#[tokio::test]
async fn test_validation_details_are_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Validation failed",
            "details": [{"path": "blocks[1].id", "message": "duplicate block id \"x\""}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .create(CreateNoteRequest::new("t", vec![]))
        .await
        .unwrap_err();
    match err {
        Error::Validation(details) => assert_eq!(details[0].path, "blocks[1].id"),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_create_sends_blocks_in_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .and(body_json(json!({
            "title": "Untitled Note",
            "blocks": [{"id": "b1", "type": "checkbox-list", "content": "", "metadata": {"checked": false}}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(note_json(1, "Untitled Note")))
        .expect(1)
        .mount(&server)
        .await;

    let block = Block::with_id("b1", BlockType::CheckboxList, "")
        .with_metadata(folio_editor::BlockMetadata::checkbox(false));
    let note = client(&server)
        .create(CreateNoteRequest::new("Untitled Note", vec![block]))
        .await
        .unwrap();
    assert_eq!(note.id, 1);
}

#[tokio::test]
async fn test_search_passes_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/search"))
        .and(query_param("q", "hello world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([note_json(2, "Hello")])))
        .expect(1)
        .mount(&server)
        .await;

    let notes = client(&server).search("hello world").await.unwrap();
    assert_eq!(notes.len(), 1);
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete(5).await.unwrap();
}

#[tokio::test]
async fn test_server_error_maps_to_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Internal server error"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).list().await.unwrap_err();
    match err {
        Error::Request(message) => assert!(message.contains("Internal server error")),
        other => panic!("unexpected error {:?}", other),
    }
}

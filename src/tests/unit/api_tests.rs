//! BackendClient endpoint tests against a local mock server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::api::models::DocumentStatus;
use crate::api::{ApiError, BackendClient, DocumentApi};
use crate::tests::common::fixtures::upload_file;

// Nothing listens on this address; any attempted call fails loudly.
const UNREACHABLE: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn empty_status_query_short_circuits_without_a_call() {
    let client = BackendClient::new(UNREACHABLE);
    let docs = client.document_statuses(&[]).await.unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn empty_placeholder_title_fails_without_a_call() {
    let client = BackendClient::new(UNREACHABLE);
    let err = client.create_conversation_placeholder("  ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
}

#[tokio::test]
async fn document_statuses_issues_one_batched_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents/statuses"))
        .and(body_json(json!({ "documentIds": ["d1", "d2"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "d1", "file_name": "a.pdf", "conversation_id": "c1", "status": "Indexing" },
            { "id": "d2", "file_name": "b.pdf", "conversation_id": "c1", "status": "Indexed" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let docs = client
        .document_statuses(&["d1".to_string(), "d2".to_string()])
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].status, DocumentStatus::Indexing);
    assert_eq!(docs[1].status, DocumentStatus::Indexed);
    assert_eq!(docs[1].conversation_id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn upload_file_maps_backend_document_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "File uploaded successfully",
            "isUploaded": true,
            "document_status": {
                "id": "d1",
                "file_name": "a.pdf",
                "conversation_id": "c1",
                "status": "Uploaded"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let outcome = client
        .upload_file(upload_file("a.pdf"), Some("c1".to_string()))
        .await
        .unwrap();

    assert!(outcome.is_uploaded);
    assert_eq!(outcome.document.id, "d1");
    assert_eq!(outcome.document.status, DocumentStatus::Uploaded);
    assert_eq!(outcome.document.polling_count, 0);
}

#[tokio::test]
async fn upload_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let err = client
        .upload_file(upload_file("a.pdf"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn create_placeholder_returns_conversation_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/history/generate_placeholder"))
        .and(body_json(json!({ "conversation_title": "Trip plan" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "conversation_id": "c9" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let id = client.create_conversation_placeholder("Trip plan").await.unwrap();
    assert_eq!(id, "c9");
}

#[tokio::test]
async fn delete_endpoints_report_acknowledgement() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/document/delete"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/history/delete_all"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    assert!(client.delete_document("d1").await.unwrap());
    assert!(!client.delete_all_history().await.unwrap());
}

#[tokio::test]
async fn list_documents_pages_by_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/list"))
        .and(query_param("offset", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "d1", "file_name": "a.pdf", "conversation_id": "c1", "status": "Indexed" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let docs = client.list_documents(25).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "d1");
}

#[tokio::test]
async fn history_maintenance_endpoints_report_acknowledgement() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/history/rename"))
        .and(body_json(json!({ "conversation_id": "c1", "title": "renamed" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/history/clear"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    assert!(client.rename_conversation("c1", "renamed").await.unwrap());
    assert!(!client.clear_conversation_messages("c1").await.unwrap());
}

#[tokio::test]
async fn list_conversations_maps_created_at() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/history/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "c1", "title": "first", "createdAt": "2024-05-01T10:00:00Z" }
        ])))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let conversations = client.list_conversations(0).await.unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].title, "first");
    assert!(conversations[0].messages.is_empty());
}

#[tokio::test]
async fn conversation_messages_maps_wire_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/history/read"))
        .and(body_json(json!({ "conversation_id": "c1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                { "id": "m1", "role": "user", "content": "hello", "createdAt": "2024-05-01T10:00:00Z" }
            ]
        })))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let messages = client.conversation_messages("c1").await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, "user");
}

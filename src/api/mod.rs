//! Backend collaborator contracts.
//!
//! The rest of the crate only ever talks to the ingestion backend through the
//! [`DocumentApi`] trait; [`client::BackendClient`] is the reqwest-backed
//! implementation. Keeping the trait at this seam lets the orchestrator and
//! poller be tested against mocks without a running backend.

pub mod client;
pub mod models;

use async_trait::async_trait;

pub use client::BackendClient;
pub use models::{ChatMessage, Conversation, Document, DocumentStatus, UploadFile, UploadOutcome};

/// Error type for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations the client consumes from the ingestion backend and the remote
/// history service. Request/response only; no state lives behind this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Submit one file for ingestion. On success the returned document
    /// carries the backend-assigned id and an initial `Uploaded` status.
    async fn upload_file(
        &self,
        file: UploadFile,
        conversation_id: Option<String>,
    ) -> ApiResult<UploadOutcome>;

    /// Query the current status of a batch of documents in one round trip.
    /// An empty id list short-circuits to an empty result without a call.
    async fn document_statuses(&self, ids: &[String]) -> ApiResult<Vec<Document>>;

    /// Page through the caller's uploaded documents.
    async fn list_documents(&self, offset: usize) -> ApiResult<Vec<Document>>;

    /// Create an empty conversation to own a new upload batch. Fails locally,
    /// without a network call, when the title is empty or whitespace.
    async fn create_conversation_placeholder(&self, title: &str) -> ApiResult<String>;

    /// Delete one document. Returns whether the backend acknowledged it.
    async fn delete_document(&self, id: &str) -> ApiResult<bool>;

    /// Delete all conversations and documents.
    async fn delete_all_history(&self) -> ApiResult<bool>;

    /// Page through stored conversations (messages not included).
    async fn list_conversations(&self, offset: usize) -> ApiResult<Vec<Conversation>>;

    /// Fetch the messages of one conversation.
    async fn conversation_messages(&self, id: &str) -> ApiResult<Vec<ChatMessage>>;

    /// Rename a stored conversation.
    async fn rename_conversation(&self, id: &str, title: &str) -> ApiResult<bool>;

    /// Remove all messages from a stored conversation.
    async fn clear_conversation_messages(&self, id: &str) -> ApiResult<bool>;
}

//! HTTP client for the ingestion backend and remote history service.
//!
//! Thin request/response wrappers over the backend's endpoints. No local
//! state; every method is a single round trip. Failure recovery (retries,
//! banners, no-op ticks) is the callers' concern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart;
use serde::Deserialize;

use super::models::{ChatMessage, Conversation, Document, UploadFile, UploadOutcome};
use super::{ApiError, ApiResult, DocumentApi};

/// Reqwest-backed implementation of [`DocumentApi`].
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// Wire shapes that differ from the domain models.

#[derive(Deserialize)]
struct WireConversation {
    id: String,
    title: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WireMessage {
    id: String,
    role: String,
    content: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WireMessages {
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct WirePlaceholder {
    conversation_id: String,
}

#[async_trait]
impl DocumentApi for BackendClient {
    async fn upload_file(
        &self,
        file: UploadFile,
        conversation_id: Option<String>,
    ) -> ApiResult<UploadOutcome> {
        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(file.bytes).file_name(file.file_name.clone()),
            )
            .text("conversationId", conversation_id.unwrap_or_default());

        let response = self.http.post(self.url("/upload")).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let outcome: UploadOutcome = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        log::info!(
            "uploaded '{}' as document {} (accepted: {})",
            file.file_name,
            outcome.document.id,
            outcome.is_uploaded
        );
        Ok(outcome)
    }

    async fn document_statuses(&self, ids: &[String]) -> ApiResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .post(self.url("/documents/statuses"))
            .json(&serde_json::json!({ "documentIds": ids }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn list_documents(&self, offset: usize) -> ApiResult<Vec<Document>> {
        let response = self
            .http
            .get(self.url(&format!("/documents/list?offset={offset}")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_conversation_placeholder(&self, title: &str) -> ApiResult<String> {
        if title.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "conversation title must not be empty".to_string(),
            ));
        }

        let response = self
            .http
            .post(self.url("/history/generate_placeholder"))
            .json(&serde_json::json!({ "conversation_title": title }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let placeholder: WirePlaceholder = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        log::info!("created conversation placeholder {}", placeholder.conversation_id);
        Ok(placeholder.conversation_id)
    }

    async fn delete_document(&self, id: &str) -> ApiResult<bool> {
        let response = self
            .http
            .delete(self.url("/document/delete"))
            .json(&serde_json::json!({ "id": id }))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn delete_all_history(&self) -> ApiResult<bool> {
        let response = self
            .http
            .delete(self.url("/history/delete_all"))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn list_conversations(&self, offset: usize) -> ApiResult<Vec<Conversation>> {
        let response = self
            .http
            .get(self.url(&format!("/history/list?offset={offset}")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let wire: Vec<WireConversation> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(wire
            .into_iter()
            .map(|c| Conversation {
                id: c.id,
                title: c.title,
                date: c.created_at,
                messages: Vec::new(),
            })
            .collect())
    }

    async fn conversation_messages(&self, id: &str) -> ApiResult<Vec<ChatMessage>> {
        let response = self
            .http
            .post(self.url("/history/read"))
            .json(&serde_json::json!({ "conversation_id": id }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let wire: WireMessages = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(wire
            .messages
            .into_iter()
            .map(|m| ChatMessage {
                id: m.id,
                role: m.role,
                content: m.content,
                date: m.created_at,
            })
            .collect())
    }

    async fn rename_conversation(&self, id: &str, title: &str) -> ApiResult<bool> {
        let response = self
            .http
            .post(self.url("/history/rename"))
            .json(&serde_json::json!({ "conversation_id": id, "title": title }))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn clear_conversation_messages(&self, id: &str) -> ApiResult<bool> {
        let response = self
            .http
            .post(self.url("/history/clear"))
            .json(&serde_json::json!({ "conversation_id": id }))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

//! Wire and domain models shared with the ingestion backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Document Lifecycle
// ============================================================================

/// Lifecycle status of an uploaded document, as reported by the backend.
///
/// `Indexed`, `Failed` and `PollingTimeout` are terminal; the poller stops
/// tracking a document once it reaches one of them. `PollingTimeout` is never
/// reported by the backend - it is forced client-side when a document exhausts
/// its poll attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Uploading,
    Uploaded,
    Indexing,
    Indexed,
    Failed,
    PollingTimeout,
}

impl DocumentStatus {
    /// Whether this status ends the polling lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Indexed | Self::Failed | Self::PollingTimeout)
    }
}

/// One user-attached file and its ingestion lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Backend-assigned identifier, unique within the global collection.
    pub id: String,
    /// Display name, fixed at upload time.
    pub file_name: String,
    /// Owning conversation; absent only transiently before one is created.
    pub conversation_id: Option<String>,
    /// Current lifecycle status.
    pub status: DocumentStatus,
    /// Poll attempts made since the document entered a non-terminal state.
    /// Not part of the wire format; maintained by the status poller.
    #[serde(default)]
    pub polling_count: u32,
}

impl Document {
    pub fn new(id: &str, file_name: &str, conversation_id: Option<&str>, status: DocumentStatus) -> Self {
        Self {
            id: id.to_string(),
            file_name: file_name.to_string(),
            conversation_id: conversation_id.map(|s| s.to_string()),
            status,
            polling_count: 0,
        }
    }
}

// ============================================================================
// Conversations
// ============================================================================

/// A single chat message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: String,
    pub content: String,
    pub date: DateTime<Utc>,
}

/// A conversation and its ordered message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            date: Utc::now(),
            messages: Vec::new(),
        }
    }
}

// ============================================================================
// Upload
// ============================================================================

/// A locally selected file queued for upload.
///
/// Transport of the bytes is opaque to the orchestrator; the backend client
/// turns this into a multipart request.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            bytes,
        }
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// Result of a single upload submission.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadOutcome {
    /// Whether the backend accepted and stored the file.
    #[serde(rename = "isUploaded")]
    pub is_uploaded: bool,
    /// Initial document record (status `Uploaded` on success).
    #[serde(rename = "document_status")]
    pub document: Document,
}

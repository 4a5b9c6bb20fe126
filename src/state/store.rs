//! Document/Conversation store.
//!
//! A single authoritative state value mutated only through the closed set of
//! [`Action`] transitions. The reducer is pure - no transition performs I/O
//! and none can fail; invalid actions return the state unchanged. Error
//! reporting belongs to the orchestration layer that dispatches actions.

use std::collections::BTreeSet;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::api::models::{Conversation, Document};

// ============================================================================
// State
// ============================================================================

/// Canonical client-side state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Every document known to the client, at most one entry per id.
    pub documents: Vec<Document>,
    /// Subset of `documents` still awaiting a terminal status, tracked by the
    /// poller. Co-mutated with `documents` only inside
    /// `ReconcilePendingBatch` so the two views cannot diverge after a batch.
    pub pending_documents: Vec<Document>,
    /// The conversation currently on screen.
    pub current_conversation: Option<Conversation>,
    /// All known conversations.
    pub chat_history: Vec<Conversation>,
    /// Document ids the user has checked for the next turn. Ephemeral; the
    /// caller clears it when the active conversation changes.
    pub selection: BTreeSet<String>,
}

// ============================================================================
// Actions
// ============================================================================

/// The closed set of state transitions.
#[derive(Debug, Clone)]
pub enum Action {
    /// Upsert one document into the global collection, preserving position.
    RegisterDocument(Document),
    /// Merge a freshly polled status batch into the pending and global
    /// collections. Terminal documents leave the pending set; everything is
    /// upserted into the global collection by id.
    ReconcilePendingBatch(Vec<Document>),
    /// Remove a document from the global collection only.
    DeleteDocument(String),
    /// Replace the active conversation pointer.
    SetActiveConversation(Option<Conversation>),
    /// Check or uncheck a document for the next turn.
    ToggleSelection { id: String, selected: bool },
    /// Drop the ephemeral selection.
    ClearSelection,
    /// Upsert a conversation into the history by id.
    UpsertConversation(Conversation),
    /// Retitle a conversation; no-op when the id is unknown.
    UpdateChatTitle { id: String, title: String },
    /// Remove a conversation and every document it owns.
    DeleteConversation(String),
    /// Empty the active conversation's messages.
    ClearCurrentChatMessages,
    /// Replace the conversation history wholesale (initial fetch).
    SetChatHistory(Vec<Conversation>),
    /// Replace the global document collection wholesale (initial fetch).
    SetDocuments(Vec<Document>),
    /// Clear conversations, documents, pending set and selection.
    DeleteAllHistory,
}

// ============================================================================
// Reducer
// ============================================================================

/// Replace the entry with `doc.id` in place, or append when absent.
fn upsert_document(docs: &mut Vec<Document>, doc: Document) {
    match docs.iter_mut().find(|d| d.id == doc.id) {
        Some(existing) => *existing = doc,
        None => docs.push(doc),
    }
}

/// Pure state-transition function: `(state, action) -> state`.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::RegisterDocument(doc) => {
            upsert_document(&mut state.documents, doc);
        }
        Action::ReconcilePendingBatch(batch) => {
            for doc in batch {
                if doc.status.is_terminal() {
                    state.pending_documents.retain(|d| d.id != doc.id);
                } else {
                    upsert_document(&mut state.pending_documents, doc.clone());
                }
                upsert_document(&mut state.documents, doc);
            }
        }
        Action::DeleteDocument(id) => {
            state.documents.retain(|d| d.id != id);
        }
        Action::SetActiveConversation(conversation) => {
            state.current_conversation = conversation;
        }
        Action::ToggleSelection { id, selected } => {
            if selected {
                state.selection.insert(id);
            } else {
                state.selection.remove(&id);
            }
        }
        Action::ClearSelection => {
            state.selection.clear();
        }
        Action::UpsertConversation(conversation) => {
            match state.chat_history.iter_mut().find(|c| c.id == conversation.id) {
                Some(existing) => *existing = conversation,
                None => state.chat_history.push(conversation),
            }
        }
        Action::UpdateChatTitle { id, title } => {
            if let Some(chat) = state.chat_history.iter_mut().find(|c| c.id == id) {
                chat.title = title.clone();
                if let Some(current) = state.current_conversation.as_mut() {
                    if current.id == id {
                        current.title = title;
                    }
                }
            }
        }
        Action::DeleteConversation(id) => {
            state.chat_history.retain(|c| c.id != id);
            state
                .documents
                .retain(|d| d.conversation_id.as_deref() != Some(id.as_str()));
            state
                .pending_documents
                .retain(|d| d.conversation_id.as_deref() != Some(id.as_str()));
            if state
                .current_conversation
                .as_ref()
                .is_some_and(|c| c.id == id)
            {
                state.current_conversation = None;
            }
        }
        Action::ClearCurrentChatMessages => {
            if let Some(current) = state.current_conversation.as_mut() {
                current.messages.clear();
            }
        }
        Action::SetChatHistory(history) => {
            state.chat_history = history;
        }
        Action::SetDocuments(documents) => {
            state.documents = documents;
        }
        Action::DeleteAllHistory => {
            state.chat_history.clear();
            state.documents.clear();
            state.pending_documents.clear();
            state.selection.clear();
            state.current_conversation = None;
        }
    }
    state
}

// ============================================================================
// Store
// ============================================================================

/// Single-writer wrapper around [`AppState`].
///
/// `dispatch` applies one reducer transition under the write lock, so
/// concurrent producers (the upload loop and the poller) each deliver one
/// atomic transition regardless of interleaving order.
pub struct AppStore {
    state: RwLock<AppState>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Apply one transition.
    pub fn dispatch(&self, action: Action) {
        let mut guard = self.state.write().unwrap();
        let previous = std::mem::take(&mut *guard);
        *guard = reduce(previous, action);
    }

    /// Clone of the full state.
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.state.read().unwrap().documents.clone()
    }

    pub fn pending_documents(&self) -> Vec<Document> {
        self.state.read().unwrap().pending_documents.clone()
    }

    pub fn current_conversation(&self) -> Option<Conversation> {
        self.state.read().unwrap().current_conversation.clone()
    }

    pub fn chat_history(&self) -> Vec<Conversation> {
        self.state.read().unwrap().chat_history.clone()
    }

    pub fn selection(&self) -> BTreeSet<String> {
        self.state.read().unwrap().selection.clone()
    }

    /// Derived view: documents owned by the given conversation. Recomputed on
    /// every call, never cached.
    pub fn conversation_documents(&self, conversation_id: &str) -> Vec<Document> {
        self.state
            .read()
            .unwrap()
            .documents
            .iter()
            .filter(|d| d.conversation_id.as_deref() == Some(conversation_id))
            .cloned()
            .collect()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

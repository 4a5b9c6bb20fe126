//! Sequential upload orchestration for user-selected file batches.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::api::models::{Conversation, UploadFile};
use crate::api::DocumentApi;
use crate::config::UploadConfig;
use crate::state::{Action, AppStore};

// ============================================================================
// Types
// ============================================================================

/// Local status of one file within an upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileUploadStatus {
    /// Selected but not yet submitted.
    WaitingToBeIndexed,
    /// Submission in flight.
    Uploading,
    /// Accepted by the backend; the poller takes over from here.
    Uploaded,
    /// Submission failed; the rest of the batch continues.
    FailedToUpload,
}

/// Per-file outcome of a batch.
#[derive(Debug, Clone)]
pub struct FileUploadState {
    pub file_name: String,
    pub status: FileUploadStatus,
}

/// Severity of the post-batch banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerSeverity {
    Success,
    Error,
}

/// Transient notification shown after a batch completes. Auto-dismisses
/// after the configured delay; the next batch replaces it.
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub severity: BannerSeverity,
    shown_at: Instant,
    dismiss_after: Duration,
}

impl Banner {
    fn new(message: &str, severity: BannerSeverity, dismiss_after: Duration) -> Self {
        Self {
            message: message.to_string(),
            severity,
            shown_at: Instant::now(),
            dismiss_after,
        }
    }

    /// Whether the banner should still be shown.
    pub fn is_visible(&self) -> bool {
        self.shown_at.elapsed() < self.dismiss_after
    }
}

/// Result of one upload batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Per-file statuses, in submission order.
    pub files: Vec<FileUploadState>,
    /// Conversation that owns the batch (created for it when needed).
    pub conversation_id: Option<String>,
    /// Batch-level banner, also retrievable via
    /// [`UploadOrchestrator::banner`] until it expires.
    pub banner: Banner,
}

/// Validation errors caught before any network call.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("conversation title must not be empty")]
    EmptyTitle,
    #[error("file type not allowed: {0}")]
    DisallowedExtension(String),
}

// ============================================================================
// Upload Orchestrator
// ============================================================================

/// Submits user-selected files strictly one at a time.
///
/// Sequential submission keeps failures attributable per file and lets every
/// file in the batch share one conversation-creation step. A failed file
/// never aborts the batch; it is recorded and the next file proceeds.
pub struct UploadOrchestrator {
    store: Arc<AppStore>,
    api: Arc<dyn DocumentApi>,
    config: UploadConfig,
    banner: Mutex<Option<Banner>>,
    progress: Mutex<Vec<FileUploadState>>,
}

impl UploadOrchestrator {
    pub fn new(store: Arc<AppStore>, api: Arc<dyn DocumentApi>, config: UploadConfig) -> Self {
        Self {
            store,
            api,
            config,
            banner: Mutex::new(None),
            progress: Mutex::new(Vec::new()),
        }
    }

    /// The current batch banner, if one is still visible.
    pub fn banner(&self) -> Option<Banner> {
        self.banner
            .lock()
            .unwrap()
            .as_ref()
            .filter(|b| b.is_visible())
            .cloned()
    }

    /// Live per-file statuses of the batch in flight (or the last batch).
    pub fn batch_progress(&self) -> Vec<FileUploadState> {
        self.progress.lock().unwrap().clone()
    }

    fn set_progress(&self, index: usize, status: FileUploadStatus) {
        if let Some(entry) = self.progress.lock().unwrap().get_mut(index) {
            entry.status = status;
        }
    }

    /// Upload a batch of files into `conversation_id`, creating a placeholder
    /// conversation titled `new_conversation_title` when no conversation
    /// exists yet.
    ///
    /// Validation (file extensions, placeholder title) happens before any
    /// network call and fails the batch synchronously.
    pub async fn upload_batch(
        &self,
        files: Vec<UploadFile>,
        conversation_id: Option<String>,
        new_conversation_title: Option<&str>,
    ) -> Result<BatchOutcome, UploadError> {
        for file in &files {
            if !self.is_allowed(file) {
                return Err(UploadError::DisallowedExtension(file.file_name.clone()));
            }
        }

        let dismiss_after = Duration::from_millis(self.config.banner_dismiss_ms);

        // A new batch resets the previous banner and progress.
        self.banner.lock().unwrap().take();
        *self.progress.lock().unwrap() = files
            .iter()
            .map(|f| FileUploadState {
                file_name: f.file_name.clone(),
                status: FileUploadStatus::WaitingToBeIndexed,
            })
            .collect();

        let conversation_id = match conversation_id {
            Some(id) => Some(id),
            None => {
                let title = new_conversation_title.unwrap_or("").trim();
                if title.is_empty() {
                    return Err(UploadError::EmptyTitle);
                }
                match self.api.create_conversation_placeholder(title).await {
                    Ok(id) => {
                        self.store
                            .dispatch(Action::UpsertConversation(Conversation::new(&id, title)));
                        Some(id)
                    }
                    Err(e) => {
                        // Every file would share the missing conversation, so
                        // nothing is submitted.
                        log::error!("failed to create conversation placeholder: {e}");
                        let banner = Banner::new(
                            "Failed to upload some files",
                            BannerSeverity::Error,
                            dismiss_after,
                        );
                        *self.banner.lock().unwrap() = Some(banner.clone());
                        return Ok(BatchOutcome {
                            files: files
                                .iter()
                                .map(|f| FileUploadState {
                                    file_name: f.file_name.clone(),
                                    status: FileUploadStatus::WaitingToBeIndexed,
                                })
                                .collect(),
                            conversation_id: None,
                            banner,
                        });
                    }
                }
            }
        };

        let mut states = Vec::with_capacity(files.len());
        let mut any_failed = false;

        for (index, file) in files.into_iter().enumerate() {
            let file_name = file.file_name.clone();
            log::info!("uploading '{file_name}'");
            self.set_progress(index, FileUploadStatus::Uploading);

            let uploaded = match self.api.upload_file(file, conversation_id.clone()).await {
                Ok(outcome) if outcome.is_uploaded => {
                    let mut document = outcome.document;
                    // The placeholder may have been created mid-batch; make
                    // sure the record carries its owner.
                    if document.conversation_id.is_none() {
                        document.conversation_id = conversation_id.clone();
                    }
                    document.polling_count = 0;
                    // Registers the document with the store and, through the
                    // pending view, with the poller.
                    self.store
                        .dispatch(Action::ReconcilePendingBatch(vec![document]));
                    true
                }
                Ok(_) => {
                    log::warn!("backend rejected upload of '{file_name}'");
                    false
                }
                Err(e) => {
                    log::warn!("upload of '{file_name}' failed: {e}");
                    false
                }
            };

            any_failed |= !uploaded;
            let status = if uploaded {
                FileUploadStatus::Uploaded
            } else {
                FileUploadStatus::FailedToUpload
            };
            self.set_progress(index, status);
            states.push(FileUploadState { file_name, status });
        }

        let banner = if any_failed {
            Banner::new("Failed to upload some files", BannerSeverity::Error, dismiss_after)
        } else {
            Banner::new(
                "All files have been uploaded successfully",
                BannerSeverity::Success,
                dismiss_after,
            )
        };
        *self.banner.lock().unwrap() = Some(banner.clone());

        Ok(BatchOutcome {
            files: states,
            conversation_id,
            banner,
        })
    }

    fn is_allowed(&self, file: &UploadFile) -> bool {
        file.extension()
            .map(|ext| self.config.allowed_extensions.iter().any(|a| a == &ext))
            .unwrap_or(false)
    }
}

//! Asynchronous document-lifecycle synchronization.
//!
//! Two independent activities feed the store: the upload orchestrator's
//! sequential submission loop and the poller's timer-driven status ticks.
//! Each delivers atomic reducer transitions, so their interleaving is safe.

mod poller;
mod uploader;

pub use poller::{PollerHandle, StatusPoller};
pub use uploader::{
    Banner, BannerSeverity, BatchOutcome, FileUploadState, FileUploadStatus, UploadError,
    UploadOrchestrator,
};

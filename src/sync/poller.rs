//! Background poller driving pending documents to a terminal status.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Duration;

use crate::api::models::DocumentStatus;
use crate::api::DocumentApi;
use crate::config::PollerConfig;
use crate::state::{Action, AppStore};

// ============================================================================
// Handle
// ============================================================================

/// Handle to a running poller. Dropping it does not stop the loop; call
/// [`PollerHandle::stop`] when tearing down the owning view.
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl PollerHandle {
    /// Signal the poll loop to exit. A response already in flight is
    /// discarded, never applied to the store.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

// ============================================================================
// Status Poller
// ============================================================================

/// Polls the backend for the status of every pending document.
///
/// Each tick is one batched round trip covering all pending ids, so the
/// outbound request rate is bounded regardless of how many documents are
/// pending. Ticks are serialized: the next sleep starts only after the
/// previous tick's response has been applied.
pub struct StatusPoller {
    store: Arc<AppStore>,
    api: Arc<dyn DocumentApi>,
    config: PollerConfig,
    /// Poll attempts per tracked document id. Ids are admitted at zero when
    /// they first appear in the store's pending view and evicted once the
    /// document goes terminal or leaves that view, so a re-uploaded id never
    /// inherits a stale counter.
    attempts: HashMap<String, u32>,
    shutdown_rx: watch::Receiver<bool>,
}

impl StatusPoller {
    pub fn new(
        store: Arc<AppStore>,
        api: Arc<dyn DocumentApi>,
        config: PollerConfig,
    ) -> (Self, PollerHandle) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = Self {
            store,
            api,
            config,
            attempts: HashMap::new(),
            shutdown_rx,
        };
        (poller, PollerHandle { shutdown_tx })
    }

    /// Spawn the poll loop on the current runtime.
    pub fn spawn(
        store: Arc<AppStore>,
        api: Arc<dyn DocumentApi>,
        config: PollerConfig,
    ) -> PollerHandle {
        let (poller, handle) = Self::new(store, api, config);
        tokio::spawn(poller.run());
        handle
    }

    /// Run the poll loop until [`PollerHandle::stop`] is called.
    pub async fn run(mut self) {
        let interval = Duration::from_millis(self.config.interval_ms);

        log::info!(
            "document status poller started (interval {}ms, max {} attempts)",
            self.config.interval_ms,
            self.config.max_attempts
        );

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        log::info!("document status poller shutting down");
                        break;
                    }
                }
                _ = tokio::time::sleep(interval) => {
                    self.tick().await;
                }
            }
        }
    }

    /// One poll tick: collect pending ids, issue one batched status query,
    /// and reconcile the result into the store.
    pub(crate) async fn tick(&mut self) {
        let pending = self.store.pending_documents();

        // Sync the attempt arena with the store's pending view: evict ids no
        // longer pending, admit new ones at zero.
        self.attempts.retain(|id, _| pending.iter().any(|d| &d.id == id));
        for doc in &pending {
            self.attempts.entry(doc.id.clone()).or_insert(0);
        }

        if pending.is_empty() {
            return;
        }

        let ids: Vec<String> = pending.iter().map(|d| d.id.clone()).collect();

        let statuses = match self.api.document_statuses(&ids).await {
            Ok(statuses) => statuses,
            Err(e) => {
                // Transient transport failure: no counter moves, no status
                // changes; retry on the next scheduled tick.
                log::debug!("status poll failed, retrying next tick: {e}");
                return;
            }
        };

        // Teardown may have been requested while the query was in flight.
        if *self.shutdown_rx.borrow() {
            log::debug!("discarding poll response received after shutdown");
            return;
        }

        let mut batch = Vec::with_capacity(statuses.len());
        for mut doc in statuses {
            let count = self.attempts.entry(doc.id.clone()).or_insert(0);
            *count += 1;
            doc.polling_count = *count;

            if doc.status.is_terminal() {
                self.attempts.remove(&doc.id);
            } else if doc.polling_count >= self.config.max_attempts {
                log::warn!(
                    "document {} still {:?} after {} poll attempts, forcing timeout",
                    doc.id,
                    doc.status,
                    doc.polling_count
                );
                doc.status = DocumentStatus::PollingTimeout;
                self.attempts.remove(&doc.id);
            }

            batch.push(doc);
        }

        self.store.dispatch(Action::ReconcilePendingBatch(batch));
    }
}

//! View counter reconciliation
//!
//! `register` is fire-and-forget: a task increments the remote counter, re-reads
//! the authoritative value and sends it back over a channel. The owner drains
//! the channel with `drain` and patches its local copies.
//!
//! # Ordering
//!
//! Concurrent registrations race. Updates arrive in the order their re-reads
//! resolve, so the last re-read to resolve wins, whichever increment it
//! followed. The atomic protocol (`increment_and_read`) narrows the window but
//! keeps the same last-resolved-wins rule.
//!
//! Every task races a cancellation token; once the owning session cancels it,
//! no further updates are produced.

use crate::model::ItemId;
use crate::source::{ContentSource, SourceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Authoritative count for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCountUpdate {
    pub id: ItemId,
    pub count: u64,
}

/// How a registration talks to the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountProtocol {
    /// Increment, then re-read once acknowledged
    #[default]
    TwoStep,
    /// Single `increment_and_read`, falling back to two steps when unsupported
    Atomic,
}

pub struct ViewCounter<S> {
    source: Arc<S>,
    protocol: CountProtocol,
    token: CancellationToken,
    tx: mpsc::UnboundedSender<ViewCountUpdate>,
    rx: mpsc::UnboundedReceiver<ViewCountUpdate>,
}

impl<S: ContentSource> ViewCounter<S> {
    #[must_use]
    pub fn new(source: Arc<S>, protocol: CountProtocol, token: CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            protocol,
            token,
            tx,
            rx,
        }
    }

    #[must_use]
    pub const fn protocol(&self) -> CountProtocol {
        self.protocol
    }

    /// Start reconciling one view
    ///
    /// Returns `None` (and registers nothing) outside a tokio runtime.
    pub fn register(&self, id: ItemId) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            warn!(item = %id, "no async runtime, view not registered");
            return None;
        };
        let source = Arc::clone(&self.source);
        let token = self.token.clone();
        let tx = self.tx.clone();
        let protocol = self.protocol;

        Some(runtime.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!(item = %id, "view registration cancelled");
                }
                result = reconcile(source.as_ref(), &id, protocol) => match result {
                    Ok(count) => {
                        debug!(item = %id, count, "view count reconciled");
                        // Receiver gone means the session was discarded
                        let _ = tx.send(ViewCountUpdate { id, count });
                    }
                    Err(e) => warn!(item = %id, error = %e, "view count reconciliation failed"),
                },
            }
        }))
    }

    /// Updates received so far, in resolution order
    pub fn drain(&mut self) -> Vec<ViewCountUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// Wait for the next update
    pub async fn next_update(&mut self) -> Option<ViewCountUpdate> {
        self.rx.recv().await
    }

    /// Stop every in-flight registration
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

async fn reconcile<S: ContentSource>(source: &S, id: &ItemId, protocol: CountProtocol) -> Result<u64, SourceError> {
    if protocol == CountProtocol::Atomic {
        match source.increment_and_read(id).await {
            Err(SourceError::Unsupported) => {
                debug!(item = %id, "atomic increment unsupported, using two-step protocol");
            }
            other => return other,
        }
    }
    source.increment_view_count(id).await?;
    source.read_view_count(id).await
}

//! Correlation table for in-flight transcode requests.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::debug;

use super::error::DispatchError;

/// Correlation key linking a dispatched request to its eventual response.
pub type RequestId = u64;

/// Result delivered through a pending request's settlement channel.
pub(crate) type Settlement = Result<Bytes, DispatchError>;

/// Table of in-flight requests keyed by correlation id.
///
/// Each entry holds the sender half of the caller's settlement channel and
/// is removed at the first settlement event for its key. Keys come from a
/// monotonically increasing counter, so a key is never reused while an
/// earlier request under the same key is still outstanding.
///
/// This table is the only state shared between caller tasks and the worker
/// thread; `DashMap` keeps insert and remove safe under that parallelism.
pub(crate) struct PendingTable {
    entries: DashMap<RequestId, oneshot::Sender<Settlement>>,
    next_id: AtomicU64,
}

impl PendingTable {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a new request, returning its key and the receiver the
    /// caller awaits.
    pub fn register(&self) -> (RequestId, oneshot::Receiver<Settlement>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.entries.insert(id, tx);
        (id, rx)
    }

    /// Settles the request for `id`, delivering `result` to its caller.
    ///
    /// Returns false when no entry exists for the key. That happens when the
    /// request was already cancelled or settled; such late responses are
    /// dropped without effect.
    pub fn settle(&self, id: RequestId, result: Settlement) -> bool {
        match self.entries.remove(&id) {
            Some((_, tx)) => {
                if tx.send(result).is_err() {
                    debug!(id, "settlement receiver dropped before delivery");
                }
                true
            }
            None => false,
        }
    }

    /// Removes the entry for `id` without delivering anything.
    ///
    /// Used by the cancellation path, where the caller settles locally.
    pub fn discard(&self, id: RequestId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Rejects every outstanding request.
    ///
    /// Called when the worker dies: requests routed to a dead worker can
    /// never settle through it.
    pub fn fail_all(&self) {
        // Collect first; settle() locks the same shards the iterator holds.
        let ids: Vec<RequestId> = self.entries.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            self.settle(id, Err(DispatchError::WorkerFailed));
        }
    }

    /// Number of outstanding requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

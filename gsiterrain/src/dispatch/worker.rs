//! Background transcode worker thread.

use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::codec::TargetEncoding;
use crate::transcoder::TileTranscoder;

use super::error::DispatchError;
use super::pending::{PendingTable, RequestId};

/// One transcode request as sent across the worker channel.
pub(crate) struct TranscodeJob {
    pub id: RequestId,
    pub png: Bytes,
    pub encoding: TargetEncoding,
    pub token: CancellationToken,
}

/// Sending handle to a running worker thread.
pub(crate) struct WorkerHandle {
    tx: mpsc::UnboundedSender<TranscodeJob>,
}

impl WorkerHandle {
    /// Spawns the worker thread and returns its handle.
    pub fn spawn(
        table: Arc<PendingTable>,
        transcoder: Arc<dyn TileTranscoder>,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _detached = thread::Builder::new()
            .name("gsiterrain-transcode".to_string())
            .spawn(move || run_worker(rx, table, transcoder))?;
        Ok(Self { tx })
    }

    /// True once the worker thread has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn send(&self, job: TranscodeJob) -> Result<(), mpsc::error::SendError<TranscodeJob>> {
        self.tx.send(job)
    }
}

/// Rejects all in-flight requests when the worker stops.
///
/// Runs on normal exit and on unwind alike; a request routed to a worker
/// that no longer processes its channel would otherwise hang its caller.
struct FailPendingOnDrop {
    table: Arc<PendingTable>,
}

impl Drop for FailPendingOnDrop {
    fn drop(&mut self) {
        let pending = self.table.len();
        if pending > 0 {
            warn!(pending, "transcode worker stopped with requests in flight");
            self.table.fail_all();
        }
    }
}

fn run_worker(
    rx: mpsc::UnboundedReceiver<TranscodeJob>,
    table: Arc<PendingTable>,
    transcoder: Arc<dyn TileTranscoder>,
) {
    let _reject_leftovers = FailPendingOnDrop {
        table: Arc::clone(&table),
    };
    debug!(transcoder = transcoder.name(), "transcode worker started");
    // The receiver lives inside the loop frame so it closes before the
    // leftover guard fires; senders observe the worker as gone first.
    worker_loop(rx, &table, transcoder.as_ref());
    debug!("transcode worker exiting");
}

fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<TranscodeJob>,
    table: &PendingTable,
    transcoder: &dyn TileTranscoder,
) {
    while let Some(job) = rx.blocking_recv() {
        if job.token.is_cancelled() {
            debug!(id = job.id, "request cancelled before transcode, skipping");
            table.settle(job.id, Err(DispatchError::Cancelled));
            continue;
        }

        let result = transcoder
            .transcode(&job.png, job.encoding)
            .map(Bytes::from)
            .map_err(DispatchError::from);
        if !table.settle(job.id, result) {
            debug!(id = job.id, "late response for settled request, dropping");
        }
    }
}

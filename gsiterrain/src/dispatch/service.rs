//! The transcode service: dispatcher plus lazily-started worker.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::codec::TargetEncoding;
use crate::transcoder::{CpuTranscoder, TileTranscoder};

use super::error::DispatchError;
use super::pending::PendingTable;
use super::worker::{TranscodeJob, WorkerHandle};

/// Asynchronous front door to the background transcode worker.
///
/// The service owns the correlation table and the worker lifecycle. It is
/// cheap to clone; clones share one worker and one table. The worker thread
/// starts on the first dispatch and persists for the service's lifetime.
/// With a single worker, requests are served in arrival order; callers must
/// not rely on that, it is a consequence of the current strategy rather
/// than a contract.
///
/// # Example
///
/// ```ignore
/// use gsiterrain::codec::TargetEncoding;
/// use gsiterrain::dispatch::TranscodeService;
/// use tokio_util::sync::CancellationToken;
///
/// let service = TranscodeService::new();
/// let tile = service
///     .dispatch(png_bytes, TargetEncoding::Terrarium, CancellationToken::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct TranscodeService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    table: Arc<PendingTable>,
    transcoder: Arc<dyn TileTranscoder>,
    worker: Mutex<Option<WorkerHandle>>,
}

impl TranscodeService {
    /// Creates a service backed by the CPU transcoder.
    pub fn new() -> Self {
        Self::with_transcoder(Arc::new(CpuTranscoder::new()))
    }

    /// Creates a service backed by a custom transcoding strategy.
    pub fn with_transcoder(transcoder: Arc<dyn TileTranscoder>) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                table: Arc::new(PendingTable::new()),
                transcoder,
                worker: Mutex::new(None),
            }),
        }
    }

    /// Number of requests currently awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.inner.table.len()
    }

    /// Transcodes one compressed tile on the background worker.
    ///
    /// The returned future settles exactly once:
    ///
    /// - with the re-encoded bytes on success;
    /// - with [`DispatchError::Cancelled`] if `token` fires first, in which
    ///   case a later worker response for this request is dropped silently;
    /// - with [`DispatchError::Transcode`] if the worker rejects the tile;
    /// - with [`DispatchError::WorkerFailed`] if the worker dies before
    ///   responding. The next dispatch starts a replacement worker.
    ///
    /// Cancellation is cooperative: the worker skips requests whose token
    /// fired before it got to them, but a transform already underway runs to
    /// completion and its result is discarded.
    pub async fn dispatch(
        &self,
        png: Bytes,
        encoding: TargetEncoding,
        token: CancellationToken,
    ) -> Result<Bytes, DispatchError> {
        let (id, response) = self.inner.table.register();
        let job = TranscodeJob {
            id,
            png,
            encoding,
            token: token.clone(),
        };

        if self.send_job(job).is_err() {
            self.inner.table.discard(id);
            return Err(DispatchError::WorkerFailed);
        }
        debug!(id, encoding = %encoding, "transcode request dispatched");

        tokio::select! {
            _ = token.cancelled() => {
                self.inner.table.discard(id);
                debug!(id, "request cancelled while awaiting transcode");
                Err(DispatchError::Cancelled)
            }
            settled = response => match settled {
                Ok(result) => result,
                Err(_) => Err(DispatchError::WorkerFailed),
            },
        }
    }

    /// Sends a job to the worker, starting or replacing the worker first
    /// when necessary.
    fn send_job(&self, job: TranscodeJob) -> Result<(), DispatchError> {
        let mut worker = self.inner.worker.lock();

        if worker.as_ref().map_or(true, WorkerHandle::is_closed) {
            if worker.is_some() {
                warn!("transcode worker terminated, starting a replacement");
            } else {
                info!("starting transcode worker");
            }
            let handle = WorkerHandle::spawn(
                Arc::clone(&self.inner.table),
                Arc::clone(&self.inner.transcoder),
            )
            .map_err(|e| {
                warn!(error = %e, "failed to spawn transcode worker");
                DispatchError::WorkerFailed
            })?;
            *worker = Some(handle);
        }

        match worker.as_ref() {
            Some(handle) => handle.send(job).map_err(|_| DispatchError::WorkerFailed),
            None => Err(DispatchError::WorkerFailed),
        }
    }
}

impl Default for TranscodeService {
    fn default() -> Self {
        Self::new()
    }
}

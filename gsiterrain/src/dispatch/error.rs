//! Error types for request dispatch.

use thiserror::Error;

use crate::transcoder::TranscodeError;

/// Errors surfaced by [`TranscodeService::dispatch`].
///
/// [`TranscodeService::dispatch`]: super::TranscodeService::dispatch
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker reported a transcode failure for this request.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// The worker terminated before this request settled.
    #[error("transcode worker terminated before the request completed")]
    WorkerFailed,

    /// The request's cancellation signal fired before a response arrived.
    #[error("request cancelled")]
    Cancelled,
}

impl DispatchError {
    /// True when the failure was caller-initiated.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cancelled() {
        assert!(DispatchError::Cancelled.is_cancelled());
        assert!(!DispatchError::WorkerFailed.is_cancelled());
    }
}

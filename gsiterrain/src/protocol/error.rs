//! Error types surfaced to the host engine.

use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::transcoder::TranscodeError;

use super::http::FetchError;

/// Errors a protocol handler reports back to the host engine.
///
/// Nothing here is retried internally; the host's own tile-failure policy
/// decides what happens next.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The tile bytes could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The worker failed to transcode the fetched tile.
    #[error(transparent)]
    Transcode(TranscodeError),

    /// The transcode worker died before the request settled.
    #[error("transcode worker failed")]
    Worker,

    /// The request was cancelled by its caller.
    #[error("request cancelled")]
    Cancelled,

    /// The tile URL does not carry the handler's scheme prefix.
    #[error("tile URL {url} does not match scheme {scheme}")]
    SchemeMismatch {
        /// The offending URL.
        url: String,
        /// The scheme the handler answers for.
        scheme: String,
    },

    /// No handler is registered for the URL's scheme.
    #[error("no protocol registered for scheme {0}")]
    UnregisteredScheme(String),
}

impl ProtocolError {
    /// True when the failure was caller-initiated and not a system fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<DispatchError> for ProtocolError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Transcode(e) => Self::Transcode(e),
            DispatchError::WorkerFailed => Self::Worker,
            DispatchError::Cancelled => Self::Cancelled,
        }
    }
}

//! Custom URL scheme registry.
//!
//! Mirrors the host map engine's protocol surface: handlers are registered
//! under a scheme token and looked up when the engine resolves a prefixed
//! tile URL.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::ProtocolError;

/// One tile request as handed to a protocol handler.
///
/// `url` still carries the scheme prefix. `token` is the request's
/// cancellation signal, shared with the host engine: the host fires it to
/// abandon the tile, and the handler fires it to signal failure back.
#[derive(Clone, Debug)]
pub struct ProtocolRequest {
    /// Prefixed tile URL, e.g. `gsidem://https://example.com/1/0/0.png`.
    pub url: String,
    /// Cancellation signal tied to this request.
    pub token: CancellationToken,
}

impl ProtocolRequest {
    /// Creates a request with a fresh cancellation token.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_token(url, CancellationToken::new())
    }

    /// Creates a request tied to an existing cancellation token.
    pub fn with_token(url: impl Into<String>, token: CancellationToken) -> Self {
        Self {
            url: url.into(),
            token,
        }
    }
}

/// Future type returned by [`ProtocolHandler::handle`].
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Bytes, ProtocolError>> + Send + 'a>>;

/// An async tile protocol hook.
///
/// The cancellable-future shape replaces the host engine's bare callback
/// contract: the future resolves with tile bytes or an error, and dropping
/// it abandons the request.
pub trait ProtocolHandler: Send + Sync {
    /// Resolves one tile request to its final bytes.
    fn handle(&self, request: ProtocolRequest) -> HandlerFuture<'_>;
}

/// Registry of custom URL schemes, keyed by scheme token.
#[derive(Default)]
pub struct ProtocolRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn ProtocolHandler>>>,
}

impl ProtocolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `scheme`, replacing any previous handler.
    ///
    /// Replacement affects future lookups only. Requests already running on
    /// a previously registered handler keep their pending operations; the
    /// old handler stays alive until its last in-flight request settles.
    pub fn add_protocol(&self, scheme: impl Into<String>, handler: Arc<dyn ProtocolHandler>) {
        let scheme = scheme.into();
        if self
            .handlers
            .write()
            .insert(scheme.clone(), handler)
            .is_some()
        {
            debug!(scheme = %scheme, "replacing existing protocol handler");
        }
    }

    /// Removes the handler for `scheme`, returning whether one existed.
    pub fn remove_protocol(&self, scheme: &str) -> bool {
        self.handlers.write().remove(scheme).is_some()
    }

    /// Looks up the handler registered for `scheme`.
    pub fn handler(&self, scheme: &str) -> Option<Arc<dyn ProtocolHandler>> {
        self.handlers.read().get(scheme).cloned()
    }

    /// Resolves a prefixed tile URL through its registered handler.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnregisteredScheme`] when the URL has no
    /// scheme prefix or no handler is registered for it; otherwise whatever
    /// the handler returns.
    pub async fn resolve(&self, request: ProtocolRequest) -> Result<Bytes, ProtocolError> {
        let scheme = match request.url.split_once("://") {
            Some((scheme, _)) => scheme.to_string(),
            None => return Err(ProtocolError::UnregisteredScheme(request.url.clone())),
        };
        let handler = self
            .handler(&scheme)
            .ok_or(ProtocolError::UnregisteredScheme(scheme))?;
        handler.handle(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticHandler {
        payload: &'static [u8],
    }

    impl ProtocolHandler for StaticHandler {
        fn handle(&self, _request: ProtocolRequest) -> HandlerFuture<'_> {
            Box::pin(async move { Ok(Bytes::from_static(self.payload)) })
        }
    }

    #[test]
    fn test_add_and_lookup() {
        let registry = ProtocolRegistry::new();
        registry.add_protocol("dem", Arc::new(StaticHandler { payload: b"a" }));
        assert!(registry.handler("dem").is_some());
        assert!(registry.handler("other").is_none());
    }

    #[test]
    fn test_reregistration_replaces_handler() {
        let registry = ProtocolRegistry::new();
        registry.add_protocol("dem", Arc::new(StaticHandler { payload: b"first" }));
        let old = registry.handler("dem").unwrap();
        registry.add_protocol("dem", Arc::new(StaticHandler { payload: b"second" }));

        // The old handler object remains usable while anything holds it.
        assert!(registry.handler("dem").is_some());
        drop(old);
    }

    #[test]
    fn test_remove_protocol() {
        let registry = ProtocolRegistry::new();
        registry.add_protocol("dem", Arc::new(StaticHandler { payload: b"a" }));
        assert!(registry.remove_protocol("dem"));
        assert!(!registry.remove_protocol("dem"));
        assert!(registry.handler("dem").is_none());
    }

    #[tokio::test]
    async fn test_resolve_routes_by_scheme() {
        let registry = ProtocolRegistry::new();
        registry.add_protocol("dem", Arc::new(StaticHandler { payload: b"tile" }));

        let bytes = registry
            .resolve(ProtocolRequest::new("dem://https://example.com/1/0/0.png"))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"tile");
    }

    #[tokio::test]
    async fn test_resolve_unknown_scheme() {
        let registry = ProtocolRegistry::new();
        let err = registry
            .resolve(ProtocolRequest::new("nope://https://example.com/1/0/0.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::UnregisteredScheme(_)));
    }

    #[tokio::test]
    async fn test_resolve_unprefixed_url() {
        let registry = ProtocolRegistry::new();
        let err = registry
            .resolve(ProtocolRequest::new("no-scheme-here"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::UnregisteredScheme(_)));
    }
}

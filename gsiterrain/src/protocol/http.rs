//! HTTP client abstraction for tile fetches.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

/// Default request timeout for tile fetches, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Errors raised while fetching tile bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be built or did not complete.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },
}

/// Future type returned by [`AsyncHttpClient::get`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Bytes, FetchError>> + Send + 'a>>;

/// Trait for asynchronous HTTP GET operations.
///
/// Keeps the tile protocol independent of a concrete HTTP stack and lets
/// tests substitute canned responses. The boxed future keeps the trait
/// object-safe.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request, resolving with the response body.
    fn get<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

/// HTTP client implementation backed by reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn get<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Request(format!("request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            response
                .bytes()
                .await
                .map_err(|e| FetchError::Request(format!("failed to read response: {}", e)))
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock HTTP client serving a canned response.
    pub struct MockAsyncHttpClient {
        pub response: Result<Vec<u8>, FetchError>,
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        fn get<'a>(&'a self, _url: &'a str) -> FetchFuture<'a> {
            let response = self.response.clone().map(Bytes::from);
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockAsyncHttpClient {
            response: Ok(vec![1, 2, 3, 4]),
        };
        let body = mock.get("http://example.com").await.unwrap();
        assert_eq!(&body[..], &[1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockAsyncHttpClient {
            response: Err(FetchError::Status {
                status: 404,
                url: "http://example.com/0/0/0.png".to_string(),
            }),
        };
        let err = mock.get("http://example.com/0/0/0.png").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404 from http://example.com/0/0/0.png");
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::new().is_ok());
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}

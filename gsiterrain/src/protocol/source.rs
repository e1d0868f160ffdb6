//! GSI DEM tile source adapter.
//!
//! [`TerrainTileProtocol`] is the handler the host engine calls for every
//! tile: it strips the custom scheme prefix, fetches the real tile, routes
//! it through the [`TranscodeService`] and hands the re-encoded bytes back.
//! [`gsi_terrain_source`] wires a handler into a registry and returns the
//! raster-dem source descriptor a host plugs into its style.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::codec::TargetEncoding;
use crate::dispatch::TranscodeService;

use super::error::ProtocolError;
use super::http::AsyncHttpClient;
use super::registry::{HandlerFuture, ProtocolHandler, ProtocolRegistry, ProtocolRequest};

/// Default GSI DEM tile URL template.
pub const DEFAULT_TILE_URL: &str = "https://cyberjapandata.gsi.go.jp/xyz/dem_png/{z}/{x}/{y}.png";

/// Scheme token registered by [`gsi_terrain_source`].
pub const GSIDEM_SCHEME: &str = "gsidem";

/// Edge length of a DEM tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Configuration consumed by the adapter at registration time.
///
/// Pass-through values: everything except `encoding` goes straight into the
/// returned [`RasterDemSource`].
#[derive(Clone, Debug)]
pub struct TerrainSourceConfig {
    /// Tile URL template with `{z}/{x}/{y}` placeholders, substituted by
    /// the host engine.
    pub tile_url: String,
    /// Minimum zoom level offered to the host engine.
    pub minzoom: u8,
    /// Maximum zoom level offered to the host engine.
    pub maxzoom: u8,
    /// Attribution string shown by the host engine.
    pub attribution: String,
    /// Output packing for transcoded tiles.
    pub encoding: TargetEncoding,
    /// Tile edge length in pixels.
    pub tile_size: u32,
}

impl Default for TerrainSourceConfig {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_string(),
            minzoom: 1,
            maxzoom: 14,
            attribution: String::new(),
            encoding: TargetEncoding::Terrarium,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

/// Raster-dem source descriptor handed to the host engine at registration.
///
/// Tile URLs carry the custom scheme prefix, so the engine's requests for
/// this source route back through the registered handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterDemSource {
    /// Always `"raster-dem"`.
    pub source_type: &'static str,
    /// Encoding name the host should decode tiles with.
    pub encoding: &'static str,
    /// Prefixed tile URL templates.
    pub tiles: Vec<String>,
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Minimum zoom level.
    pub minzoom: u8,
    /// Maximum zoom level.
    pub maxzoom: u8,
    /// Attribution string.
    pub attribution: String,
}

/// Protocol handler that fetches GSI DEM tiles and transcodes them.
///
/// Generic over the HTTP client so tests can substitute canned responses.
/// Each request moves through `fetching` and `dispatched` before reaching a
/// terminal outcome; any failure cancels the request's token so the host
/// engine sees the request as settled, then surfaces the error. No retries
/// happen at this layer.
pub struct TerrainTileProtocol<C: AsyncHttpClient> {
    scheme: String,
    http_client: C,
    service: TranscodeService,
    encoding: TargetEncoding,
}

impl<C: AsyncHttpClient> TerrainTileProtocol<C> {
    /// Creates a handler answering for `scheme`.
    pub fn new(
        scheme: impl Into<String>,
        http_client: C,
        service: TranscodeService,
        encoding: TargetEncoding,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            http_client,
            service,
            encoding,
        }
    }

    /// Scheme token this handler answers for.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Recovers the real tile URL by stripping the scheme prefix.
    fn strip_scheme<'a>(&self, url: &'a str) -> Result<&'a str, ProtocolError> {
        let prefix = format!("{}://", self.scheme);
        url.strip_prefix(&prefix)
            .ok_or_else(|| ProtocolError::SchemeMismatch {
                url: url.to_string(),
                scheme: self.scheme.clone(),
            })
    }

    async fn run(&self, request: &ProtocolRequest) -> Result<Bytes, ProtocolError> {
        let tile_url = self.strip_scheme(&request.url)?;
        debug!(url = %tile_url, "fetching DEM tile");
        let png = self.http_client.get(tile_url).await?;

        let transcoded = self
            .service
            .dispatch(png, self.encoding, request.token.clone())
            .await?;
        Ok(transcoded)
    }
}

impl<C: AsyncHttpClient> ProtocolHandler for TerrainTileProtocol<C> {
    fn handle(&self, request: ProtocolRequest) -> HandlerFuture<'_> {
        Box::pin(async move {
            match self.run(&request).await {
                Ok(bytes) => Ok(bytes),
                Err(err) => {
                    // Settle the host-side signal before surfacing the error.
                    request.token.cancel();
                    Err(err)
                }
            }
        })
    }
}

/// Registers the GSI DEM protocol and returns the matching source
/// descriptor.
///
/// # Example
///
/// ```ignore
/// use gsiterrain::dispatch::TranscodeService;
/// use gsiterrain::protocol::{
///     gsi_terrain_source, ProtocolRegistry, ReqwestClient, TerrainSourceConfig,
/// };
///
/// let registry = ProtocolRegistry::new();
/// let client = ReqwestClient::new()?;
/// let source = gsi_terrain_source(
///     &registry,
///     TranscodeService::new(),
///     client,
///     TerrainSourceConfig::default(),
/// );
/// assert_eq!(source.tiles[0], "gsidem://https://cyberjapandata.gsi.go.jp/xyz/dem_png/{z}/{x}/{y}.png");
/// ```
pub fn gsi_terrain_source<C>(
    registry: &ProtocolRegistry,
    service: TranscodeService,
    http_client: C,
    config: TerrainSourceConfig,
) -> RasterDemSource
where
    C: AsyncHttpClient + 'static,
{
    let handler = TerrainTileProtocol::new(GSIDEM_SCHEME, http_client, service, config.encoding);
    registry.add_protocol(GSIDEM_SCHEME, Arc::new(handler));

    RasterDemSource {
        source_type: "raster-dem",
        encoding: config.encoding.name(),
        tiles: vec![format!("{}://{}", GSIDEM_SCHEME, config.tile_url)],
        tile_size: config.tile_size,
        minzoom: config.minzoom,
        maxzoom: config.maxzoom,
        attribution: config.attribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FetchError, MockAsyncHttpClient};

    fn mock_ok(bytes: &[u8]) -> MockAsyncHttpClient {
        MockAsyncHttpClient {
            response: Ok(bytes.to_vec()),
        }
    }

    #[test]
    fn test_default_config_is_gsi() {
        let config = TerrainSourceConfig::default();
        assert_eq!(config.tile_url, DEFAULT_TILE_URL);
        assert_eq!(config.minzoom, 1);
        assert_eq!(config.maxzoom, 14);
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.encoding, TargetEncoding::Terrarium);
        assert!(config.attribution.is_empty());
    }

    #[test]
    fn test_strip_scheme() {
        let protocol = TerrainTileProtocol::new(
            "gsidem",
            mock_ok(b""),
            TranscodeService::new(),
            TargetEncoding::Terrarium,
        );
        assert_eq!(
            protocol
                .strip_scheme("gsidem://https://example.com/1/0/0.png")
                .unwrap(),
            "https://example.com/1/0/0.png"
        );
        assert!(protocol.strip_scheme("https://example.com/1/0/0.png").is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure_cancels_token() {
        let protocol = TerrainTileProtocol::new(
            "gsidem",
            MockAsyncHttpClient {
                response: Err(FetchError::Status {
                    status: 404,
                    url: "https://example.com/1/0/0.png".to_string(),
                }),
            },
            TranscodeService::new(),
            TargetEncoding::Terrarium,
        );

        let request = ProtocolRequest::new("gsidem://https://example.com/1/0/0.png");
        let token = request.token.clone();
        let err = protocol.handle(request).await.unwrap_err();

        assert!(matches!(err, ProtocolError::Fetch(_)));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_undecodable_tile_surfaces_transcode_error() {
        let protocol = TerrainTileProtocol::new(
            "gsidem",
            mock_ok(b"not a png"),
            TranscodeService::new(),
            TargetEncoding::Terrarium,
        );

        let request = ProtocolRequest::new("gsidem://https://example.com/1/0/0.png");
        let err = protocol.handle(request).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Transcode(_)));
    }

    #[test]
    fn test_source_descriptor_fields() {
        let registry = ProtocolRegistry::new();
        let source = gsi_terrain_source(
            &registry,
            TranscodeService::new(),
            mock_ok(b""),
            TerrainSourceConfig {
                attribution: "GSI Japan".to_string(),
                maxzoom: 17,
                ..TerrainSourceConfig::default()
            },
        );

        assert_eq!(source.source_type, "raster-dem");
        assert_eq!(source.encoding, "terrarium");
        assert_eq!(source.tiles, vec![format!("gsidem://{}", DEFAULT_TILE_URL)]);
        assert_eq!(source.tile_size, 256);
        assert_eq!(source.minzoom, 1);
        assert_eq!(source.maxzoom, 17);
        assert_eq!(source.attribution, "GSI Japan");
        assert!(registry.handler(GSIDEM_SCHEME).is_some());
    }

    #[test]
    fn test_terrain_rgb_source_reports_mapbox_encoding() {
        let registry = ProtocolRegistry::new();
        let source = gsi_terrain_source(
            &registry,
            TranscodeService::new(),
            mock_ok(b""),
            TerrainSourceConfig {
                encoding: TargetEncoding::TerrainRgb,
                ..TerrainSourceConfig::default()
            },
        );
        assert_eq!(source.encoding, "mapbox");
    }
}

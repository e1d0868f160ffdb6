//! Tile source adapter and host engine surface.
//!
//! This module is the outward-facing edge of the pipeline: the HTTP client
//! abstraction used to fetch source tiles, the scheme registry mirroring
//! the host engine's protocol surface, and the GSI DEM tile source adapter
//! that ties fetch, dispatch and transcode together.
//!
//! # Data flow
//!
//! ```text
//! host engine ──► ProtocolRegistry ──► TerrainTileProtocol
//!                                        │ strip scheme prefix
//!                                        │ AsyncHttpClient::get
//!                                        ▼
//!                                  TranscodeService ──► re-encoded bytes
//! ```

mod error;
mod http;
mod registry;
mod source;

pub use error::ProtocolError;
pub use http::{AsyncHttpClient, FetchError, FetchFuture, ReqwestClient, DEFAULT_FETCH_TIMEOUT_SECS};
pub use registry::{HandlerFuture, ProtocolHandler, ProtocolRegistry, ProtocolRequest};
pub use source::{
    gsi_terrain_source, RasterDemSource, TerrainSourceConfig, TerrainTileProtocol,
    DEFAULT_TILE_SIZE, DEFAULT_TILE_URL, GSIDEM_SCHEME,
};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

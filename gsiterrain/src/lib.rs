//! GsiTerrain - on-the-fly elevation tile transcoding for raster-dem
//! terrain consumers.
//!
//! GSI publishes Japan-wide elevation tiles in its own color packing, which
//! mainstream map engines cannot consume directly. This library registers a
//! custom tile protocol that fetches those tiles, decodes the elevation of
//! every pixel and re-encodes it into a packing the engine understands
//! (Terrarium or Terrain-RGB), off the caller's event loop and with
//! per-request cancellation.
//!
//! # Pipeline
//!
//! ```text
//! host engine ─► protocol (fetch) ─► dispatch ─► worker thread
//!                                                  │ decode PNG
//!                                                  │ transcode pixels
//!                                                  │ encode PNG
//! host engine ◄─ protocol ◄──────── dispatch ◄─────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gsiterrain::dispatch::TranscodeService;
//! use gsiterrain::protocol::{
//!     gsi_terrain_source, ProtocolRegistry, ReqwestClient, TerrainSourceConfig,
//! };
//!
//! let registry = ProtocolRegistry::new();
//! let source = gsi_terrain_source(
//!     &registry,
//!     TranscodeService::new(),
//!     ReqwestClient::new()?,
//!     TerrainSourceConfig::default(),
//! );
//! // Hand `source` to the host engine; its tile requests now resolve
//! // through `registry`.
//! ```

pub mod codec;
pub mod dispatch;
pub mod protocol;
pub mod raster;
pub mod transcoder;

pub use codec::{decode_gsidem, CodecError, TargetEncoding};
pub use dispatch::{DispatchError, TranscodeService};
pub use protocol::{
    gsi_terrain_source, ProtocolError, ProtocolRegistry, ProtocolRequest, RasterDemSource,
    TerrainSourceConfig,
};
pub use raster::{RasterBuffer, RasterError};
pub use transcoder::{CpuTranscoder, TileTranscoder, TranscodeError};

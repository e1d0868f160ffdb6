//! Tile transcoding strategies.
//!
//! The [`TileTranscoder`] trait is the seam between the dispatch layer and
//! the actual pixel work. Callers hand over compressed tile bytes and
//! receive compressed tile bytes; raw pixels never cross the boundary, so a
//! strategy owns its own decode and encode capability.
//!
//! ```text
//! ┌──────────────────────┐
//! │   TranscodeService   │
//! │                      │
//! │ Arc<dyn TileTranscoder>
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │    TileTranscoder    │ (trait)
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     ┌──────────────┐
//!     │CpuTranscoder │
//!     └──────────────┘
//! ```
//!
//! [`CpuTranscoder`] is the canonical implementation, a scalar per-pixel
//! loop. The trait leaves room for accelerated strategies (a GPU shader
//! pass, a SIMD loop) without touching the dispatch layer.

mod cpu;
mod error;

pub use cpu::CpuTranscoder;
pub use error::TranscodeError;

use crate::codec::TargetEncoding;

/// Strategy for converting one compressed DEM tile into a target packing.
///
/// Implementations must be thread-safe: a transcoder is created once, moved
/// behind the background worker and reused for every request routed to it.
pub trait TileTranscoder: Send + Sync + 'static {
    /// Short strategy name for logging.
    fn name(&self) -> &str;

    /// Decodes `png`, re-encodes every pixel's elevation into `encoding`
    /// and returns the re-compressed image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TranscodeError`] when the bytes are not a decodable image,
    /// when a pixel's elevation does not fit the target packing, or when
    /// re-encoding fails.
    fn transcode(&self, png: &[u8], encoding: TargetEncoding) -> Result<Vec<u8>, TranscodeError>;
}

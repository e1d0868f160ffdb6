//! Raw raster buffers and the per-pixel transcode pass.
//!
//! A [`RasterBuffer`] is the decoded form of a tile image: dimensions,
//! channel count and a flat byte array. [`transcode_in_place`] walks such a
//! buffer once, rewriting every pixel from the GSI DEM packing into a
//! selected target packing and applying the invalid-pixel fallback policy.

mod buffer;
mod error;
mod transform;

pub use buffer::RasterBuffer;
pub use error::RasterError;
pub use transform::transcode_in_place;

//! Error types for raster buffer construction.

use thiserror::Error;

/// Errors that can occur when constructing a [`RasterBuffer`].
///
/// [`RasterBuffer`]: super::RasterBuffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The byte array does not match the declared dimensions.
    #[error("buffer holds {actual} bytes, expected {expected} for the given dimensions")]
    LengthMismatch {
        /// Bytes implied by width, height and channel count.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// The channel count is neither RGB nor RGBA.
    #[error("unsupported channel count {0}, expected 3 (RGB) or 4 (RGBA)")]
    UnsupportedChannels(u8),
}

//! Decoded raster image buffer.

use super::error::RasterError;

/// A decoded raster image: dimensions, channel count and flat pixel bytes.
///
/// The buffer is owned by whichever pipeline stage currently holds it; the
/// fetch result belongs to the tile source adapter until it crosses into the
/// worker, and the transformed result belongs to the worker until it is
/// serialized back to compressed bytes.
///
/// Pixels are stored row-major with interleaved channels, so the byte array
/// holds exactly `width * height * channels` entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Creates a buffer from raw parts, validating the layout.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::UnsupportedChannels`] unless `channels` is 3
    /// or 4, and [`RasterError::LengthMismatch`] when `data` does not hold
    /// exactly `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, RasterError> {
        if channels != 3 && channels != 4 {
            return Err(RasterError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * usize::from(channels);
        if data.len() != expected {
            return Err(RasterError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channels per pixel (3 for RGB, 4 for RGBA).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel bytes, row-major with interleaved channels.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning the pixel bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

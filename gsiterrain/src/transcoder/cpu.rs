//! CPU pixel-loop transcoder.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

use crate::codec::TargetEncoding;
use crate::raster::{transcode_in_place, RasterBuffer};

use super::error::TranscodeError;
use super::TileTranscoder;

/// Transcodes tiles with a scalar per-pixel loop.
///
/// Decoded tiles are expanded to RGBA before the transform. RGB sources gain
/// an opaque alpha channel, while sources with transparency keep their zero
/// alpha values, so no-data holes at a tile's valid-data boundary reach the
/// transform as transparent pixels and fall back to the zero-elevation
/// pixel. The output is always an opaque RGBA PNG.
///
/// The transcoder is stateless and can be shared freely across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuTranscoder;

impl CpuTranscoder {
    /// Creates a new CPU transcoder.
    pub fn new() -> Self {
        Self
    }
}

impl TileTranscoder for CpuTranscoder {
    fn name(&self) -> &str {
        "cpu"
    }

    fn transcode(&self, png: &[u8], encoding: TargetEncoding) -> Result<Vec<u8>, TranscodeError> {
        let decoded = image::load_from_memory_with_format(png, ImageFormat::Png)
            .map_err(TranscodeError::Decode)?;
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();

        let mut buffer = RasterBuffer::new(width, height, 4, rgba.into_raw())?;
        transcode_in_place(&mut buffer, encoding)?;

        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(buffer.data(), width, height, ExtendedColorType::Rgba8)
            .map_err(TranscodeError::Encode)?;
        Ok(out)
    }
}

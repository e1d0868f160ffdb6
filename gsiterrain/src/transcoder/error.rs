//! Error types for tile transcoding.

use thiserror::Error;

use crate::codec::CodecError;
use crate::raster::RasterError;

/// Errors that can occur while transcoding a compressed tile image.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The fetched bytes are not a decodable image.
    #[error("failed to decode tile image: {0}")]
    Decode(image::ImageError),

    /// Re-encoding the transformed pixel buffer failed.
    #[error("failed to encode transcoded tile: {0}")]
    Encode(image::ImageError),

    /// The decoded image does not form a usable pixel buffer.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A pixel decoded to an elevation the target packing cannot hold.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TargetEncoding;

    #[test]
    fn test_codec_error_converts() {
        let codec_err = CodecError::ElevationOutOfRange {
            elevation: 90000.0,
            encoding: TargetEncoding::Terrarium,
        };
        let err: TranscodeError = codec_err.into();
        assert!(matches!(err, TranscodeError::Codec(_)));
        assert!(err.to_string().contains("90000"));
    }

    #[test]
    fn test_raster_error_converts() {
        let raster_err = RasterError::UnsupportedChannels(2);
        let err: TranscodeError = raster_err.into();
        assert!(matches!(err, TranscodeError::Raster(_)));
    }
}

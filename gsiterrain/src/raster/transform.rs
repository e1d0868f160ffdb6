//! Per-pixel elevation transcoding over a raster buffer.

use crate::codec::{decode_gsidem, is_gsidem_sentinel, CodecError, TargetEncoding};

use super::buffer::RasterBuffer;

/// Rewrites every pixel of `buffer` from the GSI DEM packing into `encoding`.
///
/// A pixel is treated as invalid when its RGB channels carry the GSI no-data
/// sentinel, or when the buffer has an alpha channel and the pixel is fully
/// transparent. DEM tiles legitimately have transparent holes at their
/// valid-data boundary; both cases skip the codec arithmetic and receive the
/// encoding's fixed zero-elevation pixel.
///
/// RGBA buffers come out fully opaque. The target packings carry no
/// transparency semantics, and the alpha byte would otherwise leak whatever
/// the source tile had there.
///
/// # Errors
///
/// Returns [`CodecError::ElevationOutOfRange`] if a valid pixel decodes to
/// an elevation the target packing cannot represent.
pub fn transcode_in_place(
    buffer: &mut RasterBuffer,
    encoding: TargetEncoding,
) -> Result<(), CodecError> {
    let channels = usize::from(buffer.channels());
    let has_alpha = channels == 4;
    let zero = encoding.zero_pixel();

    for pixel in buffer.data_mut().chunks_exact_mut(channels) {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
        let invalid = is_gsidem_sentinel(r, g, b) || (has_alpha && pixel[3] == 0);

        let out = if invalid {
            zero
        } else {
            encoding.encode(decode_gsidem(r, g, b))?
        };

        pixel[..3].copy_from_slice(&out);
        if has_alpha {
            pixel[3] = u8::MAX;
        }
    }

    Ok(())
}

//! Selectable output packings for transcoded elevation pixels.

use std::fmt;

use super::error::CodecError;

/// Output pixel packing for transcoded elevation tiles.
///
/// Which packing a host expects is part of its raster-dem source
/// configuration, so the choice is a runtime parameter of the pipeline
/// rather than a compile-time constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TargetEncoding {
    /// Terrarium packing: `elevation = R * 256 + G + B / 256 - 32768`.
    ///
    /// Covers roughly -32768 m to 32767 m, with sub-meter precision carried
    /// in the blue channel (1/256 m per count).
    #[default]
    Terrarium,

    /// Terrain-RGB packing: `elevation = (R * 65536 + G * 256 + B) / 10 - 10000`.
    ///
    /// Fixed point at 0.1 m resolution with a 10000 m offset.
    TerrainRgb,
}

impl TargetEncoding {
    /// Encoding name as used by raster-dem source specifications.
    pub fn name(self) -> &'static str {
        match self {
            Self::Terrarium => "terrarium",
            Self::TerrainRgb => "mapbox",
        }
    }

    /// Smallest elevation difference the packing can represent, in meters.
    pub fn resolution_m(self) -> f64 {
        match self {
            Self::Terrarium => 1.0 / 256.0,
            Self::TerrainRgb => 0.1,
        }
    }

    /// Encodes an elevation in meters into a pixel triple.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ElevationOutOfRange`] when the elevation does
    /// not fit the packing's domain (including NaN and infinities).
    pub fn encode(self, elevation: f64) -> Result<[u8; 3], CodecError> {
        match self {
            Self::Terrarium => {
                let value = elevation + 32768.0;
                if !(0.0..65536.0).contains(&value) {
                    return Err(CodecError::ElevationOutOfRange {
                        elevation,
                        encoding: self,
                    });
                }
                let whole = value.floor();
                let r = (value / 256.0).floor() as u8;
                let g = (whole % 256.0) as u8;
                let b = ((value - whole) * 256.0).floor() as u8;
                Ok([r, g, b])
            }
            Self::TerrainRgb => {
                let packed = ((elevation + 10000.0) * 10.0).floor();
                if !(0.0..=16_777_215.0).contains(&packed) {
                    return Err(CodecError::ElevationOutOfRange {
                        elevation,
                        encoding: self,
                    });
                }
                let packed = packed as u32;
                Ok([
                    (packed >> 16) as u8,
                    ((packed >> 8) & 0xFF) as u8,
                    (packed & 0xFF) as u8,
                ])
            }
        }
    }

    /// Decodes a pixel triple of this packing back into meters.
    pub fn decode(self, r: u8, g: u8, b: u8) -> f64 {
        match self {
            Self::Terrarium => {
                f64::from(r) * 256.0 + f64::from(g) + f64::from(b) / 256.0 - 32768.0
            }
            Self::TerrainRgb => {
                let packed = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
                f64::from(packed) / 10.0 - 10000.0
            }
        }
    }

    /// Fixed pixel emitted for invalid source pixels.
    ///
    /// This is the packing's representation of elevation 0, the value
    /// terrain consumers render as flat ground.
    pub fn zero_pixel(self) -> [u8; 3] {
        match self {
            // 0 + 32768 = 0x8000
            Self::Terrarium => [128, 0, 0],
            // (0 + 10000) * 10 = 0x0186A0
            Self::TerrainRgb => [1, 134, 160],
        }
    }
}

impl fmt::Display for TargetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    /// Representative elevations spanning the common terrain range.
    const ELEVATIONS_M: &[f64] = &[-10000.0, -100.0, 0.0, 100.0, 3776.0, 8848.0];

    #[test]
    fn test_terrarium_encode_zero() {
        // 32768 / 256 = 128 with no remainder and no fraction.
        assert_eq!(TargetEncoding::Terrarium.encode(0.0).unwrap(), [128, 0, 0]);
    }

    #[test]
    fn test_terrarium_zero_matches_zero_pixel() {
        let encoding = TargetEncoding::Terrarium;
        assert_eq!(encoding.encode(0.0).unwrap(), encoding.zero_pixel());
    }

    #[test]
    fn test_terrarium_round_trip_representative() {
        let encoding = TargetEncoding::Terrarium;
        for &elevation in ELEVATIONS_M {
            let [r, g, b] = encoding.encode(elevation).unwrap();
            let decoded = encoding.decode(r, g, b);
            assert!(
                (decoded - elevation).abs() < encoding.resolution_m(),
                "terrarium round trip of {} m gave {} m",
                elevation,
                decoded
            );
        }
    }

    #[test]
    fn test_terrain_rgb_round_trip_representative() {
        let encoding = TargetEncoding::TerrainRgb;
        for &elevation in ELEVATIONS_M {
            let [r, g, b] = encoding.encode(elevation).unwrap();
            let decoded = encoding.decode(r, g, b);
            assert!(
                (decoded - elevation).abs() < encoding.resolution_m() + 1e-9,
                "terrain-rgb round trip of {} m gave {} m",
                elevation,
                decoded
            );
        }
    }

    #[test]
    fn test_terrarium_mount_fuji() {
        let encoding = TargetEncoding::Terrarium;
        let [r, g, b] = encoding.encode(3776.0).unwrap();
        assert_eq!([r, g, b], [142, 192, 0]);
        assert_relative_eq!(encoding.decode(r, g, b), 3776.0);
    }

    #[test]
    fn test_terrarium_sub_meter_precision_in_blue() {
        let [r, g, b] = TargetEncoding::Terrarium.encode(0.5).unwrap();
        assert_eq!([r, g, b], [128, 0, 128]);
        assert_relative_eq!(TargetEncoding::Terrarium.decode(r, g, b), 0.5);
    }

    #[test]
    fn test_terrarium_range_limits() {
        let encoding = TargetEncoding::Terrarium;
        assert_eq!(encoding.encode(-32768.0).unwrap(), [0, 0, 0]);
        assert!(encoding.encode(32767.99).is_ok());
        assert!(encoding.encode(32768.0).is_err());
        assert!(encoding.encode(-32768.01).is_err());
        assert!(encoding.encode(f64::NAN).is_err());
        assert!(encoding.encode(f64::INFINITY).is_err());
    }

    #[test]
    fn test_terrain_rgb_range_limits() {
        let encoding = TargetEncoding::TerrainRgb;
        assert_eq!(encoding.encode(-10000.0).unwrap(), [0, 0, 0]);
        assert!(encoding.encode(-10000.1).is_err());
        assert!(encoding.encode(1_667_721.5).is_ok());
        assert!(encoding.encode(1_667_722.0).is_err());
        assert!(encoding.encode(f64::NAN).is_err());
    }

    #[test]
    fn test_terrain_rgb_zero_pixel_matches_formula() {
        let encoding = TargetEncoding::TerrainRgb;
        assert_eq!(encoding.encode(0.0).unwrap(), encoding.zero_pixel());
        assert_eq!(encoding.zero_pixel(), [1, 134, 160]);
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(TargetEncoding::Terrarium.name(), "terrarium");
        assert_eq!(TargetEncoding::TerrainRgb.name(), "mapbox");
        assert_eq!(TargetEncoding::Terrarium.to_string(), "terrarium");
    }

    #[test]
    fn test_default_is_terrarium() {
        assert_eq!(TargetEncoding::default(), TargetEncoding::Terrarium);
    }

    proptest! {
        #[test]
        fn prop_terrarium_round_trip(elevation in -32768.0f64..32767.9) {
            let encoding = TargetEncoding::Terrarium;
            let [r, g, b] = encoding.encode(elevation).unwrap();
            let decoded = encoding.decode(r, g, b);
            // Flooring each channel loses at most one blue count.
            prop_assert!(decoded <= elevation + 1e-9);
            prop_assert!(decoded > elevation - encoding.resolution_m() - 1e-9);
        }

        #[test]
        fn prop_terrain_rgb_round_trip(elevation in -10000.0f64..1_000_000.0) {
            let encoding = TargetEncoding::TerrainRgb;
            let [r, g, b] = encoding.encode(elevation).unwrap();
            let decoded = encoding.decode(r, g, b);
            prop_assert!(decoded <= elevation + 1e-9);
            prop_assert!(decoded > elevation - encoding.resolution_m() - 1e-9);
        }
    }
}

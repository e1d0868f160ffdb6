//! Elevation codec for DEM tile color packings.
//!
//! This module implements the pure per-pixel contract of the pipeline:
//! decoding an elevation from the GSI DEM packing and re-encoding it into
//! one of the packings understood by raster-dem terrain consumers.
//!
//! # Packings
//!
//! - **GSI DEM** (source): signed 24-bit fixed point across R,G,B at 0.01 m
//!   resolution, with `(128, 0, 0)` reserved as the no-data sentinel.
//! - **Terrarium** (target): `elevation = R * 256 + G + B / 256 - 32768`.
//! - **Terrain-RGB** (target): `elevation = (R * 65536 + G * 256 + B) / 10 - 10000`.
//!
//! # Example
//!
//! ```
//! use gsiterrain::codec::{decode_gsidem, TargetEncoding};
//!
//! let elevation = decode_gsidem(0, 39, 16);
//! assert_eq!(elevation, 100.0);
//!
//! let pixel = TargetEncoding::Terrarium.encode(elevation).unwrap();
//! assert_eq!(pixel, [128, 100, 0]);
//! ```

mod error;
mod gsidem;
mod target;

pub use error::CodecError;
pub use gsidem::{decode_gsidem, is_gsidem_sentinel, GSIDEM_RESOLUTION_M, GSIDEM_SENTINEL};
pub use target::TargetEncoding;

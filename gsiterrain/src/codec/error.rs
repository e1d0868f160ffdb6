//! Error types for elevation codec operations.

use thiserror::Error;

use super::target::TargetEncoding;

/// Errors that can occur while encoding an elevation sample.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CodecError {
    /// The elevation cannot be represented by the selected target encoding.
    #[error("elevation {elevation} m is not representable in the {encoding} encoding")]
    ElevationOutOfRange {
        /// The offending elevation in meters.
        elevation: f64,
        /// The encoding that rejected it.
        encoding: TargetEncoding,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = CodecError::ElevationOutOfRange {
            elevation: 40000.0,
            encoding: TargetEncoding::Terrarium,
        };
        assert_eq!(
            err.to_string(),
            "elevation 40000 m is not representable in the terrarium encoding"
        );
    }
}

//! Encoded Polyline Decoding
//!
//! Decodes Google-style encoded polylines (variable-length zig-zag
//! signed-delta encoding, precision factor 1e5) into coordinate
//! sequences. Valhalla-family backends ship their geometry in this
//! format.
//!
//! Off-by-one mistakes in the varint accumulation silently corrupt every
//! decoded route, so the decoder is tested against the reference string
//! from the format documentation.

use thiserror::Error;

use crate::route::Coordinate;

/// Precision factor for the standard 5-digit encoding.
const PRECISION: f64 = 1e5;

/// A polyline string that ends in the middle of a varint sequence.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("truncated polyline varint at byte {offset}")]
pub struct PolylineError {
    /// Byte offset where input was exhausted mid-value.
    pub offset: usize,
}

/// Decode an encoded polyline into an ordered coordinate sequence.
///
/// # Errors
///
/// Returns [`PolylineError`] if the input ends in the middle of a
/// chunked varint, which indicates a corrupt or truncated payload.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0usize;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while index < bytes.len() {
        let (delta_lat, next) = decode_value(bytes, index)?;
        lat += delta_lat;
        let (delta_lng, next) = decode_value(bytes, next)?;
        lng += delta_lng;
        index = next;

        points.push(Coordinate {
            lat: lat as f64 / PRECISION,
            lng: lng as f64 / PRECISION,
        });
    }

    Ok(points)
}

/// Decode one zig-zag varint starting at `index`, returning the signed
/// delta and the index of the next value.
fn decode_value(bytes: &[u8], mut index: usize) -> Result<(i64, usize), PolylineError> {
    let mut shift = 0u32;
    let mut result = 0i64;

    loop {
        let Some(&byte) = bytes.get(index) else {
            return Err(PolylineError { offset: index });
        };
        index += 1;

        let chunk = i64::from(byte) - 63;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    let delta = if result & 1 != 0 { !(result >> 1) } else { result >> 1 };
    Ok((delta, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reference_string() {
        // Reference vector from the polyline format documentation.
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();

        assert_eq!(points.len(), 3);
        assert!((points[0].lat - 38.5).abs() < 1e-9);
        assert!((points[0].lng - -120.2).abs() < 1e-9);
        assert!((points[1].lat - 40.7).abs() < 1e-9);
        assert!((points[1].lng - -120.95).abs() < 1e-9);
        assert!((points[2].lat - 43.252).abs() < 1e-9);
        assert!((points[2].lng - -126.453).abs() < 1e-9);
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap(), Vec::new());
    }

    #[test]
    fn test_decode_truncated_input() {
        // A continuation byte (>= 0x20 after bias) with nothing after it.
        let err = decode("_").unwrap_err();
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_decode_sign_handling() {
        // The reference string mixes positive and negative deltas; a
        // second pass over just the first pair exercises the negative
        // longitude path in isolation.
        let points = decode("_p~iF~ps|U").unwrap();
        assert_eq!(points.len(), 1);
        assert!(points[0].lat > 0.0);
        assert!(points[0].lng < 0.0);
    }
}

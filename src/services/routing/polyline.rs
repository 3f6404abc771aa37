//! Encoded polyline decoding
//!
//! Standard delta encoding: each point is a signed offset from the
//! previous one, scaled by 10^precision. Google Routes and OSRM encode
//! at precision 5.

use super::RoutingError;
use crate::types::Coordinates;

/// Decode an encoded polyline into an ordered coordinate sequence
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<Coordinates>, RoutingError> {
    let factor = 10_f64.powi(precision as i32);
    let mut coordinates = Vec::new();
    let mut lat = 0i64;
    let mut lng = 0i64;

    let bytes = encoded.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        lat += decode_value(bytes, &mut i)?;
        lng += decode_value(bytes, &mut i)?;
        coordinates.push(Coordinates::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(coordinates)
}

/// Decode one varint-encoded signed delta, advancing the cursor
fn decode_value(bytes: &[u8], i: &mut usize) -> Result<i64, RoutingError> {
    let mut shift = 0;
    let mut result = 0i64;
    loop {
        if *i >= bytes.len() {
            return Err(RoutingError::MalformedResponse("truncated polyline"));
        }
        let byte = bytes[*i] as i64 - 63;
        if byte < 0 {
            return Err(RoutingError::MalformedResponse("invalid polyline character"));
        }
        *i += 1;
        result |= (byte & 0x1f) << shift;
        shift += 5;
        if byte < 0x20 {
            break;
        }
    }
    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reference_vector() {
        // Canonical example from the polyline format documentation
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();

        assert_eq!(points.len(), 3);
        assert!((points[0].lat - 38.5).abs() < 1e-5);
        assert!((points[0].lng - -120.2).abs() < 1e-5);
        assert!((points[1].lat - 40.7).abs() < 1e-5);
        assert!((points[1].lng - -120.95).abs() < 1e-5);
        assert!((points[2].lat - 43.252).abs() < 1e-5);
        assert!((points[2].lng - -126.453).abs() < 1e-5);
    }

    #[test]
    fn test_decode_empty_string() {
        let points = decode_polyline("", 5).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_decode_truncated_input() {
        // Cut mid-value: the longitude of the first point never terminates
        let result = decode_polyline("_p~iF~ps", 5);
        assert!(matches!(
            result,
            Err(RoutingError::MalformedResponse("truncated polyline"))
        ));
    }

    #[test]
    fn test_decode_rejects_bytes_below_offset() {
        let result = decode_polyline("\x1f\x1f", 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_precision_six_scales_differently() {
        // Same bytes decoded at precision 6 give 10x smaller magnitudes
        let five = decode_polyline("_p~iF~ps|U", 5).unwrap();
        let six = decode_polyline("_p~iF~ps|U", 6).unwrap();
        assert!((five[0].lat / six[0].lat - 10.0).abs() < 1e-9);
    }
}

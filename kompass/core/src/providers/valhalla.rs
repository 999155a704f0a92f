//! Valhalla Family Adapter
//!
//! Leg/shape wire format: the request is a JSON POST body with
//! `locations` and a `costing` model, the response carries
//! `trip.legs[0]` with distance in kilometers, duration in minutes, and
//! geometry as a precision-5 encoded polyline.

use serde::Deserialize;
use serde_json::Value;

use super::{require_line, ResolveError};
use crate::polyline;
use crate::route::{RouteRequest, RouteResponse};

#[derive(Debug, Deserialize)]
struct Envelope {
    trip: Option<WireTrip>,
}

#[derive(Debug, Deserialize)]
struct WireTrip {
    #[serde(default)]
    legs: Vec<WireLeg>,
}

#[derive(Debug, Deserialize)]
struct WireLeg {
    summary: WireSummary,
    shape: String,
}

#[derive(Debug, Deserialize)]
struct WireSummary {
    /// Leg length in kilometers.
    length: f64,
    /// Leg travel time in minutes.
    time: f64,
}

/// Build the routing request for a Valhalla-style backend.
pub(super) fn build_request(
    client: &reqwest::Client,
    base_url: &str,
    request: &RouteRequest,
) -> reqwest::RequestBuilder {
    let body = serde_json::json!({
        "locations": [
            { "lat": request.start.lat, "lon": request.start.lng },
            { "lat": request.end.lat, "lon": request.end.lng },
        ],
        "costing": request.profile.valhalla_costing(),
        "directions_options": {
            "units": "kilometers",
            "language": "de-DE",
        },
    });

    client.post(format!("{base_url}/route")).json(&body)
}

/// Map a leg/shape response body onto the canonical route.
///
/// Distance and duration are converted to meters and seconds; the shape
/// polyline is decoded into explicit coordinates.
///
/// # Errors
///
/// [`ResolveError::NoRouteFound`] when the trip has no legs;
/// [`ResolveError::MalformedResponse`] on shape mismatches, a corrupt
/// polyline, or degenerate geometry.
pub fn normalize(raw: &Value) -> Result<RouteResponse, ResolveError> {
    let envelope: Envelope = serde_json::from_value(raw.clone())
        .map_err(|e| ResolveError::MalformedResponse(e.to_string()))?;

    let leg = envelope
        .trip
        .and_then(|trip| trip.legs.into_iter().next())
        .ok_or(ResolveError::NoRouteFound)?;

    let coordinates =
        polyline::decode(&leg.shape).map_err(|e| ResolveError::MalformedResponse(e.to_string()))?;
    require_line(&coordinates)?;

    Ok(RouteResponse {
        coordinates,
        distance_meters: leg.summary.length * 1000.0,
        duration_seconds: leg.summary.time * 60.0,
        steps: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Reference polyline decoding to (38.5, -120.2), (40.7, -120.95),
    // (43.252, -126.453).
    const SHAPE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn test_normalize_converts_units() {
        let raw = json!({
            "trip": {
                "legs": [{
                    "summary": { "length": 82.5, "time": 61.0 },
                    "shape": SHAPE
                }]
            }
        });

        let route = normalize(&raw).unwrap();
        assert_eq!(route.distance_meters, 82500.0);
        assert_eq!(route.duration_seconds, 3660.0);
        assert_eq!(route.coordinates.len(), 3);
        assert!((route.coordinates[0].lat - 38.5).abs() < 1e-9);
        assert!(route.steps.is_none());
    }

    #[test]
    fn test_normalize_missing_trip_is_no_route() {
        let raw = json!({ "error": "No path could be found" });
        assert_eq!(normalize(&raw), Err(ResolveError::NoRouteFound));
    }

    #[test]
    fn test_normalize_empty_legs_is_no_route() {
        let raw = json!({ "trip": { "legs": [] } });
        assert_eq!(normalize(&raw), Err(ResolveError::NoRouteFound));
    }

    #[test]
    fn test_normalize_corrupt_shape_is_malformed() {
        let raw = json!({
            "trip": {
                "legs": [{ "summary": { "length": 1.0, "time": 1.0 }, "shape": "_" }]
            }
        });
        assert!(matches!(
            normalize(&raw),
            Err(ResolveError::MalformedResponse(_))
        ));
    }
}

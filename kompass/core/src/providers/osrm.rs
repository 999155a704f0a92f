//! OSRM Family Adapter
//!
//! Turn-by-turn wire format: coordinates travel in the URL path as
//! `lng,lat;lng,lat`, geometry comes back as an explicit GeoJSON
//! coordinate list, distance and duration are already meters/seconds,
//! and steps live under `legs[0].steps`. Used by every OSRM-compatible
//! backend, including the local daemon.

use serde::Deserialize;
use serde_json::Value;

use super::{geometry_from_pairs, require_line, ResolveError};
use crate::route::{RouteRequest, RouteResponse, RouteStep};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    geometry: WireGeometry,
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<WireLeg>,
}

#[derive(Debug, Deserialize)]
struct WireGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct WireLeg {
    #[serde(default)]
    steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
struct WireStep {
    #[serde(default)]
    maneuver: WireManeuver,
    distance: f64,
    duration: f64,
    geometry: Option<WireGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct WireManeuver {
    #[serde(default)]
    instruction: String,
}

/// Build the routing request for an OSRM-style backend.
///
/// The base URL is expected to end at the API version segment
/// (`.../route/v1`); the profile and coordinates are appended as path
/// segments, the remaining options as query parameters.
pub(super) fn build_request(
    client: &reqwest::Client,
    base_url: &str,
    request: &RouteRequest,
) -> reqwest::RequestBuilder {
    let url = format!(
        "{base_url}/{}/{},{};{},{}",
        request.profile.osrm_segment(),
        request.start.lng,
        request.start.lat,
        request.end.lng,
        request.end.lat,
    );

    client.get(url).query(&[
        ("overview", "full"),
        ("geometries", "geojson"),
        ("steps", "true"),
        ("annotations", "true"),
        ("continue_straight", "true"),
    ])
}

/// Map a turn-by-turn response body onto the canonical route.
///
/// # Errors
///
/// [`ResolveError::NoRouteFound`] when `routes` is empty;
/// [`ResolveError::MalformedResponse`] on shape mismatches or
/// degenerate geometry.
pub fn normalize(raw: &Value) -> Result<RouteResponse, ResolveError> {
    let envelope: Envelope = serde_json::from_value(raw.clone())
        .map_err(|e| ResolveError::MalformedResponse(e.to_string()))?;

    let route = envelope.routes.into_iter().next().ok_or(ResolveError::NoRouteFound)?;

    let coordinates = geometry_from_pairs(&route.geometry.coordinates);
    require_line(&coordinates)?;

    let steps = route.legs.into_iter().next().map(|leg| {
        leg.steps
            .into_iter()
            .map(|step| RouteStep {
                instruction: step.maneuver.instruction,
                distance_meters: step.distance,
                duration_seconds: step.duration,
                coordinates: step
                    .geometry
                    .map(|g| geometry_from_pairs(&g.coordinates))
                    .unwrap_or_default(),
            })
            .collect()
    });

    Ok(RouteResponse {
        coordinates,
        distance_meters: route.distance,
        duration_seconds: route.duration,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_response() {
        let raw = json!({
            "code": "Ok",
            "routes": [{
                "geometry": { "type": "LineString", "coordinates": [[9.1829, 48.7758], [9.19, 48.78], [8.4037, 49.0069]] },
                "distance": 82000.0,
                "duration": 3600.0,
                "legs": [{
                    "steps": [{
                        "maneuver": { "instruction": "Auf die A8 auffahren" },
                        "distance": 1200.0,
                        "duration": 90.0,
                        "geometry": { "coordinates": [[9.1829, 48.7758], [9.19, 48.78]] }
                    }]
                }]
            }]
        });

        let route = normalize(&raw).unwrap();
        assert_eq!(route.coordinates.len(), 3);
        assert_eq!(route.coordinates[0].lat, 48.7758);
        assert_eq!(route.coordinates[0].lng, 9.1829);
        assert_eq!(route.distance_meters, 82000.0);
        assert_eq!(route.duration_seconds, 3600.0);

        let steps = route.steps.unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].instruction, "Auf die A8 auffahren");
        assert_eq!(steps[0].coordinates.len(), 2);
    }

    #[test]
    fn test_normalize_empty_routes_is_no_route() {
        let raw = json!({ "code": "NoRoute", "routes": [] });
        assert_eq!(normalize(&raw), Err(ResolveError::NoRouteFound));
    }

    #[test]
    fn test_normalize_missing_routes_is_no_route() {
        let raw = json!({ "code": "Ok" });
        assert_eq!(normalize(&raw), Err(ResolveError::NoRouteFound));
    }

    #[test]
    fn test_normalize_degenerate_geometry_is_malformed() {
        let raw = json!({
            "routes": [{
                "geometry": { "coordinates": [[9.1829, 48.7758]] },
                "distance": 0.0,
                "duration": 0.0
            }]
        });
        assert!(matches!(
            normalize(&raw),
            Err(ResolveError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_normalize_wrong_shape_is_malformed() {
        let raw = json!({ "routes": [{ "geometry": "not an object", "distance": 1.0, "duration": 1.0 }] });
        assert!(matches!(
            normalize(&raw),
            Err(ResolveError::MalformedResponse(_))
        ));
    }
}

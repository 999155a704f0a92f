//! GraphHopper Family Adapter
//!
//! Points-array wire format: coordinates travel as repeated `point`
//! query parameters, the response carries `paths[0]` with an explicit
//! coordinate array (when `points_encoded=false`) and travel time in
//! milliseconds.

use serde::Deserialize;
use serde_json::Value;

use super::{geometry_from_pairs, require_line, ResolveError};
use crate::route::{RouteRequest, RouteResponse};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    paths: Vec<WirePath>,
}

#[derive(Debug, Deserialize)]
struct WirePath {
    points: WirePoints,
    distance: f64,
    /// Travel time in milliseconds.
    time: f64,
}

#[derive(Debug, Deserialize)]
struct WirePoints {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

/// Build the routing request for a GraphHopper-style backend.
pub(super) fn build_request(
    client: &reqwest::Client,
    base_url: &str,
    request: &RouteRequest,
) -> reqwest::RequestBuilder {
    let start = format!("{},{}", request.start.lat, request.start.lng);
    let end = format!("{},{}", request.end.lat, request.end.lng);

    client.get(format!("{base_url}/route")).query(&[
        ("point", start.as_str()),
        ("point", end.as_str()),
        ("vehicle", request.profile.graphhopper_vehicle()),
        ("locale", "de"),
        ("instructions", "true"),
        ("calc_points", "true"),
        ("points_encoded", "false"),
    ])
}

/// Map a points-array response body onto the canonical route.
///
/// # Errors
///
/// [`ResolveError::NoRouteFound`] when `paths` is empty;
/// [`ResolveError::MalformedResponse`] on shape mismatches or
/// degenerate geometry.
pub fn normalize(raw: &Value) -> Result<RouteResponse, ResolveError> {
    let envelope: Envelope = serde_json::from_value(raw.clone())
        .map_err(|e| ResolveError::MalformedResponse(e.to_string()))?;

    let path = envelope.paths.into_iter().next().ok_or(ResolveError::NoRouteFound)?;

    let coordinates = geometry_from_pairs(&path.points.coordinates);
    require_line(&coordinates)?;

    Ok(RouteResponse {
        coordinates,
        distance_meters: path.distance,
        duration_seconds: path.time / 1000.0,
        steps: None,
    })
}

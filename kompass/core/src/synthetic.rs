//! Synthetic Fallback Route Generation
//!
//! When every real backend has failed, the resolver still has to hand
//! the caller something drawable. A raw great-circle segment through
//! buildings reads as obviously wrong to an operator planning a drive,
//! so the estimate is shaped: road distance is approximated by a fixed
//! distortion factor over the great-circle distance, travel time comes
//! from a per-profile average speed, and the geometry is interpolated
//! with a small sinusoidal lateral deviation so the rendered path is
//! visibly a curve rather than a ruler-line.

use crate::geo::{haversine_km, lerp};
use crate::route::{Coordinate, Profile, RouteResponse};

/// Ratio of typical road distance to great-circle distance.
const ROAD_DISTORTION: f64 = 1.3;

/// Lateral deviation amplitude in degrees applied to the interpolated
/// waypoints.
const LATERAL_DEVIATION_DEG: f64 = 0.001;

/// Target spacing of synthetic waypoints in kilometers.
const WAYPOINT_SPACING_KM: f64 = 2.0;

/// Generate an estimated, non-authoritative route between two points.
///
/// The result satisfies the canonical invariants: at least 3 geometry
/// points, non-negative distance and duration.
#[must_use]
pub fn synthetic_route(start: Coordinate, end: Coordinate, profile: Profile) -> RouteResponse {
    let direct_km = haversine_km(start, end);
    let road_km = direct_km * ROAD_DISTORTION;

    let duration_seconds = road_km / profile.average_speed_kmh() * 3600.0;

    RouteResponse {
        coordinates: curved_waypoints(start, end, road_km),
        distance_meters: road_km * 1000.0,
        duration_seconds,
        steps: None,
    }
}

/// Interpolate waypoints between `start` and `end` with a sinusoidal
/// deviation peaking mid-route.
fn curved_waypoints(start: Coordinate, end: Coordinate, road_km: f64) -> Vec<Coordinate> {
    let segments = ((road_km / WAYPOINT_SPACING_KM) as usize).max(3);
    let mut points = Vec::with_capacity(segments + 1);

    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let base = lerp(start, end, t);
        let deviation = (t * std::f64::consts::PI).sin() * LATERAL_DEVIATION_DEG;
        points.push(Coordinate {
            lat: base.lat + deviation,
            lng: base.lng + deviation,
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stuttgart() -> Coordinate {
        Coordinate::new(48.7758, 9.1829)
    }

    fn karlsruhe() -> Coordinate {
        Coordinate::new(49.0069, 8.4037)
    }

    #[test]
    fn test_distance_is_distorted_haversine() {
        let route = synthetic_route(stuttgart(), karlsruhe(), Profile::Driving);
        let expected = haversine_km(stuttgart(), karlsruhe()) * ROAD_DISTORTION * 1000.0;
        assert!(
            (route.distance_meters - expected).abs() / expected < 0.01,
            "expected ~{expected}, got {}",
            route.distance_meters
        );
    }

    #[test]
    fn test_duration_matches_profile_speed() {
        let route = synthetic_route(stuttgart(), karlsruhe(), Profile::Driving);
        let expected = route.distance_meters / 1000.0 / 50.0 * 3600.0;
        assert!((route.duration_seconds - expected).abs() < 1.0);

        let walking = synthetic_route(stuttgart(), karlsruhe(), Profile::Walking);
        let expected_walk = walking.distance_meters / 1000.0 / 30.0 * 3600.0;
        assert!((walking.duration_seconds - expected_walk).abs() < 1.0);
    }

    #[test]
    fn test_geometry_starts_and_ends_near_endpoints() {
        let route = synthetic_route(stuttgart(), karlsruhe(), Profile::Driving);
        let first = route.coordinates.first().unwrap();
        let last = route.coordinates.last().unwrap();

        // sin(0) = sin(pi) = 0, so the endpoints carry no deviation.
        assert!((first.lat - stuttgart().lat).abs() < 1e-9);
        assert!((first.lng - stuttgart().lng).abs() < 1e-9);
        assert!((last.lat - karlsruhe().lat).abs() < 1e-9);
        assert!((last.lng - karlsruhe().lng).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_is_not_a_straight_line() {
        let route = synthetic_route(stuttgart(), karlsruhe(), Profile::Driving);
        assert!(route.coordinates.len() >= 3);

        let mid_index = route.coordinates.len() / 2;
        let mid = route.coordinates[mid_index];
        let straight = lerp(stuttgart(), karlsruhe(), mid_index as f64 / (route.coordinates.len() - 1) as f64);
        assert!(
            (mid.lat - straight.lat).abs() > 1e-5,
            "midpoint should deviate from the straight line"
        );
    }

    #[test]
    fn test_short_hop_still_has_minimum_points() {
        // Two points ~100m apart; the segment floor keeps the curve shape.
        let a = Coordinate::new(48.7758, 9.1829);
        let b = Coordinate::new(48.7766, 9.1835);
        let route = synthetic_route(a, b, Profile::Walking);
        assert!(route.coordinates.len() >= 4);
        assert!(route.distance_meters > 0.0);
    }
}

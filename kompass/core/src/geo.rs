//! Geometry Utilities
//!
//! Great-circle math shared by the synthetic generator and distance
//! assertions. Pure functions, no I/O.

use crate::route::Coordinate;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers
/// (Haversine formula).
#[must_use]
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Linear interpolation between two coordinates at fraction `t` in [0, 1].
#[must_use]
pub fn lerp(from: Coordinate, to: Coordinate, t: f64) -> Coordinate {
    Coordinate {
        lat: from.lat + (to.lat - from.lat) * t,
        lng: from.lng + (to.lng - from.lng) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = Coordinate::new(48.7758, 9.1829);
        assert!(haversine_km(p, p) < 0.001);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Stuttgart center to Karlsruhe, roughly 62-63 km great-circle.
        let stuttgart = Coordinate::new(48.7758, 9.1829);
        let karlsruhe = Coordinate::new(49.0069, 8.4037);
        let km = haversine_km(stuttgart, karlsruhe);
        assert!(km > 55.0 && km < 70.0, "expected ~62km, got {km}");
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(48.7758, 9.1829);
        let b = Coordinate::new(49.0069, 8.4037);
        let d1 = haversine_km(a, b);
        let d2 = haversine_km(b, a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Coordinate::new(48.0, 9.0);
        let b = Coordinate::new(49.0, 8.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        let mid = lerp(a, b, 0.5);
        assert!((mid.lat - 48.5).abs() < 1e-12);
        assert!((mid.lng - 8.5).abs() < 1e-12);
    }
}

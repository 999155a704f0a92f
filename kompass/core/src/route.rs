//! Route Model Types
//!
//! Canonical value types shared by every component of the resolver:
//! coordinates, travel profiles, requests and the normalized responses
//! that all provider wire formats are mapped onto.
//!
//! All types here are plain values. They are cloned across task
//! boundaries and serialized for UI consumers; nothing in this module
//! holds a lock or a connection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 coordinate pair.
///
/// No validity range is enforced beyond float bounds; callers are
/// responsible for sensible latitude/longitude values. Non-finite values
/// are rejected at [`RouteRequest`] construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Travel profile affecting routing cost function and speed assumptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Standard car routing.
    #[default]
    Driving,
    /// Pedestrian routing.
    Walking,
    /// Bicycle routing.
    Cycling,
    /// Police duty vehicle routing.
    Police,
}

impl Profile {
    /// Canonical lowercase name, used in cache keys and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
            Self::Police => "police",
        }
    }

    /// Profile segment for OSRM-style URL paths.
    #[must_use]
    pub fn osrm_segment(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
            Self::Police => "emergency",
        }
    }

    /// Costing model name for Valhalla request bodies.
    #[must_use]
    pub fn valhalla_costing(&self) -> &'static str {
        match self {
            Self::Driving | Self::Police => "auto",
            Self::Walking => "pedestrian",
            Self::Cycling => "bicycle",
        }
    }

    /// Vehicle name for GraphHopper query parameters.
    #[must_use]
    pub fn graphhopper_vehicle(&self) -> &'static str {
        match self {
            Self::Driving | Self::Police => "car",
            Self::Walking => "foot",
            Self::Cycling => "bike",
        }
    }

    /// Average speed assumption in km/h for synthetic estimates.
    #[must_use]
    pub fn average_speed_kmh(&self) -> f64 {
        match self {
            Self::Driving => 50.0,
            _ => 30.0,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request with non-finite start or end coordinates.
///
/// This is a precondition violation by the caller, not a runtime fault;
/// it is rejected before any provider is contacted.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("non-finite coordinate in route request: start={start:?}, end={end:?}")]
pub struct InvalidCoordinates {
    /// The offending start coordinate.
    pub start: Coordinate,
    /// The offending end coordinate.
    pub end: Coordinate,
}

/// A single route resolution request.
///
/// Immutable once constructed; the constructor is the only place
/// coordinate finiteness is checked, so every `RouteRequest` in the
/// system is known-valid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Route origin.
    pub start: Coordinate,
    /// Route destination.
    pub end: Coordinate,
    /// Travel profile.
    pub profile: Profile,
}

impl RouteRequest {
    /// Create a validated request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinates`] if any component of `start` or
    /// `end` is NaN or infinite.
    pub fn new(start: Coordinate, end: Coordinate, profile: Profile) -> Result<Self, InvalidCoordinates> {
        if !start.is_finite() || !end.is_finite() {
            return Err(InvalidCoordinates { start, end });
        }
        Ok(Self { start, end, profile })
    }
}

/// A single maneuver along a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Human-readable instruction for this maneuver.
    pub instruction: String,
    /// Step length in meters.
    pub distance_meters: f64,
    /// Step travel time in seconds.
    pub duration_seconds: f64,
    /// Geometry of this step.
    pub coordinates: Vec<Coordinate>,
}

/// Canonical normalized route, independent of the backend that produced it.
///
/// Invariants (enforced by the normalizers and the synthetic generator):
/// `coordinates` has at least 2 points, `distance_meters >= 0`,
/// `duration_seconds >= 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Path geometry from start to end, inclusive.
    pub coordinates: Vec<Coordinate>,
    /// Total route length in meters.
    pub distance_meters: f64,
    /// Total travel time in seconds.
    pub duration_seconds: f64,
    /// Turn-by-turn steps, when the backend supplies them.
    pub steps: Option<Vec<RouteStep>>,
}

/// A normalized route plus the name of the backend that produced it.
///
/// `provider` is the descriptor name of the winning backend, `"Cached"`
/// for a cache hit, or `"Fallback"` for a synthetic estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    /// Which backend produced this route.
    pub provider: String,
    /// The normalized route.
    pub route: RouteResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_non_finite() {
        let good = Coordinate::new(48.7758, 9.1829);
        let nan = Coordinate::new(f64::NAN, 9.0);
        let inf = Coordinate::new(48.0, f64::INFINITY);

        assert!(RouteRequest::new(good, good, Profile::Driving).is_ok());
        assert!(RouteRequest::new(nan, good, Profile::Driving).is_err());
        assert!(RouteRequest::new(good, inf, Profile::Walking).is_err());
    }

    #[test]
    fn test_profile_backend_names() {
        assert_eq!(Profile::Driving.osrm_segment(), "driving");
        assert_eq!(Profile::Police.osrm_segment(), "emergency");
        assert_eq!(Profile::Walking.valhalla_costing(), "pedestrian");
        assert_eq!(Profile::Police.valhalla_costing(), "auto");
        assert_eq!(Profile::Cycling.graphhopper_vehicle(), "bike");
    }

    #[test]
    fn test_profile_speed_assumptions() {
        assert_eq!(Profile::Driving.average_speed_kmh(), 50.0);
        assert_eq!(Profile::Walking.average_speed_kmh(), 30.0);
        assert_eq!(Profile::Police.average_speed_kmh(), 30.0);
    }

    #[test]
    fn test_profile_serde_lowercase() {
        let json = serde_json::to_string(&Profile::Cycling).unwrap();
        assert_eq!(json, "\"cycling\"");
        let back: Profile = serde_json::from_str("\"police\"").unwrap();
        assert_eq!(back, Profile::Police);
    }
}

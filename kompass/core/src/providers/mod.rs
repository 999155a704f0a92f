//! Provider Registry and Backend Adapters
//!
//! Abstraction over the independent, non-cooperating routing backends.
//! Each backend is described by a [`ProviderDescriptor`] (static
//! configuration), speaks one of three wire formats ([`WireFormat`]),
//! and is driven through the [`RouteProvider`] trait so the fallback
//! executor never touches HTTP directly.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  RouteResolver   |  <-- fallback executor (resolver module)
//! +--------+---------+
//!          |
//!          v
//! +------------------+
//! | ProviderRegistry |  <-- offline slot + online list, priority order
//! +--------+---------+
//!          |
//!    +-----+----------+----------+
//!    v                v          v
//! +--------+   +----------+ +-------------+
//! | OSRM   |   | Valhalla | | GraphHopper |   <-- HttpProvider per
//! | family |   | family   | | family      |       wire format
//! +--------+   +----------+ +-------------+
//! ```
//!
//! Normalization (wire JSON -> canonical `RouteResponse`) lives in the
//! per-family submodules as pure functions; adapters here only do
//! transport and dispatch.

pub mod graphhopper;
pub mod osrm;
pub mod valhalla;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ResolverConfig;
use crate::route::{Coordinate, RouteRequest, RouteResponse};

/// Provider name used for the local routing daemon.
pub const OFFLINE_PROVIDER_NAME: &str = "Offline-OSRM";

/// Convert GeoJSON-ordered `[lng, lat]` pairs into coordinates.
pub(crate) fn geometry_from_pairs(pairs: &[[f64; 2]]) -> Vec<Coordinate> {
    pairs
        .iter()
        .map(|&[lng, lat]| Coordinate { lat, lng })
        .collect()
}

/// A route geometry needs at least a start and an end point; anything
/// shorter is a backend bug surfaced as a malformed response.
pub(crate) fn require_line(coordinates: &[Coordinate]) -> Result<(), ResolveError> {
    if coordinates.len() < 2 {
        return Err(ResolveError::MalformedResponse(format!(
            "geometry has {} point(s), need at least 2",
            coordinates.len()
        )));
    }
    Ok(())
}

/// Errors a single provider attempt can produce.
///
/// All variants are caught at the fallback executor boundary and
/// advance the fallback chain; none propagate to callers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The backend responded successfully but produced zero usable routes.
    #[error("backend returned no usable route")]
    NoRouteFound,

    /// Network failure, timeout, or non-2xx status.
    #[error("provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// The response body did not match the backend's wire format.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Static description of a routing backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique backend name; also selects the wire format.
    pub name: String,
    /// Base URL of the backend's routing API.
    pub base_url: String,
    /// Attempt order among online providers; lower is tried first.
    pub priority: u32,
}

impl ProviderDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            priority,
        }
    }
}

/// The three backend response families this resolver understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    /// Turn-by-turn JSON with explicit GeoJSON geometry (OSRM family).
    TurnByTurn,
    /// Trip legs with an encoded polyline shape (Valhalla family).
    LegShape,
    /// Paths with an explicit points array (GraphHopper family).
    PointsArray,
}

impl WireFormat {
    /// Infer the wire format from a descriptor name.
    ///
    /// Returns `None` for names no adapter exists for; the registry
    /// skips those with a warning rather than failing startup.
    #[must_use]
    pub fn infer(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.contains("osrm") {
            Some(Self::TurnByTurn)
        } else if lower.contains("valhalla") {
            Some(Self::LegShape)
        } else if lower.contains("graphhopper") {
            Some(Self::PointsArray)
        } else {
            None
        }
    }

    /// Per-request timeout for online backends of this family.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        match self {
            Self::TurnByTurn => Duration::from_secs(12),
            Self::LegShape => Duration::from_secs(15),
            Self::PointsArray => Duration::from_secs(10),
        }
    }

    /// Map a raw response body onto the canonical route.
    pub fn normalize(&self, raw: &serde_json::Value) -> Result<RouteResponse, ResolveError> {
        match self {
            Self::TurnByTurn => osrm::normalize(raw),
            Self::LegShape => valhalla::normalize(raw),
            Self::PointsArray => graphhopper::normalize(raw),
        }
    }
}

/// A backend capable of computing a route between two points.
///
/// Implemented by the HTTP adapters here and by scripted mocks in the
/// integration tests; the fallback executor only sees this trait.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Static description of this backend.
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Compute a route. Timeouts are enforced inside the implementation;
    /// expiry surfaces as [`ResolveError::ProviderUnreachable`].
    async fn fetch(&self, request: &RouteRequest) -> Result<RouteResponse, ResolveError>;
}

/// HTTP adapter speaking one wire format against one base URL.
pub struct HttpProvider {
    descriptor: ProviderDescriptor,
    format: WireFormat,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Create an adapter for an online backend, with the family's
    /// default request timeout.
    #[must_use]
    pub fn new(descriptor: ProviderDescriptor, format: WireFormat, user_agent: &str) -> Self {
        Self::with_timeout(descriptor, format, format.request_timeout(), user_agent)
    }

    /// Create an adapter with an explicit per-request timeout.
    #[must_use]
    pub fn with_timeout(
        descriptor: ProviderDescriptor,
        format: WireFormat,
        timeout: Duration,
        user_agent: &str,
    ) -> Self {
        Self {
            descriptor,
            format,
            timeout,
            client: reqwest::Client::builder()
                .user_agent(user_agent.to_string())
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Adapter for the local routing daemon: OSRM wire format with a
    /// tighter timeout, since localhost either answers fast or not at all.
    ///
    /// `base_url` is the daemon root (e.g. `http://localhost:5000`); the
    /// OSRM API segment is appended here.
    #[must_use]
    pub fn offline(base_url: impl Into<String>, user_agent: &str) -> Self {
        let base_url: String = base_url.into();
        Self::with_timeout(
            ProviderDescriptor::new(OFFLINE_PROVIDER_NAME, format!("{base_url}/route/v1"), 0),
            WireFormat::TurnByTurn,
            Duration::from_secs(8),
            user_agent,
        )
    }
}

#[async_trait]
impl RouteProvider for HttpProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn fetch(&self, request: &RouteRequest) -> Result<RouteResponse, ResolveError> {
        let builder = match self.format {
            WireFormat::TurnByTurn => osrm::build_request(&self.client, &self.descriptor.base_url, request),
            WireFormat::LegShape => valhalla::build_request(&self.client, &self.descriptor.base_url, request),
            WireFormat::PointsArray => {
                graphhopper::build_request(&self.client, &self.descriptor.base_url, request)
            }
        };

        let response = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ResolveError::ProviderUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::ProviderUnreachable(format!("HTTP {status}")));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ResolveError::MalformedResponse(e.to_string()))?;

        self.format.normalize(&raw)
    }
}

/// Ordered collection of backends: an optional offline slot plus the
/// online providers in ascending priority.
pub struct ProviderRegistry {
    offline: Option<Arc<dyn RouteProvider>>,
    online: Vec<Arc<dyn RouteProvider>>,
}

impl ProviderRegistry {
    /// Assemble a registry from explicit providers. The online list is
    /// sorted by ascending descriptor priority.
    #[must_use]
    pub fn new(offline: Option<Arc<dyn RouteProvider>>, mut online: Vec<Arc<dyn RouteProvider>>) -> Self {
        online.sort_by_key(|p| p.descriptor().priority);
        Self { offline, online }
    }

    /// Build the HTTP registry described by a [`ResolverConfig`].
    ///
    /// Descriptors whose name matches no known wire format are skipped
    /// with a warning; a typo in the config should not take the whole
    /// resolver down.
    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        let offline: Arc<dyn RouteProvider> =
            Arc::new(HttpProvider::offline(config.offline_base_url.clone(), &config.user_agent));

        let online = config
            .providers
            .iter()
            .filter_map(|descriptor| match WireFormat::infer(&descriptor.name) {
                Some(format) => {
                    let provider: Arc<dyn RouteProvider> =
                        Arc::new(HttpProvider::new(descriptor.clone(), format, &config.user_agent));
                    Some(provider)
                }
                None => {
                    tracing::warn!(name = %descriptor.name, "No adapter for provider, skipping");
                    None
                }
            })
            .collect();

        Self::new(Some(offline), online)
    }

    /// The local backend, if one is configured.
    #[must_use]
    pub fn offline(&self) -> Option<&Arc<dyn RouteProvider>> {
        self.offline.as_ref()
    }

    /// Online backends in attempt order.
    #[must_use]
    pub fn online(&self) -> &[Arc<dyn RouteProvider>] {
        &self.online
    }
}

//! Kompass Core - Multi-Provider Route Resolution
//!
//! This crate turns a pair of geographic coordinates (plus a travel
//! profile) into a drivable path, distance and duration by querying one
//! of several independent, non-cooperating routing backends. It keeps
//! working when any subset of those backends is slow, unreachable, or
//! returns malformed data, and it avoids re-querying backends for
//! repeat requests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       BatchResolver                          │
//! │        one origin, N destinations, chunked concurrency       │
//! └───────────────────────────┬──────────────────────────────────┘
//!                             │ per destination
//! ┌───────────────────────────┼──────────────────────────────────┐
//! │                     RouteResolver                            │
//! │  ┌──────────┐  ┌──────────────┐  ┌─────────┐  ┌───────────┐  │
//! │  │  Cache   │  │ OfflineProbe │  │ Metrics │  │ Synthetic │  │
//! │  └──────────┘  └──────────────┘  └─────────┘  └───────────┘  │
//! │                 ┌──────────────────┐                         │
//! │                 │ ProviderRegistry │                         │
//! │                 └──┬──────┬─────┬──┘                         │
//! └────────────────────┼──────┼─────┼────────────────────────────┘
//!                      v      v     v
//!                   OSRM  Valhalla  GraphHopper
//!                   family family   family
//! ```
//!
//! # Design Principles
//!
//! 1. **Totality**: `resolve` always returns a route, degrading to a
//!    synthetic estimate rather than erroring — the consuming UI must
//!    always be able to draw something.
//! 2. **Offline first**: when the local daemon is reachable it wins,
//!    regardless of online priorities.
//! 3. **Isolation**: one bad destination cannot fail a batch; one bad
//!    backend cannot fail a resolution.
//! 4. **Observability**: every attempt lands in the metric ring buffer.
//!
//! # Quick Start
//!
//! ```ignore
//! use kompass_core::{BatchResolver, Coordinate, Profile, ResolverConfig, RouteResolver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = kompass_core::load_config().unwrap_or_default();
//!     let batch_size = config.batch_size;
//!     let resolver = Arc::new(RouteResolver::new(config));
//!     resolver.startup_probe().await;
//!
//!     let route = resolver
//!         .resolve_route(
//!             Coordinate::new(48.7758, 9.1829),
//!             Coordinate::new(49.0069, 8.4037),
//!             Profile::Driving,
//!         )
//!         .await
//!         .unwrap();
//!     println!("{} via {}", route.route.distance_meters, route.provider);
//!
//!     let batch = BatchResolver::new(resolver, batch_size);
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`route`]: canonical value types (coordinates, profiles, routes)
//! - [`geo`]: great-circle math
//! - [`polyline`]: encoded polyline decoding
//! - [`providers`]: backend registry, wire formats and HTTP adapters
//! - [`probe`]: offline daemon reachability
//! - [`cache`]: bounded TTL route cache
//! - [`metrics`]: attempt outcome ring buffer
//! - [`synthetic`]: estimated fallback route generation
//! - [`resolver`]: the fallback executor
//! - [`batch`]: chunked batch resolution
//! - [`config`]: TOML/env configuration loading

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod cache;
pub mod config;
pub mod geo;
pub mod metrics;
pub mod polyline;
pub mod probe;
pub mod providers;
pub mod resolver;
pub mod route;
pub mod synthetic;

// Re-exports for convenience
pub use batch::BatchResolver;
pub use cache::{cache_key, RouteCache};
pub use config::{default_config_path, load_config, load_config_from_path, ConfigError, ResolverConfig};
pub use metrics::{CacheStats, MetricRecord, MetricsCollector};
pub use probe::OfflineProbe;
pub use providers::{
    HttpProvider, ProviderDescriptor, ProviderRegistry, ResolveError, RouteProvider, WireFormat,
};
pub use resolver::RouteResolver;
pub use route::{
    Coordinate, InvalidCoordinates, Profile, ResolvedRoute, RouteRequest, RouteResponse, RouteStep,
};
pub use synthetic::synthetic_route;

//! Fallback Executor
//!
//! Drives a single route resolution through the fallback chain until
//! something produces a drawable route. The progression is an explicit
//! state machine:
//!
//! ```text
//! CacheCheck --hit--------------------------------> Done ("Cached")
//!     | miss
//!     v
//! TryOffline --success----------------------------> Done (daemon name)
//!     | skipped (prober says unavailable) / failed
//!     v
//! TryOnline(0) -> TryOnline(1) -> ... --success---> Done (provider name)
//!     | list exhausted
//!     v
//! Synthesize --------------------------------------> Done ("Fallback")
//! ```
//!
//! The executor has **no failure exit**: it degrades to a synthetic
//! estimate rather than propagating an error, because the consuming UI
//! must always be able to draw something. Every terminal transition
//! writes the cache (unless it was itself a cache hit) and appends a
//! metric record; every failed attempt appends one too.
//!
//! The transition function is pure and unit-tested without any network
//! mocking; only the driver in [`RouteResolver::resolve`] touches
//! providers.

use std::sync::Arc;
use std::time::Instant;

use crate::cache::{cache_key, RouteCache};
use crate::config::ResolverConfig;
use crate::metrics::{
    CacheStats, MetricRecord, MetricsCollector, PROVIDER_CACHED, PROVIDER_FALLBACK,
};
use crate::probe::OfflineProbe;
use crate::providers::{ProviderRegistry, RouteProvider};
use crate::route::{Coordinate, InvalidCoordinates, Profile, ResolvedRoute, RouteRequest, RouteResponse};
use crate::synthetic::synthetic_route;

/// One state of the fallback progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    /// Look for a cached route first.
    CacheCheck,
    /// Attempt the local daemon, if the prober reported it reachable.
    TryOffline,
    /// Attempt the online provider at this index of the ordered list.
    TryOnline(usize),
    /// Generate a synthetic estimate. Terminal; always succeeds.
    Synthesize,
}

/// Non-terminal outcome of executing a stage. Successful outcomes
/// terminate directly in the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StageOutcome {
    /// The cache had no usable entry.
    CacheMiss,
    /// The offline daemon is not configured or not reachable.
    OfflineSkipped,
    /// A provider attempt failed (network, timeout, bad payload).
    AttemptFailed,
}

impl Stage {
    /// Pure transition function over non-terminal outcomes.
    pub(crate) fn advance(self, outcome: StageOutcome, online_count: usize) -> Self {
        match (self, outcome) {
            (Self::CacheCheck, _) => Self::TryOffline,
            (Self::TryOffline, _) => {
                if online_count == 0 {
                    Self::Synthesize
                } else {
                    Self::TryOnline(0)
                }
            }
            (Self::TryOnline(i), _) => {
                if i + 1 < online_count {
                    Self::TryOnline(i + 1)
                } else {
                    Self::Synthesize
                }
            }
            // Terminal; the driver never advances past it.
            (Self::Synthesize, _) => Self::Synthesize,
        }
    }
}

/// Route resolution engine: provider registry, offline prober, cache
/// and metrics behind one total `resolve` entry point.
///
/// Construct one per process and share it (`Arc`) with the batch
/// resolver; the cache and metrics are owned here, not global.
pub struct RouteResolver {
    registry: ProviderRegistry,
    probe: OfflineProbe,
    cache: RouteCache,
    metrics: MetricsCollector,
}

impl RouteResolver {
    /// Build a resolver with HTTP adapters for the configured backends.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        let registry = ProviderRegistry::from_config(&config);
        Self::with_registry(registry, config)
    }

    /// Build a resolver around an explicit registry. This is the
    /// injection seam the integration tests use to script providers.
    #[must_use]
    pub fn with_registry(registry: ProviderRegistry, config: ResolverConfig) -> Self {
        Self {
            registry,
            probe: OfflineProbe::new(
                config.offline_base_url.clone(),
                config.probe_timeout,
                &config.user_agent,
            ),
            cache: RouteCache::new(config.cache_capacity, config.cache_ttl),
            metrics: MetricsCollector::new(config.metrics_capacity),
        }
    }

    /// Probe the local daemon and cache the result for subsequent
    /// resolutions. Callers decide the re-probe cadence; typically once
    /// at startup.
    pub async fn startup_probe(&self) -> bool {
        self.probe.probe().await
    }

    /// Access the offline prober (state inspection and manual override).
    #[must_use]
    pub fn offline_probe(&self) -> &OfflineProbe {
        &self.probe
    }

    /// Resolve a single route. Total: always returns a route, degrading
    /// to a synthetic estimate when every backend fails.
    pub async fn resolve(&self, request: &RouteRequest) -> ResolvedRoute {
        let key = cache_key(request.start, request.end, request.profile);
        let online = self.registry.online();
        let mut stage = Stage::CacheCheck;

        loop {
            let outcome = match stage {
                Stage::CacheCheck => {
                    if let Some(route) = self.cache.get(&key) {
                        tracing::debug!(key = %key, "Route served from cache");
                        self.metrics.record_success(PROVIDER_CACHED, 0.0);
                        return ResolvedRoute {
                            provider: PROVIDER_CACHED.to_string(),
                            route,
                        };
                    }
                    StageOutcome::CacheMiss
                }
                Stage::TryOffline => match self.registry.offline() {
                    Some(provider) if self.probe.is_available() => {
                        match self.attempt(provider, request).await {
                            Some(route) => return self.complete(&key, provider, route),
                            None => StageOutcome::AttemptFailed,
                        }
                    }
                    _ => StageOutcome::OfflineSkipped,
                },
                Stage::TryOnline(index) => match online.get(index) {
                    Some(provider) => match self.attempt(provider, request).await {
                        Some(route) => return self.complete(&key, provider, route),
                        None => StageOutcome::AttemptFailed,
                    },
                    None => StageOutcome::AttemptFailed,
                },
                Stage::Synthesize => {
                    tracing::debug!(
                        profile = %request.profile,
                        "All providers failed, synthesizing estimate"
                    );
                    let started = Instant::now();
                    let route = synthetic_route(request.start, request.end, request.profile);
                    self.metrics
                        .record_success(PROVIDER_FALLBACK, elapsed_ms(started));
                    self.cache.put(key, route.clone());
                    return ResolvedRoute {
                        provider: PROVIDER_FALLBACK.to_string(),
                        route,
                    };
                }
            };

            stage = stage.advance(outcome, online.len());
        }
    }

    /// Validate raw inputs and resolve. The only error is a
    /// precondition violation (non-finite coordinates), rejected before
    /// any provider is contacted.
    pub async fn resolve_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: Profile,
    ) -> Result<ResolvedRoute, InvalidCoordinates> {
        let request = RouteRequest::new(start, end, profile)?;
        Ok(self.resolve(&request).await)
    }

    /// Run one timed provider attempt, recording the metric either way.
    async fn attempt(
        &self,
        provider: &Arc<dyn RouteProvider>,
        request: &RouteRequest,
    ) -> Option<RouteResponse> {
        let name = provider.descriptor().name.clone();
        let started = Instant::now();

        match provider.fetch(request).await {
            Ok(route) => {
                let latency_ms = elapsed_ms(started);
                tracing::debug!(provider = %name, latency_ms, "Provider produced a route");
                self.metrics.record_success(name, latency_ms);
                Some(route)
            }
            Err(err) => {
                let latency_ms = elapsed_ms(started);
                tracing::warn!(provider = %name, error = %err, latency_ms, "Provider attempt failed");
                self.metrics.record_failure(name, latency_ms, err.to_string());
                None
            }
        }
    }

    /// Terminal bookkeeping for a successful provider attempt.
    fn complete(&self, key: &str, provider: &Arc<dyn RouteProvider>, route: RouteResponse) -> ResolvedRoute {
        self.cache.put(key.to_string(), route.clone());
        ResolvedRoute {
            provider: provider.descriptor().name.clone(),
            route,
        }
    }

    /// Snapshot of the recorded attempt metrics (last ≤ capacity).
    #[must_use]
    pub fn metrics(&self) -> Vec<MetricRecord> {
        self.metrics.snapshot()
    }

    /// Cache observability summary.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.len(),
            hit_rate_percent: self.metrics.hit_rate_percent(),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_miss_goes_offline_first() {
        let next = Stage::CacheCheck.advance(StageOutcome::CacheMiss, 3);
        assert_eq!(next, Stage::TryOffline);
    }

    #[test]
    fn test_offline_skip_and_failure_converge() {
        let skipped = Stage::TryOffline.advance(StageOutcome::OfflineSkipped, 3);
        let failed = Stage::TryOffline.advance(StageOutcome::AttemptFailed, 3);
        assert_eq!(skipped, Stage::TryOnline(0));
        assert_eq!(failed, Stage::TryOnline(0));
    }

    #[test]
    fn test_online_failures_walk_the_list() {
        assert_eq!(
            Stage::TryOnline(0).advance(StageOutcome::AttemptFailed, 3),
            Stage::TryOnline(1)
        );
        assert_eq!(
            Stage::TryOnline(1).advance(StageOutcome::AttemptFailed, 3),
            Stage::TryOnline(2)
        );
        assert_eq!(
            Stage::TryOnline(2).advance(StageOutcome::AttemptFailed, 3),
            Stage::Synthesize
        );
    }

    #[test]
    fn test_no_online_providers_synthesizes_directly() {
        assert_eq!(
            Stage::TryOffline.advance(StageOutcome::OfflineSkipped, 0),
            Stage::Synthesize
        );
    }

    #[test]
    fn test_synthesize_is_terminal() {
        assert_eq!(
            Stage::Synthesize.advance(StageOutcome::AttemptFailed, 3),
            Stage::Synthesize
        );
    }
}

//! Batch Resolution
//!
//! Resolves many destinations for one origin. Destinations are
//! processed in fixed-size concurrency chunks rather than full parallel
//! fan-out, to bound outbound connection pressure on possibly-struggling
//! backends.
//!
//! Isolation: each destination runs in its own spawned task. Provider
//! failures are already absorbed inside the resolver; if a task dies
//! for structural reasons (a panic surfacing as a `JoinError`), that
//! destination independently falls back to the synthetic generator and
//! the rest of the batch is unaffected.

use std::sync::Arc;

use futures::future::join_all;

use crate::metrics::PROVIDER_FALLBACK;
use crate::resolver::RouteResolver;
use crate::route::{Coordinate, InvalidCoordinates, Profile, ResolvedRoute, RouteRequest};
use crate::synthetic::synthetic_route;

/// Chunked concurrent batch resolution over a shared [`RouteResolver`].
pub struct BatchResolver {
    resolver: Arc<RouteResolver>,
    batch_size: usize,
}

impl BatchResolver {
    /// Create a batch resolver processing `batch_size` destinations
    /// concurrently per chunk (clamped to at least 1).
    #[must_use]
    pub fn new(resolver: Arc<RouteResolver>, batch_size: usize) -> Self {
        Self {
            resolver,
            batch_size: batch_size.max(1),
        }
    }

    /// Resolve one route per destination, sorted ascending by distance.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinates`] if the origin or any destination
    /// contains a non-finite component; this is checked before any task
    /// is spawned or provider contacted.
    pub async fn resolve_batch(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: Profile,
    ) -> Result<Vec<ResolvedRoute>, InvalidCoordinates> {
        let requests: Vec<RouteRequest> = destinations
            .iter()
            .map(|&dest| RouteRequest::new(origin, dest, profile))
            .collect::<Result<_, _>>()?;

        let mut results = Vec::with_capacity(requests.len());

        for chunk in requests.chunks(self.batch_size) {
            let handles: Vec<_> = chunk
                .iter()
                .map(|&request| {
                    let resolver = Arc::clone(&self.resolver);
                    tokio::spawn(async move { resolver.resolve(&request).await })
                })
                .collect();

            for (joined, request) in join_all(handles).await.into_iter().zip(chunk) {
                match joined {
                    Ok(route) => results.push(route),
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            end = ?request.end,
                            "Resolution task died, synthesizing estimate for destination"
                        );
                        results.push(ResolvedRoute {
                            provider: PROVIDER_FALLBACK.to_string(),
                            route: synthetic_route(request.start, request.end, request.profile),
                        });
                    }
                }
            }
        }

        results.sort_by(|a, b| a.route.distance_meters.total_cmp(&b.route.distance_meters));
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;

    #[tokio::test]
    async fn test_empty_batch() {
        let resolver = Arc::new(RouteResolver::new(ResolverConfig::default()));
        let batch = BatchResolver::new(resolver, 5);
        let results = batch
            .resolve_batch(Coordinate::new(48.7758, 9.1829), &[], Profile::Driving)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_non_finite_destination_fails_fast() {
        let resolver = Arc::new(RouteResolver::new(ResolverConfig::default()));
        let batch = BatchResolver::new(resolver, 5);
        let result = batch
            .resolve_batch(
                Coordinate::new(48.7758, 9.1829),
                &[Coordinate::new(49.0, 8.4), Coordinate::new(f64::NAN, 8.0)],
                Profile::Driving,
            )
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_size_is_clamped() {
        let resolver = Arc::new(RouteResolver::new(ResolverConfig::default()));
        let batch = BatchResolver::new(resolver, 0);
        assert_eq!(batch.batch_size, 1);
    }
}

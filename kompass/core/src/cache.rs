//! Bounded Route Cache
//!
//! Key→route store with TTL invalidation and oldest-inserted eviction.
//! Keys are deterministic strings built from rounded coordinates and the
//! profile name, so near-identical repeated requests hit the cache even
//! with harmless floating-point jitter.
//!
//! The cache is mutated from multiple concurrent resolution attempts;
//! the whole store sits behind a single `parking_lot::Mutex`. Volumes
//! are small (hundreds of entries) and coarse locking is preferable to
//! lock-free complexity here.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::route::{Coordinate, Profile, RouteResponse};

/// Default maximum number of cached routes.
pub const DEFAULT_CACHE_CAPACITY: usize = 200;

/// Default entry time-to-live: 24 hours.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Coordinate rounding used in cache keys (decimal digits).
const KEY_PRECISION: usize = 6;

/// Build the deterministic cache key for a request.
#[must_use]
pub fn cache_key(start: Coordinate, end: Coordinate, profile: Profile) -> String {
    format!(
        "{:.p$}-{:.p$}-{:.p$}-{:.p$}-{}",
        start.lng,
        start.lat,
        end.lng,
        end.lat,
        profile.as_str(),
        p = KEY_PRECISION,
    )
}

struct CacheEntry {
    route: RouteResponse,
    created_at: Instant,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order. May retain keys whose entries were
    /// removed by TTL expiry; eviction skips those.
    order: VecDeque<String>,
}

/// Bounded TTL cache for resolved routes.
pub struct RouteCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
    ttl: Duration,
}

impl RouteCache {
    /// Create a cache with the given capacity and entry TTL.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
            capacity,
            ttl,
        }
    }

    /// Look up a route; expired entries are removed and reported absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<RouteResponse> {
        let mut inner = self.inner.lock();
        let expired = match inner.entries.get(key) {
            Some(entry) => entry.created_at.elapsed() > self.ttl,
            None => return None,
        };
        if expired {
            inner.entries.remove(key);
            return None;
        }
        inner.entries.get(key).map(|e| e.route.clone())
    }

    /// Insert a route, evicting oldest-inserted entries first when at
    /// capacity. Re-inserting an existing key replaces the value but
    /// keeps the key's original position in the eviction order.
    pub fn put(&self, key: impl Into<String>, route: RouteResponse) {
        let key = key.into();
        let mut inner = self.inner.lock();

        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.route = route;
            entry.created_at = Instant::now();
            return;
        }

        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                route,
                created_at: Instant::now(),
            },
        );
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(distance: f64) -> RouteResponse {
        RouteResponse {
            coordinates: vec![Coordinate::new(48.0, 9.0), Coordinate::new(49.0, 8.0)],
            distance_meters: distance,
            duration_seconds: distance / 13.9,
            steps: None,
        }
    }

    #[test]
    fn test_key_rounding_absorbs_jitter() {
        let a = cache_key(
            Coordinate::new(48.775800001, 9.182900002),
            Coordinate::new(49.0069, 8.4037),
            Profile::Driving,
        );
        let b = cache_key(
            Coordinate::new(48.7758, 9.1829),
            Coordinate::new(49.0069, 8.4037),
            Profile::Driving,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_distinguishes_profiles() {
        let start = Coordinate::new(48.7758, 9.1829);
        let end = Coordinate::new(49.0069, 8.4037);
        assert_ne!(
            cache_key(start, end, Profile::Driving),
            cache_key(start, end, Profile::Cycling)
        );
    }

    #[test]
    fn test_get_put_roundtrip() {
        let cache = RouteCache::default();
        cache.put("k1", route(1000.0));
        assert_eq!(cache.get("k1").unwrap().distance_meters, 1000.0);
        assert!(cache.get("k2").is_none());
    }

    #[test]
    fn test_eviction_bound() {
        let cache = RouteCache::new(200, DEFAULT_CACHE_TTL);
        for i in 0..201 {
            cache.put(format!("key-{i}"), route(i as f64));
        }
        assert_eq!(cache.len(), 200);
        assert!(cache.get("key-0").is_none(), "first-inserted key must be evicted");
        assert!(cache.get("key-1").is_some());
        assert!(cache.get("key-200").is_some());
    }

    #[test]
    fn test_eviction_is_insertion_order_not_access_order() {
        let cache = RouteCache::new(2, DEFAULT_CACHE_TTL);
        cache.put("a", route(1.0));
        cache.put("b", route(2.0));
        // Touch "a"; insertion-order eviction must still drop it first.
        assert!(cache.get("a").is_some());
        cache.put("c", route(3.0));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = RouteCache::new(10, Duration::from_millis(40));
        cache.put("k", route(500.0));
        assert!(cache.get("k").is_some());
        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("k").is_none(), "aged entry must be treated as a miss");
    }

    #[test]
    fn test_reinsert_keeps_capacity_accounting() {
        let cache = RouteCache::new(2, DEFAULT_CACHE_TTL);
        cache.put("a", route(1.0));
        cache.put("a", route(2.0));
        cache.put("b", route(3.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().distance_meters, 2.0);
    }
}

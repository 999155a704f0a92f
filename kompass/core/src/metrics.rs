//! Resolution Metrics
//!
//! Observability for the fallback executor: a bounded ring buffer of
//! attempt outcomes (provider, success, latency, error) plus the derived
//! cache statistics exposed to operators.
//!
//! Appends happen from multiple concurrent resolution attempts; the
//! buffer sits behind a `parking_lot::Mutex`. At 100 records the lock is
//! uncontended in practice.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Default ring buffer capacity.
pub const DEFAULT_METRICS_CAPACITY: usize = 100;

/// Provider name recorded for cache hits.
pub const PROVIDER_CACHED: &str = "Cached";

/// Provider name recorded for synthetic fallback routes.
pub const PROVIDER_FALLBACK: &str = "Fallback";

/// Outcome of a single provider attempt or terminal resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Backend name, `"Cached"`, or `"Fallback"`.
    pub provider: String,
    /// Whether the attempt produced a usable route.
    pub success: bool,
    /// Wall-clock latency of the attempt in milliseconds.
    pub latency_ms: f64,
    /// Error description for failed attempts.
    pub error: Option<String>,
}

/// Cache observability summary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Current number of cached routes.
    pub size: usize,
    /// Share of recorded resolutions served from cache, in percent.
    pub hit_rate_percent: f64,
}

/// Append-only ring buffer of [`MetricRecord`]s, oldest dropped first.
pub struct MetricsCollector {
    records: Mutex<VecDeque<MetricRecord>>,
    capacity: usize,
}

impl MetricsCollector {
    /// Create a collector bounded at `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record a successful attempt.
    pub fn record_success(&self, provider: impl Into<String>, latency_ms: f64) {
        self.push(MetricRecord {
            provider: provider.into(),
            success: true,
            latency_ms,
            error: None,
        });
    }

    /// Record a failed attempt.
    pub fn record_failure(&self, provider: impl Into<String>, latency_ms: f64, error: impl Into<String>) {
        self.push(MetricRecord {
            provider: provider.into(),
            success: false,
            latency_ms,
            error: Some(error.into()),
        });
    }

    fn push(&self, record: MetricRecord) {
        let mut records = self.records.lock();
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Snapshot of the recorded attempts, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MetricRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Share of recorded resolutions that were cache hits, in percent.
    /// Zero when nothing has been recorded yet.
    #[must_use]
    pub fn hit_rate_percent(&self) -> f64 {
        let records = self.records.lock();
        if records.is_empty() {
            return 0.0;
        }
        let hits = records.iter().filter(|r| r.provider == PROVIDER_CACHED).count();
        hits as f64 / records.len() as f64 * 100.0
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(DEFAULT_METRICS_CAPACITY)
    }
}

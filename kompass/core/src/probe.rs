//! Offline Capability Probing
//!
//! Determines whether the local routing daemon is reachable. The probe
//! issues a real routing query rather than a status endpoint, because
//! some daemons expose no health route at all; a backend that can
//! answer a trivial route can answer real ones.
//!
//! Probing is advisory and never fatal: any failure simply records the
//! daemon as unavailable. The result is held in process-wide state and
//! read by the fallback executor before every resolution; re-probing is
//! caller-initiated.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default probe timeout. Localhost either answers fast or not at all.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Known-good trivial route inside the daemon's expected coverage,
/// used as the probe query.
const PROBE_PATH: &str = "/route/v1/driving/9.18,48.78;9.19,48.79";

/// Reachability prober for the local routing daemon.
pub struct OfflineProbe {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    available: AtomicBool,
}

impl OfflineProbe {
    /// Create a prober for the daemon at `base_url`. The initial state
    /// is unavailable until [`probe`](Self::probe) runs.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent.to_string())
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            timeout,
            available: AtomicBool::new(false),
        }
    }

    /// Probe the daemon and cache the result until the next call.
    ///
    /// Returns true only on an HTTP 2xx answer to the probe query.
    /// Timeouts, refused connections and error statuses all yield false
    /// and are swallowed.
    pub async fn probe(&self) -> bool {
        let available = self.try_probe().await.unwrap_or(false);
        self.available.store(available, Ordering::Release);
        tracing::info!(base_url = %self.base_url, available, "Offline routing probe");
        available
    }

    async fn try_probe(&self) -> anyhow::Result<bool> {
        let response = self
            .client
            .get(format!("{}{PROBE_PATH}", self.base_url))
            .query(&[("overview", "false")])
            .timeout(self.timeout)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    /// Last probed state.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Override the cached state without probing (for admin tooling and
    /// tests).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }
}

//! Request pacing for the TMDB API.

use std::time::Duration;

use tokio::time::Instant;

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Enforces a minimum gap between consecutive TMDB requests.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_allowed: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: None,
        }
    }

    /// Creates a limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Sleeps until the next request slot, then reserves the following one.
    pub async fn wait(&mut self) {
        if let Some(next) = self.next_allowed {
            tokio::time::sleep_until(next).await;
        }
        let now = Instant::now();
        self.next_allowed = now.checked_add(self.min_interval).or(Some(now));
    }
}

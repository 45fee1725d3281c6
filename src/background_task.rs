use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::RateLimiter;

/// Drops rate-limit windows that have already closed so the map does not
/// grow with every client ever seen.
pub async fn start_eviction_task(limiter: Arc<dyn RateLimiter>, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let removed = limiter.evict_expired(Utc::now());
        if removed > 0 {
            tracing::debug!("Evicted {} expired rate-limit windows", removed);
        }
    }
}

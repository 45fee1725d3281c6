use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::{
    entities::rate_limit::{RateLimitDecision, RateLimitPolicy},
    errors::LimiterError,
};

/// Gate shared by every rate-limited route.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, key: &str, policy: &RateLimitPolicy) -> Result<RateLimitDecision, LimiterError>;

    /// Drops windows that ended before `now`. Returns how many were removed.
    fn evict_expired(&self, _now: DateTime<Utc>) -> usize {
        0
    }

    fn backend(&self) -> &'static str;

    fn tracked_keys(&self) -> Option<usize> {
        None
    }
}

/// One fixed window: `count` requests seen since it opened, closes at `reset_at`.
#[derive(Debug, Clone, Copy)]
struct FixedWindow {
    count: u32,
    reset_at: DateTime<Utc>,
}

impl FixedWindow {
    fn open(now: DateTime<Utc>, policy: &RateLimitPolicy) -> Self {
        let window = chrono::Duration::from_std(policy.window)
            .unwrap_or_else(|_| chrono::Duration::seconds(60));
        FixedWindow { count: 1, reset_at: now + window }
    }

    fn decision(&self, allowed: bool, policy: &RateLimitPolicy) -> RateLimitDecision {
        RateLimitDecision {
            allowed,
            limit: policy.limit,
            remaining: policy.limit.saturating_sub(self.count),
            reset_at: self.reset_at,
        }
    }
}

/// Process-local fixed-window limiter.
///
/// Each key's read-modify-write happens under the map's entry lock, so
/// concurrent requests cannot both observe the same count.
#[derive(Clone, Default)]
pub struct InMemoryRateLimiter {
    map: Arc<DashMap<String, FixedWindow>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_at(&self, key: &str, policy: &RateLimitPolicy, now: DateTime<Utc>) -> RateLimitDecision {
        let mut entry = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| FixedWindow { count: 0, reset_at: now });

        let window = entry.value_mut();

        if window.count == 0 || now > window.reset_at {
            *window = FixedWindow::open(now, policy);
            return window.decision(true, policy);
        }

        if window.count >= policy.limit {
            return window.decision(false, policy);
        }

        window.count += 1;
        window.decision(true, policy)
    }

    pub fn evict_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.map.len();
        self.map.retain(|_, window| now <= window.reset_at);
        before.saturating_sub(self.map.len())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str, policy: &RateLimitPolicy) -> Result<RateLimitDecision, LimiterError> {
        Ok(self.check_at(key, policy, Utc::now()))
    }

    fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        self.evict_expired_at(now)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    fn tracked_keys(&self) -> Option<usize> {
        Some(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const POLICY: RateLimitPolicy = RateLimitPolicy::new("test", 3, 60, "slow down");

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn admits_up_to_limit_then_denies() {
        let limiter = InMemoryRateLimiter::new();
        let now = t0();

        let remaining: Vec<_> = (0..3)
            .map(|_| limiter.check_at("ip", &POLICY, now))
            .inspect(|d| assert!(d.allowed))
            .map(|d| d.remaining)
            .collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let denied = limiter.check_at("ip", &POLICY, now + Duration::seconds(1));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_at, now + Duration::seconds(60));
    }

    #[test]
    fn denied_requests_do_not_extend_the_window() {
        let limiter = InMemoryRateLimiter::new();
        let now = t0();
        for _ in 0..5 {
            limiter.check_at("ip", &POLICY, now);
        }

        let later = limiter.check_at("ip", &POLICY, now + Duration::seconds(30));
        assert_eq!(later.reset_at, now + Duration::seconds(60));
    }

    #[test]
    fn window_resets_only_strictly_after_reset_time() {
        let limiter = InMemoryRateLimiter::new();
        let now = t0();
        for _ in 0..3 {
            limiter.check_at("ip", &POLICY, now);
        }

        let at_boundary = limiter.check_at("ip", &POLICY, now + Duration::seconds(60));
        assert!(!at_boundary.allowed);

        let after = limiter.check_at("ip", &POLICY, now + Duration::milliseconds(60_001));
        assert!(after.allowed);
        assert_eq!(after.remaining, 2);
        assert_eq!(after.reset_at, now + Duration::milliseconds(120_001));
    }

    #[test]
    fn boundary_burst_admits_twice_the_limit() {
        let limiter = InMemoryRateLimiter::new();
        let now = t0();

        let late_in_first = now + Duration::seconds(59);
        limiter.check_at("ip", &POLICY, now);
        let admitted_first = (0..3)
            .filter(|_| limiter.check_at("ip", &POLICY, late_in_first).allowed)
            .count();

        let early_in_second = now + Duration::seconds(61);
        let admitted_second = (0..3)
            .filter(|_| limiter.check_at("ip", &POLICY, early_in_second).allowed)
            .count();

        assert_eq!(admitted_first, 2);
        assert_eq!(admitted_second, 3);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = InMemoryRateLimiter::new();
        let now = t0();
        for _ in 0..4 {
            limiter.check_at("a", &POLICY, now);
        }

        assert!(!limiter.check_at("a", &POLICY, now).allowed);
        assert!(limiter.check_at("b", &POLICY, now).allowed);
    }

    #[test]
    fn eviction_drops_only_expired_windows() {
        let limiter = InMemoryRateLimiter::new();
        let now = t0();
        limiter.check_at("old", &POLICY, now);
        limiter.check_at("fresh", &POLICY, now + Duration::seconds(50));

        let removed = limiter.evict_expired_at(now + Duration::seconds(61));

        assert_eq!(removed, 1);
        assert_eq!(limiter.len(), 1);
        // an evicted key simply starts a new window
        assert!(limiter.check_at("old", &POLICY, now + Duration::seconds(62)).allowed);
    }

    #[tokio::test]
    async fn concurrent_checks_never_over_admit() {
        let limiter = InMemoryRateLimiter::new();
        let now = t0();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.check_at("burst", &POLICY, now).allowed })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, POLICY.limit);
    }
}

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Per-route limit: at most `limit` requests per client within `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub scope: &'static str,
    pub limit: u32,
    pub window: Duration,
    pub message: &'static str,
    /// Extra line for operators, echoed in the 429 body when set.
    pub security_note: Option<&'static str>,
}

impl RateLimitPolicy {
    pub const fn new(scope: &'static str, limit: u32, window_secs: u64, message: &'static str) -> Self {
        RateLimitPolicy {
            scope,
            limit,
            window: Duration::from_secs(window_secs),
            message,
            security_note: None,
        }
    }

    pub const fn with_security_note(self, note: &'static str) -> Self {
        RateLimitPolicy { security_note: Some(note), ..self }
    }

    /// Counters are kept per (route, client) pair.
    pub fn key_for(&self, client: &str) -> String {
        format!("{}:{}", self.scope, client)
    }
}

pub const CONTACT_POLICY: RateLimitPolicy = RateLimitPolicy::new(
    "contact",
    5,
    60,
    "Vui lòng thử lại sau 1 phút. Chúng tôi giới hạn 5 tin nhắn/phút để tránh spam.",
);

pub const SMS_POLICY: RateLimitPolicy = RateLimitPolicy::new(
    "sms",
    3,
    60,
    "Vui lòng thử lại sau 1 phút. Chúng tôi giới hạn 3 SMS/phút để tránh spam.",
);

pub const ADMIN_SCRAPE_POLICY: RateLimitPolicy = RateLimitPolicy::new(
    "admin-scrape",
    2,
    300,
    "Admin endpoint rate limit exceeded. Try again in 5 minutes.",
)
.with_security_note("Multiple admin attempts logged");

pub const PROJECTS_POLICY: RateLimitPolicy =
    RateLimitPolicy::new("projects", 10, 60, "Vui lòng thử lại sau 1 phút");

pub const GMAPS_DEMO_POLICY: RateLimitPolicy =
    RateLimitPolicy::new("demo-gmaps", 10, 60, "Vui lòng thử lại sau 1 phút");

pub const TRADE_DEMO_POLICY: RateLimitPolicy =
    RateLimitPolicy::new("demo-trade", 10, 60, "Vui lòng thử lại sau 1 phút");

/// Outcome of one limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Window end as epoch seconds, rounded up.
    pub fn reset_epoch_secs(&self) -> i64 {
        let millis = self.reset_at.timestamp_millis();
        (millis + 999).div_euclid(1000)
    }

    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn keys_are_scoped_per_route() {
        assert_eq!(CONTACT_POLICY.key_for("1.2.3.4"), "contact:1.2.3.4");
        assert_ne!(SMS_POLICY.key_for("1.2.3.4"), CONTACT_POLICY.key_for("1.2.3.4"));
    }

    #[test]
    fn only_admin_policy_carries_a_security_note() {
        assert_eq!(ADMIN_SCRAPE_POLICY.security_note, Some("Multiple admin attempts logged"));
        assert_eq!(CONTACT_POLICY.security_note, None);
        assert_eq!(ADMIN_SCRAPE_POLICY.limit, 2);
    }

    #[test]
    fn reset_and_retry_round_up() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let decision = RateLimitDecision {
            allowed: false,
            limit: 5,
            remaining: 0,
            reset_at: Utc.timestamp_millis_opt(1_700_000_059_001).unwrap(),
        };

        assert_eq!(decision.reset_epoch_secs(), 1_700_000_060);
        assert_eq!(decision.retry_after_secs(now), 60);
    }

    #[test]
    fn retry_after_is_at_least_one_second() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let decision = RateLimitDecision {
            allowed: false,
            limit: 2,
            remaining: 0,
            reset_at: now,
        };

        assert_eq!(decision.retry_after_secs(now), 1);
    }
}

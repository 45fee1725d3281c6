use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use deadpool_redis::Pool;
use redis::Script;

use crate::{
    entities::rate_limit::{RateLimitDecision, RateLimitPolicy},
    errors::LimiterError,
    limiter::rate_limiter::RateLimiter,
};

/// Admits and counts in one round trip. A denied request leaves the counter
/// alone, so it never exceeds the limit. The expiry is only set when the
/// window opens (or when a key somehow lost its TTL), so the window end never
/// moves. Replies `{allowed, count, pttl}`.
const CHECK_SCRIPT: &str = r#"
local limit = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local count = tonumber(redis.call('GET', KEYS[1]) or '0')
local allowed = 0
if count < limit then
  count = redis.call('INCR', KEYS[1])
  allowed = 1
end
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
  redis.call('PEXPIRE', KEYS[1], window)
  ttl = window
end
return {allowed, count, ttl}
"#;

/// Fixed-window limiter shared by every instance pointing at the same Redis.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: Pool,
    prefix: String,
    script: Script,
}

impl RedisRateLimiter {
    pub fn new(pool: Pool) -> Self {
        RedisRateLimiter {
            pool,
            prefix: "rl".to_string(),
            script: Script::new(CHECK_SCRIPT),
        }
    }

    fn redis_key(&self, key: &str) -> String {
        // IPv6 addresses carry ':' which would blur the key namespace
        format!("{}:{}", self.prefix, urlencoding::encode(key))
    }
}

/// Turns the script reply into a decision relative to `now`.
fn decision_from_reply(
    (allowed, count, ttl_ms): (i64, i64, i64),
    policy: &RateLimitPolicy,
    now: DateTime<Utc>,
) -> RateLimitDecision {
    let count = u32::try_from(count.max(0)).unwrap_or(u32::MAX);

    RateLimitDecision {
        allowed: allowed == 1,
        limit: policy.limit,
        remaining: policy.limit.saturating_sub(count),
        reset_at: now + Duration::milliseconds(ttl_ms.max(0)),
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str, policy: &RateLimitPolicy) -> Result<RateLimitDecision, LimiterError> {
        let window_ms = policy.window.as_millis() as i64;
        let mut conn = self.pool.get().await?;

        let reply: (i64, i64, i64) = self
            .script
            .key(self.redis_key(key))
            .arg(policy.limit)
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await?;

        Ok(decision_from_reply(reply, policy, Utc::now()))
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

pub fn create_redis_pool(url: &str) -> Result<Pool, LimiterError> {
    deadpool_redis::Config::from_url(url)
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| LimiterError::Backend(e.to_string()))
}

pub async fn ping(pool: &Pool) -> Result<(), LimiterError> {
    let mut conn = pool.get().await?;
    let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
    if pong == "PONG" {
        Ok(())
    } else {
        Err(LimiterError::Backend(format!("unexpected PING reply: {}", pong)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::rate_limit::CONTACT_POLICY;
    use chrono::TimeZone;

    #[tokio::test]
    async fn keys_are_prefixed_and_encoded() {
        let pool = create_redis_pool("redis://127.0.0.1:6379").unwrap();
        let limiter = RedisRateLimiter::new(pool);

        assert_eq!(limiter.redis_key("contact:::1"), "rl:contact%3A%3A%3A1");
    }

    #[test]
    fn reply_maps_to_decision() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let admitted = decision_from_reply((1, 2, 30_000), &CONTACT_POLICY, now);
        assert!(admitted.allowed);
        assert_eq!(admitted.remaining, 3);
        assert_eq!(admitted.reset_epoch_secs(), 1_700_000_030);

        let denied = decision_from_reply((0, 5, 1_500), &CONTACT_POLICY, now);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after_secs(now), 2);
    }

    #[tokio::test]
    #[ignore = "needs a Redis server at REDIS_URL"]
    async fn denied_requests_do_not_grow_the_counter() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let pool = create_redis_pool(&url).unwrap();
        let limiter = RedisRateLimiter::new(pool.clone());
        let key = format!("test:{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
        let policy = RateLimitPolicy::new("test", 3, 60, "slow down");

        let mut allowed = Vec::new();
        for _ in 0..6 {
            allowed.push(limiter.check(&key, &policy).await.unwrap().allowed);
        }
        assert_eq!(allowed, vec![true, true, true, false, false, false]);

        let mut conn = pool.get().await.unwrap();
        let stored: u32 = redis::cmd("GET")
            .arg(limiter.redis_key(&key))
            .query_async(&mut conn)
            .await
            .unwrap();
        assert_eq!(stored, 3);

        let ttl: i64 = redis::cmd("PTTL")
            .arg(limiter.redis_key(&key))
            .query_async(&mut conn)
            .await
            .unwrap();
        assert!(ttl > 0 && ttl <= 60_000);
    }
}

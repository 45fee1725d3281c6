pub mod rate_limiter;
pub mod redis_limiter;

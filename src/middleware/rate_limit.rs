use axum::{http::StatusCode, Json};
use redis::aio::MultiplexedConnection;
use serde_json::{json, Value};

/// Fixed-window attempt counter backed by Redis (INCR + EXPIRE).
///
/// Without a Redis connection every check passes: the limiter is an
/// optional hardening layer, not part of booking semantics.
#[derive(Clone, Default)]
pub struct RateLimiter {
    redis: Option<MultiplexedConnection>,
}

impl RateLimiter {
    pub fn new(redis: Option<MultiplexedConnection>) -> Self {
        Self { redis }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.redis.is_some()
    }

    /// Counts one attempt against `key`; 429 once `max_attempts` is exceeded
    /// inside `window_secs`. The window starts at the first attempt.
    pub async fn check(&self, key: &str, max_attempts: u64, window_secs: u64) -> Result<(), (StatusCode, Json<Value>)> {
        let Some(mut redis) = self.redis.clone() else {
            return Ok(());
        };

        let count: u64 = match redis::cmd("INCR").arg(key).query_async(&mut redis).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("rate limit check skipped for {key}: {e}");
                return Ok(());
            }
        };

        if count == 1 {
            let _: Result<(), _> = redis::cmd("EXPIRE")
                .arg(key)
                .arg(window_secs)
                .query_async(&mut redis)
                .await;
        }

        if count > max_attempts {
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Too many attempts. Try again in a few minutes." })),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_limiter_always_allows() {
        let limiter = RateLimiter::disabled();
        assert!(!limiter.is_enabled());
        for _ in 0..10 {
            assert!(limiter.check("rate:test", 1, 60).await.is_ok());
        }
    }
}

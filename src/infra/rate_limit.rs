use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use redis::{Script, aio::ConnectionManager};

use super::InfraError;
use crate::app_error::{AppError, AppResult};

/// Trait for rate limiting implementations.
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Counts one request for `client`.
    /// Returns Ok(()) if within limits, Err(AppError::RateLimited) if exceeded.
    async fn check(&self, client: &str) -> AppResult<()>;
}

/// Map size above which expired windows are swept.
const PRUNE_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    count: u64,
}

/// Process-local fixed window limiter, used when no Redis is configured.
pub struct FixedWindowRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    window: Duration,
    max_per_window: u64,
}

impl FixedWindowRateLimiter {
    pub fn new(window_secs: u64, max_per_window: u64) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window: Duration::from_secs(window_secs),
            max_per_window,
        }
    }

    fn check_at(&self, client: &str, now: Instant) -> AppResult<()> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| AppError::Internal("rate limiter lock poisoned".into()))?;

        if windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;

        if entry.count > self.max_per_window {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}

#[async_trait]
impl RateLimiterTrait for FixedWindowRateLimiter {
    async fn check(&self, client: &str) -> AppResult<()> {
        self.check_at(client, Instant::now())
    }
}

/// Lua script for atomic increment with TTL.
/// Returns the new count after increment.
/// A key left without TTL gets one on the next hit.
const INCR_WITH_TTL_SCRIPT: &str = r#"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
elseif redis.call('TTL', KEYS[1]) == -1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return current
"#;

/// Redis-backed limiter, shared across instances.
#[derive(Clone)]
pub struct RedisRateLimiter {
    manager: ConnectionManager,
    window_secs: u64,
    max_per_window: u64,
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(
        redis_url: &str,
        window_secs: u64,
        max_per_window: u64,
    ) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url).map_err(InfraError::RedisConnection)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(InfraError::RedisConnection)?;
        Ok(Self {
            manager,
            window_secs,
            max_per_window,
            script: Script::new(INCR_WITH_TTL_SCRIPT),
        })
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn check(&self, client: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let current: u64 = self
            .script
            .key(format!("waitlist:rate:ip:{client}"))
            .arg(self.window_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if current > self.max_per_window {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}

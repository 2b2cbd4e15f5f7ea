//! Login rate limiter for slowing credential-stuffing attempts

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed per window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds once the window is exhausted
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

#[derive(Debug)]
struct AttemptRecord {
    attempts: u32,
    last_attempt: Instant,
    ban_expires: Option<Instant>,
}

/// In-memory sliding-window limiter, keyed per login email
#[derive(Debug, Clone)]
pub struct LoginRateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, AttemptRecord>>>,
}

impl LoginRateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for this key and decide whether it may proceed
    pub async fn allow_attempt(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(AttemptRecord {
            attempts: 0,
            last_attempt: now,
            ban_expires: None,
        });

        if let Some(ban_expires) = entry.ban_expires {
            if now >= ban_expires {
                entry.attempts = 0;
                entry.ban_expires = None;
            } else {
                return false;
            }
        }

        if now.duration_since(entry.last_attempt) >= Duration::from_secs(self.config.window_seconds)
        {
            entry.attempts = 0;
        }

        if entry.attempts >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned login key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        entry.attempts += 1;
        entry.last_attempt = now;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32) -> LoginRateLimiter {
        LoginRateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        })
    }

    #[tokio::test]
    async fn attempts_under_the_limit_pass() {
        let limiter = limiter(3);
        for _ in 0..3 {
            assert!(limiter.allow_attempt("ann@x.com").await);
        }
    }

    #[tokio::test]
    async fn exhausting_the_window_bans_the_key() {
        let limiter = limiter(2);
        assert!(limiter.allow_attempt("ann@x.com").await);
        assert!(limiter.allow_attempt("ann@x.com").await);
        assert!(!limiter.allow_attempt("ann@x.com").await);
        // still banned on the next call
        assert!(!limiter.allow_attempt("ann@x.com").await);
    }

    #[tokio::test]
    async fn keys_are_limited_independently() {
        let limiter = limiter(1);
        assert!(limiter.allow_attempt("ann@x.com").await);
        assert!(!limiter.allow_attempt("ann@x.com").await);
        assert!(limiter.allow_attempt("ben@x.com").await);
    }
}

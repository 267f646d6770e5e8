//! Fixed-window rate limiting keyed by caller.
//!
//! Each key gets a counter and the instant its window opened. The first hit
//! after the window has elapsed opens a fresh window, so at most
//! `max_requests` hits are allowed per key per window.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock, Reference};

/// Configuration for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in one window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Create a new rate limit configuration.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

impl Default for RateLimitConfig {
    /// 10 requests per 10 minutes.
    fn default() -> Self {
        Self::new(10, 10 * 60)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed.
    Allowed {
        /// Requests still available in the current window.
        remaining: u32,
        /// Time until the current window closes.
        reset_after: Duration,
    },
    /// Request is denied.
    Denied {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl RateLimitResult {
    /// Check if the request is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Counter for one key.
#[derive(Debug)]
struct Window<I> {
    opened: I,
    hits: u32,
}

/// Per-key fixed-window rate limiter.
///
/// The clock is injectable; tests use `governor::clock::FakeRelativeClock`.
///
/// # Example
///
/// ```
/// use contact_relay::rate_limit::{RateLimitConfig, RateLimiter};
///
/// let limiter = RateLimiter::new(RateLimitConfig::new(2, 60));
/// assert!(limiter.check("10.0.0.1").is_allowed());
/// assert!(limiter.check("10.0.0.1").is_allowed());
/// assert!(!limiter.check("10.0.0.1").is_allowed());
/// ```
pub struct RateLimiter<C: Clock = DefaultClock> {
    config: RateLimitConfig,
    clock: C,
    windows: Mutex<HashMap<String, Window<C::Instant>>>,
}

impl RateLimiter<DefaultClock> {
    /// Create a new rate limiter using the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, DefaultClock::default())
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Create a new rate limiter with the given clock.
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Rate limit configuration.
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// The clock driving window expiry.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Window<C::Instant>>> {
        // Counters stay consistent even if a holder panicked mid-update.
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn elapsed(&self, now: C::Instant, since: C::Instant) -> Duration {
        now.duration_since(since).into()
    }

    /// Count a request for `key` and decide whether it may proceed.
    ///
    /// Denied requests are not counted.
    pub fn check(&self, key: &str) -> RateLimitResult {
        let mut windows = self.lock();
        let now = self.clock.now();

        let window = windows.entry(key.to_string()).or_insert(Window {
            opened: now,
            hits: 0,
        });

        if self.elapsed(now, window.opened) >= self.config.window {
            window.opened = now;
            window.hits = 0;
        }

        let reset_after = self
            .config
            .window
            .saturating_sub(self.elapsed(now, window.opened));

        if window.hits >= self.config.max_requests {
            return RateLimitResult::Denied {
                retry_after: reset_after,
            };
        }

        window.hits += 1;
        RateLimitResult::Allowed {
            remaining: self.config.max_requests - window.hits,
            reset_after,
        }
    }

    /// Drop keys whose window has elapsed.
    pub fn cleanup(&self) {
        let window = self.config.window;
        let mut windows = self.lock();
        let now = self.clock.now();
        windows.retain(|_, w| Duration::from(now.duration_since(w.opened)) < window);
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }
}

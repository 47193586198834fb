//! Sliding-window admission control for upstream requests.
//!
//! Protects the provider quota: the window holds the timestamps of recently
//! admitted requests, and a request is admitted only while fewer than
//! `max_requests` remain inside the window. Denied callers never wait; they
//! receive `false` and are expected to degrade immediately.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Read-only snapshot of the window state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub requests_in_window: usize,
    pub max_requests: usize,
    pub can_make_request: bool,
    pub next_reset_in_ms: u64,
}

/// Sliding-window rate limiter.
///
/// Thread-safe; shared between request handlers via `Arc`.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            timestamps: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Admits a request if the window has room, recording it.
    ///
    /// Returns `false` without recording when the window is full.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut timestamps = self.timestamps.lock();
        self.prune(&mut timestamps, now);

        if timestamps.len() < self.max_requests {
            timestamps.push_back(now);
            true
        } else {
            false
        }
    }

    /// Current window state. Prunes expired entries but never records.
    pub fn status(&self) -> RateLimitStatus {
        let now = Instant::now();
        let mut timestamps = self.timestamps.lock();
        self.prune(&mut timestamps, now);

        let next_reset_in_ms = timestamps
            .front()
            .map(|oldest| {
                let expires_at = *oldest + self.window;
                expires_at.saturating_duration_since(now).as_millis() as u64
            })
            .unwrap_or(0);

        RateLimitStatus {
            requests_in_window: timestamps.len(),
            max_requests: self.max_requests,
            can_make_request: timestamps.len() < self.max_requests,
            next_reset_in_ms,
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn prune(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = timestamps.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}

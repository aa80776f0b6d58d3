// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-workspace sliding-window rate limiting.
//!
//! The limiter holds lazily created per-workspace counters behind one lock.
//! Check-and-consume is a single synchronous critical section, so the
//! increment is atomic with respect to other tasks. Denied callers must
//! abort with a rate-limit response; the limiter never queues or retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use brandbot_core::traits::Clock;
use brandbot_core::types::WorkspaceId;

/// Outcome of one check-and-consume call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window after this call.
    pub remaining: u32,
    /// When the current window ends and the counter resets.
    pub reset_at: DateTime<Utc>,
}

/// One workspace's window counter. Count is monotonically non-decreasing
/// within a window and reset to zero when a new window starts.
#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// In-memory per-workspace rate limiter.
///
/// State is deliberately ephemeral: lost counters on restart simply grant a
/// fresh window, which is acceptable for this subsystem.
pub struct RateLimiter {
    windows: Mutex<HashMap<WorkspaceId, WindowState>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Check the workspace's window and consume one request if allowed.
    ///
    /// When the current window has elapsed, the counter resets to zero and a
    /// new window starts before the increment is applied.
    pub fn check_and_consume(
        &self,
        workspace_id: &WorkspaceId,
        max_requests: u32,
        window: Duration,
    ) -> RateLimitDecision {
        let now = self.clock.now();
        let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::zero());

        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let state = windows
            .entry(workspace_id.clone())
            .or_insert_with(|| WindowState {
                count: 0,
                reset_at: now + window,
            });

        if now >= state.reset_at {
            state.count = 0;
            state.reset_at = now + window;
        }

        if state.count >= max_requests {
            debug!(
                workspace = %workspace_id.0,
                reset_at = %state.reset_at,
                "rate limit denied"
            );
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: state.reset_at,
            };
        }

        state.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: max_requests - state.count,
            reset_at: state.reset_at,
        }
    }

    /// Drop expired windows to bound memory. Returns the number removed.
    ///
    /// Not correctness-critical: a stale entry self-corrects on next access.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let before = windows.len();
        windows.retain(|_, state| state.reset_at > now);
        let swept = before - windows.len();
        if swept > 0 {
            debug!(swept, "swept expired rate limit windows");
        }
        swept
    }

    /// Spawn a background task that sweeps expired windows periodically.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                limiter.sweep_expired();
            }
        })
    }

    /// Number of live per-workspace windows (for tests and diagnostics).
    pub fn window_count(&self) -> usize {
        self.windows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_test_utils::ManualClock;

    fn workspace(id: &str) -> WorkspaceId {
        WorkspaceId(id.to_string())
    }

    #[test]
    fn allows_up_to_limit_then_denies() {
        let clock = Arc::new(ManualClock::default());
        let limiter = RateLimiter::new(clock);
        let ws = workspace("W1");
        let window = Duration::from_secs(60);

        for i in 1..=5u32 {
            let decision = limiter.check_and_consume(&ws, 5, window);
            assert!(decision.allowed, "call {i} should be allowed");
            assert_eq!(decision.remaining, 5 - i);
        }

        let denied = limiter.check_and_consume(&ws, 5, window);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
    }

    #[test]
    fn window_elapse_resets_counter() {
        let clock = Arc::new(ManualClock::default());
        let limiter = RateLimiter::new(Arc::clone(&clock) as Arc<dyn Clock>);
        let ws = workspace("W1");
        let window = Duration::from_secs(60);

        for _ in 0..3 {
            limiter.check_and_consume(&ws, 3, window);
        }
        assert!(!limiter.check_and_consume(&ws, 3, window).allowed);

        clock.advance(Duration::from_secs(61));
        let decision = limiter.check_and_consume(&ws, 3, window);
        assert!(decision.allowed, "fresh window after elapse");
        assert_eq!(decision.remaining, 2);
    }

    #[test]
    fn workspaces_are_independent() {
        let clock = Arc::new(ManualClock::default());
        let limiter = RateLimiter::new(clock);
        let window = Duration::from_secs(60);

        assert!(!limiter
            .check_and_consume(&workspace("W1"), 0, window)
            .allowed);
        assert!(limiter
            .check_and_consume(&workspace("W2"), 1, window)
            .allowed);
    }

    #[test]
    fn reset_at_reported_on_denial() {
        let clock = Arc::new(ManualClock::default());
        let start = clock.now();
        let limiter = RateLimiter::new(Arc::clone(&clock) as Arc<dyn Clock>);
        let ws = workspace("W1");
        let window = Duration::from_secs(60);

        limiter.check_and_consume(&ws, 1, window);
        let denied = limiter.check_and_consume(&ws, 1, window);
        assert!(!denied.allowed);
        assert_eq!(denied.reset_at, start + chrono::Duration::seconds(60));
    }

    #[test]
    fn sweep_removes_only_expired_windows() {
        let clock = Arc::new(ManualClock::default());
        let limiter = RateLimiter::new(Arc::clone(&clock) as Arc<dyn Clock>);

        limiter.check_and_consume(&workspace("W1"), 5, Duration::from_secs(10));
        limiter.check_and_consume(&workspace("W2"), 5, Duration::from_secs(120));
        assert_eq!(limiter.window_count(), 2);

        clock.advance(Duration::from_secs(30));
        assert_eq!(limiter.sweep_expired(), 1);
        assert_eq!(limiter.window_count(), 1);
    }

    #[test]
    fn stale_entry_self_corrects_without_sweep() {
        let clock = Arc::new(ManualClock::default());
        let limiter = RateLimiter::new(Arc::clone(&clock) as Arc<dyn Clock>);
        let ws = workspace("W1");

        limiter.check_and_consume(&ws, 1, Duration::from_secs(10));
        clock.advance(Duration::from_secs(3600));
        // No sweep ran; the next access resets the window in place.
        assert!(limiter.check_and_consume(&ws, 1, Duration::from_secs(10)).allowed);
    }
}

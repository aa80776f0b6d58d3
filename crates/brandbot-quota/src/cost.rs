// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily classifier quota tracking per workspace.
//!
//! Tracks a fixed daily request ceiling and a fixed daily estimated-cost
//! ceiling; cost is a flat per-call constant, not a billing callback. Daily
//! state resets on a UTC day-bucket comparison against the stored marker,
//! so the reset is lazy and correct even if the process was idle across
//! midnight.
//!
//! Call order contract: `check_limits` before every classifier call,
//! `record_usage` only after a call actually succeeds, so failed calls do
//! not consume quota.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, warn};

use brandbot_config::QuotaConfig;
use brandbot_core::traits::Clock;
use brandbot_core::types::WorkspaceId;

/// Outcome of a quota check.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaDecision {
    pub allowed: bool,
    /// Human-readable denial reason naming the ceiling that was hit.
    pub reason: Option<String>,
}

impl QuotaDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// One workspace's usage for the current UTC day.
#[derive(Debug, Clone, Copy)]
struct DayState {
    requests: u32,
    cost_usd: f64,
    day: NaiveDate,
}

/// In-memory daily request/cost quota tracker.
///
/// Once either ceiling is reached, no further classifier calls are permitted
/// until the day marker rolls over. State is process-local and ephemeral.
pub struct CostMonitor {
    states: Mutex<HashMap<WorkspaceId, DayState>>,
    config: QuotaConfig,
    clock: Arc<dyn Clock>,
}

impl CostMonitor {
    pub fn new(config: QuotaConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            config,
            clock,
        }
    }

    /// Check whether the workspace may make another classifier call.
    pub fn check_limits(&self, workspace_id: &WorkspaceId) -> QuotaDecision {
        let today = self.clock.now().date_naive();
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        let state = Self::state_for_day(&mut states, workspace_id, today);

        if state.requests >= self.config.daily_request_limit {
            let reason = format!(
                "daily classifier request limit of {} reached",
                self.config.daily_request_limit
            );
            debug!(workspace = %workspace_id.0, %reason, "quota denied");
            return QuotaDecision::denied(reason);
        }

        if state.cost_usd >= self.config.daily_cost_limit_usd {
            let reason = format!(
                "daily classifier cost limit of ${:.2} reached",
                self.config.daily_cost_limit_usd
            );
            debug!(workspace = %workspace_id.0, %reason, "quota denied");
            return QuotaDecision::denied(reason);
        }

        if state.cost_usd >= self.config.daily_cost_limit_usd * 0.8 {
            warn!(
                workspace = %workspace_id.0,
                cost = state.cost_usd,
                cap = self.config.daily_cost_limit_usd,
                "approaching daily classifier cost cap (80%+)"
            );
        }

        QuotaDecision::allowed()
    }

    /// Record one successful classifier call against the workspace's quota.
    pub fn record_usage(&self, workspace_id: &WorkspaceId) {
        let today = self.clock.now().date_naive();
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        let state = Self::state_for_day(&mut states, workspace_id, today);
        state.requests += 1;
        state.cost_usd += self.config.cost_per_call_usd;
    }

    /// Current usage for reporting and tests: (requests, estimated cost).
    pub fn usage(&self, workspace_id: &WorkspaceId) -> (u32, f64) {
        let today = self.clock.now().date_naive();
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        let state = Self::state_for_day(&mut states, workspace_id, today);
        (state.requests, state.cost_usd)
    }

    fn state_for_day<'a>(
        states: &'a mut HashMap<WorkspaceId, DayState>,
        workspace_id: &WorkspaceId,
        today: NaiveDate,
    ) -> &'a mut DayState {
        let state = states
            .entry(workspace_id.clone())
            .or_insert_with(|| DayState {
                requests: 0,
                cost_usd: 0.0,
                day: today,
            });
        if state.day != today {
            state.requests = 0;
            state.cost_usd = 0.0;
            state.day = today;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_test_utils::ManualClock;
    use std::time::Duration;

    fn monitor_with(
        daily_requests: u32,
        daily_cost: f64,
        per_call: f64,
    ) -> (CostMonitor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let config = QuotaConfig {
            daily_request_limit: daily_requests,
            daily_cost_limit_usd: daily_cost,
            cost_per_call_usd: per_call,
        };
        let monitor = CostMonitor::new(config, Arc::clone(&clock) as Arc<dyn Clock>);
        (monitor, clock)
    }

    fn workspace(id: &str) -> WorkspaceId {
        WorkspaceId(id.to_string())
    }

    #[test]
    fn allowed_under_both_ceilings() {
        let (monitor, _clock) = monitor_with(10, 1.0, 0.002);
        let ws = workspace("W1");
        monitor.record_usage(&ws);
        let decision = monitor.check_limits(&ws);
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn request_ceiling_reason_names_the_limit() {
        let (monitor, _clock) = monitor_with(3, 100.0, 0.002);
        let ws = workspace("W1");
        for _ in 0..3 {
            monitor.record_usage(&ws);
        }
        let decision = monitor.check_limits(&ws);
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains('3'));
    }

    #[test]
    fn denied_stays_denied_all_day() {
        let (monitor, _clock) = monitor_with(2, 100.0, 0.002);
        let ws = workspace("W1");
        monitor.record_usage(&ws);
        monitor.record_usage(&ws);
        assert!(!monitor.check_limits(&ws).allowed);
        // Further recordings cannot flip the decision back.
        monitor.record_usage(&ws);
        assert!(!monitor.check_limits(&ws).allowed);
    }

    #[test]
    fn cost_ceiling_denies_with_dollar_reason() {
        let (monitor, _clock) = monitor_with(1000, 0.01, 0.005);
        let ws = workspace("W1");
        monitor.record_usage(&ws);
        monitor.record_usage(&ws);
        let decision = monitor.check_limits(&ws);
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("$0.01"));
    }

    #[test]
    fn day_rollover_resets_lazily() {
        let (monitor, clock) = monitor_with(1, 100.0, 0.002);
        let ws = workspace("W1");
        monitor.record_usage(&ws);
        assert!(!monitor.check_limits(&ws).allowed);

        // Idle across midnight: the next check sees a fresh day bucket.
        clock.advance(Duration::from_secs(24 * 3600));
        assert!(monitor.check_limits(&ws).allowed);
        assert_eq!(monitor.usage(&ws), (0, 0.0));
    }

    #[test]
    fn failed_calls_do_not_consume_quota() {
        // The contract is call-order based: the monitor only moves when
        // record_usage is invoked, which callers do on success alone.
        let (monitor, _clock) = monitor_with(1, 100.0, 0.002);
        let ws = workspace("W1");
        assert!(monitor.check_limits(&ws).allowed);
        assert!(monitor.check_limits(&ws).allowed);
        assert_eq!(monitor.usage(&ws).0, 0);
    }

    #[test]
    fn workspaces_tracked_independently() {
        let (monitor, _clock) = monitor_with(1, 100.0, 0.002);
        monitor.record_usage(&workspace("W1"));
        assert!(!monitor.check_limits(&workspace("W1")).allowed);
        assert!(monitor.check_limits(&workspace("W2")).allowed);
    }
}

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-workspace rate limiting and daily classifier quotas.
//!
//! Both trackers are process-local, in-memory state behind one lock each.
//! Check-and-consume operations are single synchronous critical sections,
//! so no asynchronous suspension can interleave between a read and its
//! corresponding write.

pub mod cost;
pub mod rate;

pub use cost::{CostMonitor, QuotaDecision};
pub use rate::{RateLimitDecision, RateLimiter};

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Brandbot command pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Defaults mirror the production constants; the
//! confidence bands and synonym tables are deliberately *not* configurable
//! and live as constants next to the code that uses them.

use serde::{Deserialize, Serialize};

/// Top-level Brandbot configuration.
///
/// Loaded from TOML following the XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrandbotConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Per-workspace rate limiting.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Daily classifier quota ceilings.
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Natural-language classifier endpoint. Disabled when no endpoint set.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Confirmation-gate thresholds per asset category.
    #[serde(default)]
    pub confirm: ConfirmConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in responses and logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "brandbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-workspace rate limit window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum commands per workspace per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window duration in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    60
}

/// Daily classifier quota configuration.
///
/// Cost is estimated as a flat per-call constant, not measured from a
/// billing callback.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuotaConfig {
    /// Daily classifier request ceiling per workspace.
    #[serde(default = "default_daily_requests")]
    pub daily_request_limit: u32,

    /// Daily estimated-cost ceiling per workspace, in USD.
    #[serde(default = "default_daily_cost")]
    pub daily_cost_limit_usd: f64,

    /// Flat estimated cost per classifier call, in USD.
    #[serde(default = "default_cost_per_call")]
    pub cost_per_call_usd: f64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_request_limit: default_daily_requests(),
            daily_cost_limit_usd: default_daily_cost(),
            cost_per_call_usd: default_cost_per_call(),
        }
    }
}

fn default_daily_requests() -> u32 {
    100
}

fn default_daily_cost() -> f64 {
    1.0
}

fn default_cost_per_call() -> f64 {
    0.002
}

/// Natural-language classifier configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Completion service endpoint. `None` disables the classifier and the
    /// resolver always uses its local heuristic fallback.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key for the completion service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier passed through to the service, if it wants one.
    #[serde(default)]
    pub model: Option<String>,
}

impl ClassifierConfig {
    /// Whether a classifier endpoint is configured at all.
    pub fn enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Confirmation-gate thresholds.
///
/// A candidate count strictly above the category's threshold requires an
/// explicit user choice before delivery starts. Logos carry the larger
/// threshold; colors and fonts render as text and confirm sooner.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfirmConfig {
    #[serde(default = "default_logo_threshold")]
    pub logo_threshold: usize,

    #[serde(default = "default_color_threshold")]
    pub color_threshold: usize,

    #[serde(default = "default_font_threshold")]
    pub font_threshold: usize,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            logo_threshold: default_logo_threshold(),
            color_threshold: default_color_threshold(),
            font_threshold: default_font_threshold(),
        }
    }
}

fn default_logo_threshold() -> usize {
    10
}

fn default_color_threshold() -> usize {
    5
}

fn default_font_threshold() -> usize {
    5
}

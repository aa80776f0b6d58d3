// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./brandbot.toml` > `~/.config/brandbot/brandbot.toml`
//! > `/etc/brandbot/brandbot.toml` with environment variable overrides via the
//! `BRANDBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::debug;

use crate::model::BrandbotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/brandbot/brandbot.toml` (system-wide)
/// 3. `~/.config/brandbot/brandbot.toml` (user XDG config)
/// 4. `./brandbot.toml` (local directory)
/// 5. `BRANDBOT_*` environment variables
pub fn load_config() -> Result<BrandbotConfig, figment::Error> {
    debug!("loading configuration from XDG hierarchy with BRANDBOT_ overrides");
    Figment::new()
        .merge(Serialized::defaults(BrandbotConfig::default()))
        .merge(Toml::file("/etc/brandbot/brandbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("brandbot/brandbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("brandbot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BrandbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrandbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BrandbotConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(BrandbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BRANDBOT_QUOTA_DAILY_REQUEST_LIMIT` must
/// map to `quota.daily_request_limit`, not `quota.daily.request.limit`.
fn env_provider() -> Env {
    Env::prefixed("BRANDBOT_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("limits_", "limits.", 1)
            .replacen("quota_", "quota.", 1)
            .replacen("classifier_", "classifier.", 1)
            .replacen("confirm_", "confirm.", 1);
        mapped.into()
    })
}

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Brandbot command pipeline.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AgentConfig, BrandbotConfig, ClassifierConfig, ConfirmConfig, LimitsConfig, QuotaConfig,
};

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent resolution for Brandbot commands.
//!
//! Priority order: deterministic vocabulary parse → natural-language
//! classifier (when configured and under quota) → local keyword heuristic.

pub mod prompt;
pub mod resolver;

pub use prompt::build_prompt;
pub use resolver::{CLARIFY_BELOW, IntentResolver, NOTICE_BELOW};

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language classifier adapter trait.

use async_trait::async_trait;

use crate::error::BrandbotError;

/// Optional natural-language completion service used for intent fallback.
///
/// The classifier is expected to return a small JSON object; any shape
/// violation is treated by the caller as a non-fatal failure and the
/// resolver degrades to its local heuristic.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Send a prompt and return the raw completion text.
    async fn classify(&self, prompt: &str) -> Result<String, BrandbotError>;
}

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Brandbot command pipeline.

use thiserror::Error;

/// The primary error type used across all Brandbot adapter traits and core
/// operations.
///
/// Variants map onto the pipeline's error taxonomy: configuration faults are
/// terminal and user-visible, `ChannelAccess` is the one recoverable delivery
/// class (the fallback chain matches on it), everything else channel-side is
/// terminal for the asset being delivered.
#[derive(Debug, Error)]
pub enum BrandbotError {
    /// Configuration errors (workspace missing, inactive, bad settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// The workspace id on an inbound command resolved to no known record.
    #[error("workspace not found: {workspace_id}")]
    WorkspaceNotFound { workspace_id: String },

    /// Per-workspace request ceiling reached for the current window.
    #[error("rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: chrono::DateTime<chrono::Utc> },

    /// Daily classifier quota (request count or cost) exhausted.
    #[error("quota exhausted: {reason}")]
    QuotaExhausted { reason: String },

    /// Access-class chat platform error (bot not in channel, missing scope).
    ///
    /// The delivery pipeline recovers from this class by falling back to the
    /// next tier; it is never surfaced to the user directly.
    #[error("channel access denied: {message}")]
    ChannelAccess { message: String },

    /// Any other chat platform error. Terminal for the asset being delivered.
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Asset store or storage-download errors.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Natural-language classifier errors (HTTP failure, malformed reply).
    /// Always non-fatal: the resolver degrades to the local heuristic.
    #[error("classifier error: {message}")]
    Classifier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BrandbotError {
    /// Whether this error is the recoverable access class that triggers the
    /// next delivery tier.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, BrandbotError::ChannelAccess { .. })
    }
}

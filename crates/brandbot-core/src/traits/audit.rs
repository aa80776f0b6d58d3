// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit persistence adapter trait.

use async_trait::async_trait;

use crate::error::BrandbotError;
use crate::types::AuditLogEntry;

/// External persistence for audit entries.
///
/// Persistence is best-effort: callers log sink failures and continue, so
/// audit writes can never fail a user-facing command.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn persist(&self, entry: &AuditLogEntry) -> Result<(), BrandbotError>;
}

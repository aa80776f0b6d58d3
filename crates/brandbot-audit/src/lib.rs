// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit logging for command outcomes.
//!
//! Every command produces exactly one audit entry at its completion point.
//! The entry is always emitted synchronously as a structured log line;
//! additionally, entries that resolved a valid tenant id are persisted to
//! the external store. Persistence failures are caught and logged, never
//! propagated: audit logging must never fail a user-facing command.

use std::sync::Arc;

use tracing::{info, warn};

use brandbot_core::traits::AuditSink;
use brandbot_core::types::AuditLogEntry;

/// Records command outcomes to the log and, best-effort, to the store.
pub struct AuditLogger {
    sink: Option<Arc<dyn AuditSink>>,
}

impl AuditLogger {
    pub fn new(sink: Option<Arc<dyn AuditSink>>) -> Self {
        Self { sink }
    }

    /// Log-only logger for deployments without an audit store.
    pub fn log_only() -> Self {
        Self { sink: None }
    }

    /// Record one entry: structured log line always, persistence when a
    /// tenant id was resolved and a sink is configured.
    pub async fn record(&self, entry: &AuditLogEntry) {
        info!(
            target: "audit",
            user = %entry.user_id.0,
            workspace = %entry.workspace_id.0,
            tenant = entry.tenant_id.map(|t| t.0),
            command = %entry.command,
            matched = entry.matched_asset_ids.len(),
            success = entry.success,
            error = entry.error.as_deref(),
            response_ms = entry.response_ms,
            "command audit"
        );

        let Some(ref sink) = self.sink else {
            return;
        };
        if entry.tenant_id.is_none() {
            // No well-formed tenant record was resolved; the entry stays
            // transient in the log.
            return;
        }
        if let Err(e) = sink.persist(entry).await {
            warn!(error = %e, workspace = %entry.workspace_id.0, "audit persistence failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_core::types::{AssetId, TenantId, UserId, WorkspaceId};
    use brandbot_test_utils::MockAuditSink;
    use chrono::Utc;

    fn entry(tenant_id: Option<i64>) -> AuditLogEntry {
        AuditLogEntry {
            user_id: UserId("U1".into()),
            workspace_id: WorkspaceId("W1".into()),
            tenant_id: tenant_id.map(TenantId),
            command: "logo dark".into(),
            matched_asset_ids: vec![AssetId(2)],
            success: true,
            error: None,
            response_ms: Some(420),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn persists_when_tenant_resolved() {
        let sink = Arc::new(MockAuditSink::new());
        let logger = AuditLogger::new(Some(sink.clone() as Arc<dyn AuditSink>));
        logger.record(&entry(Some(7))).await;
        assert_eq!(sink.entries().len(), 1);
        assert_eq!(sink.entries()[0].tenant_id, Some(TenantId(7)));
    }

    #[tokio::test]
    async fn skips_persistence_without_tenant() {
        let sink = Arc::new(MockAuditSink::new());
        let logger = AuditLogger::new(Some(sink.clone() as Arc<dyn AuditSink>));
        logger.record(&entry(None)).await;
        assert!(sink.entries().is_empty());
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn every_record_emits_the_audit_line() {
        let logger = AuditLogger::log_only();
        logger.record(&entry(None)).await;
        assert!(logs_contain("command audit"));
        assert!(logs_contain("W1"));
    }

    #[tokio::test]
    async fn sink_failure_is_swallowed() {
        let sink = Arc::new(MockAuditSink::new());
        sink.fail_persistence();
        let logger = AuditLogger::new(Some(sink as Arc<dyn AuditSink>));
        // Must not panic or propagate.
        logger.record(&entry(Some(7))).await;
    }

    #[tokio::test]
    async fn log_only_logger_records_without_sink() {
        let logger = AuditLogger::log_only();
        logger.record(&entry(Some(7))).await;
    }
}

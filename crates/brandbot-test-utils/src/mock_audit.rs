// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock audit sink capturing persisted entries.

use std::sync::Mutex;

use async_trait::async_trait;

use brandbot_core::BrandbotError;
use brandbot_core::traits::AuditSink;
use brandbot_core::types::AuditLogEntry;

/// In-memory audit sink; optionally scripted to fail every persist.
#[derive(Default)]
pub struct MockAuditSink {
    entries: Mutex<Vec<AuditLogEntry>>,
    fail: Mutex<bool>,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent persist fail with a storage error.
    pub fn fail_persistence(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for MockAuditSink {
    async fn persist(&self, entry: &AuditLogEntry) -> Result<(), BrandbotError> {
        if *self.fail.lock().unwrap() {
            return Err(BrandbotError::Storage {
                message: "mock sink persistence failure".into(),
                source: None,
            });
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

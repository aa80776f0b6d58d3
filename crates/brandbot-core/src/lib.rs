// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Brandbot command pipeline.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Brandbot workspace. The chat platform,
//! asset store, classifier, and audit store are external collaborators and
//! are only ever consumed through the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BrandbotError;
pub use types::{
    ActionButton, AssetCandidateSet, AssetCategory, AssetId, AssetRecord, AuditLogEntry,
    ChannelId, CommandInvocation, CommandResponse, DeliveryAttempt, DeliveryTier, Intent,
    IntentCategory, TenantId, UserId, Workspace, WorkspaceId,
};

pub use traits::{
    AssetStore, AuditSink, ChatClient, Clock, CommandResponder, DownloadOptions, IntentClassifier,
    SystemClock,
};

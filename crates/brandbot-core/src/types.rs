// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Brandbot command pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::BrandbotError;

/// Unique identifier for a chat workspace (one platform tenant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub String);

/// Unique identifier for a chat user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Unique identifier for a chat channel or direct conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// Numeric id of the backend client/tenant a workspace belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub i64);

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric id of a brand asset in the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub i64);

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One chat-platform tenant, loaded read-only from the external store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub tenant_id: TenantId,
    /// Encrypted bot credential. Decrypted by the chat client, opaque here.
    pub bot_credential: String,
    pub active: bool,
}

/// One inbound slash-style command, validated at the boundary and immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    /// Correlation id minted at intake, threaded through log lines.
    pub id: Uuid,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub channel_id: ChannelId,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl CommandInvocation {
    /// Validate raw platform fields into an invocation.
    ///
    /// All identifiers must be non-empty; the command text may be empty
    /// (an empty command resolves to a help/clarification path downstream).
    pub fn new(
        user_id: impl Into<String>,
        workspace_id: impl Into<String>,
        channel_id: impl Into<String>,
        text: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Result<Self, BrandbotError> {
        let user_id = user_id.into();
        let workspace_id = workspace_id.into();
        let channel_id = channel_id.into();
        if user_id.is_empty() || workspace_id.is_empty() || channel_id.is_empty() {
            return Err(BrandbotError::Config(
                "command invocation missing user, workspace, or channel id".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: UserId(user_id),
            workspace_id: WorkspaceId(workspace_id),
            channel_id: ChannelId(channel_id),
            text: text.into(),
            received_at,
        })
    }
}

/// Asset categories served by the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Logo,
    Color,
    Font,
}

impl AssetCategory {
    /// Whether assets of this category deliver as files (tiers 1-2 apply)
    /// or as text-only messages.
    pub fn delivers_files(&self) -> bool {
        matches!(self, AssetCategory::Logo)
    }
}

/// Structured interpretation of a free-text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Logo,
    Color,
    Font,
    Search,
    Help,
    Unknown,
}

impl IntentCategory {
    /// The asset category this intent looks up, if it is an asset lookup.
    pub fn asset_category(&self) -> Option<AssetCategory> {
        match self {
            IntentCategory::Logo => Some(AssetCategory::Logo),
            IntentCategory::Color => Some(AssetCategory::Color),
            IntentCategory::Font => Some(AssetCategory::Font),
            _ => None,
        }
    }
}

/// Result of resolving a command's text into an actionable intent.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub category: IntentCategory,
    /// Free-text qualifier narrowing the category ("dark", "brand", ...).
    pub variant: Option<String>,
    /// Resolver confidence in [0, 1].
    pub confidence: f32,
}

/// One brand asset as read from the external store.
///
/// `metadata` is the store's opaque JSON blob; it is decoded defensively in
/// exactly one place (`brandbot-match`) and never trusted to be well formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetId,
    pub name: String,
    pub category: AssetCategory,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Ordered candidate assets for an intent, with a flag recording whether
/// variant filtering actually narrowed the category or fell back to the
/// full list.
#[derive(Debug, Clone)]
pub struct AssetCandidateSet {
    pub assets: Vec<AssetRecord>,
    pub narrowed: bool,
}

/// The delivery mechanism attempted for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryTier {
    /// Tier 1: upload the file directly to the invoking channel.
    ChannelUpload,
    /// Tier 2: upload the file to a direct conversation with the user.
    DirectUpload,
    /// Tier 3: send a text message with the download link.
    DirectLink,
    /// Text-only delivery for non-file categories.
    Text,
}

/// Outcome of delivering one asset. Created and discarded within a single
/// pipeline run; only the aggregate feeds the summary message.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub asset_id: AssetId,
    pub tier: DeliveryTier,
    pub success: bool,
    pub failure: Option<String>,
}

/// Write-once record of one command's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    /// Present only when a well-formed workspace record was resolved;
    /// entries without it are logged transiently, never persisted.
    pub tenant_id: Option<TenantId>,
    pub command: String,
    pub matched_asset_ids: Vec<AssetId>,
    pub success: bool,
    pub error: Option<String>,
    pub response_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

/// A button-style follow-up action offered in an interactive response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub action_id: String,
    pub label: String,
    /// Opaque continuation token round-tripped through the platform.
    pub value: String,
}

/// Payload for the synchronous, time-boxed command reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResponse {
    pub text: String,
    #[serde(default)]
    pub actions: Vec<ActionButton>,
}

impl CommandResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }
}

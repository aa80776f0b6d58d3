// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform adapter traits.
//!
//! Two seams: [`ChatClient`] is workspace-scoped (uploads, messages, direct
//! conversations) and lives for the life of the process; [`CommandResponder`]
//! is invocation-scoped and carries the platform's time-boxed reply channel.

use async_trait::async_trait;

use crate::error::BrandbotError;
use crate::types::{ChannelId, CommandResponse, UserId};

/// Workspace-scoped chat platform operations used by the delivery pipeline.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Upload file bytes to a channel or direct conversation with a caption.
    ///
    /// Must return [`BrandbotError::ChannelAccess`] specifically when the bot
    /// lacks access to the target, so the fallback chain can distinguish the
    /// recoverable class from terminal upload failures.
    async fn upload_file(
        &self,
        target: &ChannelId,
        bytes: Vec<u8>,
        filename: &str,
        caption: &str,
    ) -> Result<(), BrandbotError>;

    /// Open (or reuse) a direct conversation with a user.
    async fn open_direct(&self, user: &UserId) -> Result<ChannelId, BrandbotError>;

    /// Post a plain text message to a channel.
    async fn post_message(&self, channel: &ChannelId, text: &str) -> Result<(), BrandbotError>;

    /// Post an ephemeral/private message visible only to one user.
    async fn post_private(
        &self,
        channel: &ChannelId,
        user: &UserId,
        text: &str,
    ) -> Result<(), BrandbotError>;
}

/// Invocation-scoped reply channel for one inbound command.
///
/// `acknowledge` must be the very first call made for any inbound command;
/// the platform enforces a hard response-time budget on it.
#[async_trait]
pub trait CommandResponder: Send + Sync {
    /// Acknowledge receipt within the platform's response-time budget.
    async fn acknowledge(&self) -> Result<(), BrandbotError>;

    /// Send the synchronous, time-boxed reply (text plus optional buttons).
    async fn respond(&self, payload: &CommandResponse) -> Result<(), BrandbotError>;
}

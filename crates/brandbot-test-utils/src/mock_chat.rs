// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat platform client for deterministic testing.
//!
//! `MockChat` captures every call for assertion and lets tests script
//! failures per target, including the access-class failures that drive the
//! delivery fallback chain.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brandbot_core::BrandbotError;
use brandbot_core::traits::{ChatClient, CommandResponder};
use brandbot_core::types::{ChannelId, CommandResponse, UserId};

/// One captured chat platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCall {
    Upload {
        target: ChannelId,
        filename: String,
        caption: String,
        byte_len: usize,
    },
    OpenDirect {
        user: UserId,
    },
    PostMessage {
        channel: ChannelId,
        text: String,
    },
    PostPrivate {
        channel: ChannelId,
        user: UserId,
        text: String,
    },
}

/// A scripted failure for a mock call target.
#[derive(Debug, Clone)]
pub struct ScriptedFailure {
    /// Fail with the recoverable access class (`ChannelAccess`) when true,
    /// otherwise with a terminal `Channel` error.
    pub access_class: bool,
    pub message: String,
}

impl ScriptedFailure {
    pub fn access(message: impl Into<String>) -> Self {
        Self {
            access_class: true,
            message: message.into(),
        }
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self {
            access_class: false,
            message: message.into(),
        }
    }

    fn to_error(&self) -> BrandbotError {
        if self.access_class {
            BrandbotError::ChannelAccess {
                message: self.message.clone(),
            }
        } else {
            BrandbotError::Channel {
                message: self.message.clone(),
                source: None,
            }
        }
    }
}

/// A mock chat client capturing calls and honoring scripted failures.
#[derive(Default)]
pub struct MockChat {
    calls: Arc<Mutex<Vec<ChatCall>>>,
    /// Upload failures keyed by target channel id.
    upload_failures: Mutex<HashMap<String, ScriptedFailure>>,
    /// Private/ephemeral post failures keyed by channel id.
    private_failures: Mutex<HashMap<String, ScriptedFailure>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next-and-all uploads to a channel to fail.
    pub fn fail_upload(&self, channel: &str, failure: ScriptedFailure) {
        self.upload_failures
            .lock()
            .unwrap()
            .insert(channel.to_string(), failure);
    }

    /// Script ephemeral/private posts to a channel to fail.
    pub fn fail_private(&self, channel: &str, failure: ScriptedFailure) {
        self.private_failures
            .lock()
            .unwrap()
            .insert(channel.to_string(), failure);
    }

    /// The direct-conversation channel id this mock opens for a user.
    pub fn direct_channel_for(user: &UserId) -> ChannelId {
        ChannelId(format!("D-{}", user.0))
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Captured uploads only, in call order.
    pub fn uploads(&self) -> Vec<ChatCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ChatCall::Upload { .. }))
            .collect()
    }

    /// Captured plain messages posted to the given channel.
    pub fn messages_to(&self, channel: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChatCall::PostMessage { channel: ch, text } if ch.0 == channel => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatClient for MockChat {
    async fn upload_file(
        &self,
        target: &ChannelId,
        bytes: Vec<u8>,
        filename: &str,
        caption: &str,
    ) -> Result<(), BrandbotError> {
        self.calls.lock().unwrap().push(ChatCall::Upload {
            target: target.clone(),
            filename: filename.to_string(),
            caption: caption.to_string(),
            byte_len: bytes.len(),
        });
        if let Some(failure) = self.upload_failures.lock().unwrap().get(&target.0) {
            return Err(failure.to_error());
        }
        Ok(())
    }

    async fn open_direct(&self, user: &UserId) -> Result<ChannelId, BrandbotError> {
        self.calls
            .lock()
            .unwrap()
            .push(ChatCall::OpenDirect { user: user.clone() });
        Ok(Self::direct_channel_for(user))
    }

    async fn post_message(&self, channel: &ChannelId, text: &str) -> Result<(), BrandbotError> {
        self.calls.lock().unwrap().push(ChatCall::PostMessage {
            channel: channel.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn post_private(
        &self,
        channel: &ChannelId,
        user: &UserId,
        text: &str,
    ) -> Result<(), BrandbotError> {
        self.calls.lock().unwrap().push(ChatCall::PostPrivate {
            channel: channel.clone(),
            user: user.clone(),
            text: text.to_string(),
        });
        if let Some(failure) = self.private_failures.lock().unwrap().get(&channel.0) {
            return Err(failure.to_error());
        }
        Ok(())
    }
}

/// A mock invocation responder capturing the acknowledgment and replies.
#[derive(Default)]
pub struct MockResponder {
    acknowledged: Mutex<bool>,
    responses: Mutex<Vec<CommandResponse>>,
}

impl MockResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_acknowledged(&self) -> bool {
        *self.acknowledged.lock().unwrap()
    }

    pub fn responses(&self) -> Vec<CommandResponse> {
        self.responses.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandResponder for MockResponder {
    async fn acknowledge(&self) -> Result<(), BrandbotError> {
        *self.acknowledged.lock().unwrap() = true;
        Ok(())
    }

    async fn respond(&self, payload: &CommandResponse) -> Result<(), BrandbotError> {
        self.responses.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_calls_in_order() {
        let chat = MockChat::new();
        let channel = ChannelId("C1".into());
        let user = UserId("U1".into());

        chat.upload_file(&channel, vec![1, 2, 3], "logo.png", "the logo")
            .await
            .unwrap();
        chat.post_message(&channel, "done").await.unwrap();
        let dm = chat.open_direct(&user).await.unwrap();

        assert_eq!(dm.0, "D-U1");
        assert_eq!(chat.call_count(), 3);
        assert_eq!(chat.uploads().len(), 1);
        assert_eq!(chat.messages_to("C1"), vec!["done".to_string()]);
    }

    #[tokio::test]
    async fn scripted_access_failure_is_access_class() {
        let chat = MockChat::new();
        chat.fail_upload("C1", ScriptedFailure::access("not_in_channel"));

        let err = chat
            .upload_file(&ChannelId("C1".into()), vec![], "a.png", "")
            .await
            .unwrap_err();
        assert!(err.is_access_denied());

        chat.fail_upload("C2", ScriptedFailure::terminal("file too large"));
        let err = chat
            .upload_file(&ChannelId("C2".into()), vec![], "a.png", "")
            .await
            .unwrap_err();
        assert!(!err.is_access_denied());
    }

    #[tokio::test]
    async fn responder_records_ack_and_replies() {
        let responder = MockResponder::new();
        assert!(!responder.was_acknowledged());
        responder.acknowledge().await.unwrap();
        responder
            .respond(&CommandResponse::text("hello"))
            .await
            .unwrap();
        assert!(responder.was_acknowledged());
        assert_eq!(responder.responses().len(), 1);
    }
}

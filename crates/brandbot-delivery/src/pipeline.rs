// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The asset delivery pipeline with its three-tier fallback chain.
//!
//! File assets are attempted in strict tier order, short-circuiting on
//! first success: channel upload → direct-message upload → direct-message
//! link. Only the distinguishable access-class error advances a tier; any
//! other failure is terminal for that asset. Non-file categories skip
//! tiers 1-2 and always deliver as text, ephemeral first with a
//! direct-message fallback.
//!
//! Per-asset attempts for one invocation run concurrently; `deliver`
//! returns only after every attempt has settled, which is the all-complete
//! barrier the summary message depends on.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::warn;

use brandbot_core::traits::{AssetStore, ChatClient, DownloadOptions};
use brandbot_core::types::{
    AssetRecord, ChannelId, DeliveryAttempt, DeliveryTier, TenantId, UserId,
};
use brandbot_core::BrandbotError;

use crate::fetch::AssetFetcher;
use crate::render;
use crate::summary::DeliveryOutcome;

/// Everything one pipeline run needs, captured per invocation.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub channel: ChannelId,
    pub user: UserId,
    pub tenant_id: TenantId,
    pub assets: Vec<AssetRecord>,
    /// Variant qualifier forwarded to storage download options.
    pub variant: Option<String>,
}

/// Executes deliveries against the chat platform and storage seams.
pub struct DeliveryPipeline {
    chat: Arc<dyn ChatClient>,
    store: Arc<dyn AssetStore>,
    fetcher: AssetFetcher,
}

impl DeliveryPipeline {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        store: Arc<dyn AssetStore>,
    ) -> Result<Self, BrandbotError> {
        Ok(Self {
            chat,
            store,
            fetcher: AssetFetcher::new()?,
        })
    }

    /// Deliver all assets in the request, concurrently, and settle.
    ///
    /// There is no ordering requirement between assets; the returned
    /// outcome is complete (every asset has exactly one attempt record).
    pub async fn deliver(self: &Arc<Self>, request: DeliveryRequest) -> DeliveryOutcome {
        let mut set = JoinSet::new();
        for asset in request.assets.clone() {
            let pipeline = Arc::clone(self);
            let request = request.clone();
            set.spawn(async move { pipeline.deliver_one(asset, &request).await });
        }

        let mut attempts = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(attempt) => attempts.push(attempt),
                Err(e) => warn!(error = %e, "delivery task panicked"),
            }
        }

        // A panicked task produced no record; synthesize a failed attempt
        // so every asset still has exactly one and the summary adds up.
        for asset in &request.assets {
            if !attempts.iter().any(|a| a.asset_id == asset.id) {
                let tier = if asset.category.delivers_files() {
                    DeliveryTier::ChannelUpload
                } else {
                    DeliveryTier::Text
                };
                attempts.push(DeliveryAttempt {
                    asset_id: asset.id,
                    tier,
                    success: false,
                    failure: Some("delivery task aborted".to_string()),
                });
            }
        }
        DeliveryOutcome { attempts }
    }

    async fn deliver_one(&self, asset: AssetRecord, request: &DeliveryRequest) -> DeliveryAttempt {
        if asset.category.delivers_files() {
            self.deliver_file(asset, request).await
        } else {
            self.deliver_text(asset, request).await
        }
    }

    /// File delivery: tiers 1-3 in strict order.
    async fn deliver_file(&self, asset: AssetRecord, request: &DeliveryRequest) -> DeliveryAttempt {
        let opts = DownloadOptions {
            variant: request.variant.clone(),
            ..DownloadOptions::default()
        };
        let url = self.store.download_url(asset.id, request.tenant_id, &opts);

        let fetched = match self.fetcher.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(e) => return failed(&asset, DeliveryTier::ChannelUpload, &e),
        };

        let caption = render::caption_for(&asset);
        let filename = render::filename_for(&asset, fetched.extension());

        // Tier 1: upload into the invoking channel.
        match self
            .chat
            .upload_file(&request.channel, fetched.bytes.clone(), &filename, &caption)
            .await
        {
            Ok(()) => return succeeded(&asset, DeliveryTier::ChannelUpload),
            Err(e) if e.is_access_denied() => {
                warn!(asset = %asset.id, channel = %request.channel.0, "channel upload denied, falling back to DM");
            }
            Err(e) => return failed(&asset, DeliveryTier::ChannelUpload, &e),
        }

        // Tier 2: upload into a direct conversation.
        let dm = match self.chat.open_direct(&request.user).await {
            Ok(dm) => dm,
            Err(e) => return failed(&asset, DeliveryTier::DirectUpload, &e),
        };
        let dm_caption = format!(
            "{caption}\nI couldn't post in <#{}> — invite me there to get files in-channel.",
            request.channel.0
        );
        match self
            .chat
            .upload_file(&dm, fetched.bytes, &filename, &dm_caption)
            .await
        {
            Ok(()) => return succeeded(&asset, DeliveryTier::DirectUpload),
            Err(e) if e.is_access_denied() => {
                warn!(asset = %asset.id, "DM upload denied, falling back to link");
            }
            Err(e) => return failed(&asset, DeliveryTier::DirectUpload, &e),
        }

        // Tier 3: text message with the direct download link.
        match self
            .chat
            .post_message(&dm, &render::link_message(&asset, &url))
            .await
        {
            Ok(()) => succeeded(&asset, DeliveryTier::DirectLink),
            Err(e) => failed(&asset, DeliveryTier::DirectLink, &e),
        }
    }

    /// Text delivery for colors and fonts: ephemeral first, DM fallback.
    async fn deliver_text(&self, asset: AssetRecord, request: &DeliveryRequest) -> DeliveryAttempt {
        let block = render::text_block_for(&asset);

        match self
            .chat
            .post_private(&request.channel, &request.user, &block)
            .await
        {
            Ok(()) => return succeeded(&asset, DeliveryTier::Text),
            Err(e) => {
                warn!(asset = %asset.id, error = %e, "ephemeral post rejected, falling back to DM");
            }
        }

        let dm = match self.chat.open_direct(&request.user).await {
            Ok(dm) => dm,
            Err(e) => return failed(&asset, DeliveryTier::Text, &e),
        };
        match self.chat.post_message(&dm, &block).await {
            Ok(()) => succeeded(&asset, DeliveryTier::Text),
            Err(e) => failed(&asset, DeliveryTier::Text, &e),
        }
    }
}

fn succeeded(asset: &AssetRecord, tier: DeliveryTier) -> DeliveryAttempt {
    DeliveryAttempt {
        asset_id: asset.id,
        tier,
        success: true,
        failure: None,
    }
}

fn failed(asset: &AssetRecord, tier: DeliveryTier, error: &BrandbotError) -> DeliveryAttempt {
    DeliveryAttempt {
        asset_id: asset.id,
        tier,
        success: false,
        failure: Some(error.to_string()),
    }
}

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP fetch of an asset's renderable form from the storage download URL.

use std::time::Duration;

use tracing::debug;

use brandbot_core::BrandbotError;

/// Bytes plus content type as fetched from storage.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl FetchedAsset {
    /// File extension inferred from the content type, defaulting to "png".
    pub fn extension(&self) -> &str {
        match self.content_type.as_str() {
            "image/svg+xml" => "svg",
            "image/jpeg" => "jpg",
            "application/pdf" => "pdf",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

/// Plain HTTP GET fetcher for storage download URLs.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
}

impl AssetFetcher {
    pub fn new() -> Result<Self, BrandbotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| BrandbotError::Storage {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    /// Fetch the bytes behind a storage download URL.
    pub async fn fetch(&self, url: &str) -> Result<FetchedAsset, BrandbotError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BrandbotError::Storage {
                message: format!("asset download failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrandbotError::Storage {
                message: format!("asset download returned {status}"),
                source: None,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BrandbotError::Storage {
                message: format!("asset download body failed: {e}"),
                source: Some(Box::new(e)),
            })?
            .to_vec();

        debug!(len = bytes.len(), content_type = %content_type, "asset fetched");
        Ok(FetchedAsset {
            bytes,
            content_type,
        })
    }
}

// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asset store adapter trait.
//!
//! The relational store of workspaces and assets is an external collaborator;
//! this subsystem only reads from it through this seam.

use async_trait::async_trait;

use crate::error::BrandbotError;
use crate::types::{AssetCategory, AssetId, AssetRecord, TenantId, Workspace, WorkspaceId};

/// Options for building a storage download URL.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub format: Option<String>,
    pub variant: Option<String>,
    pub size: Option<String>,
}

/// Read-only access to workspaces and brand assets.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Load a workspace record by its platform id. `None` when unknown.
    async fn workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, BrandbotError>;

    /// Fetch all assets of one category for a tenant, in store order.
    async fn fetch_by_category(
        &self,
        tenant_id: TenantId,
        category: AssetCategory,
    ) -> Result<Vec<AssetRecord>, BrandbotError>;

    /// Build the storage download URL for an asset's renderable form.
    /// The delivery pipeline fetches it with a plain HTTP GET.
    fn download_url(&self, asset_id: AssetId, tenant_id: TenantId, opts: &DownloadOptions)
    -> String;
}

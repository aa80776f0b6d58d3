// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock asset store with fixture workspaces and assets.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use brandbot_core::BrandbotError;
use brandbot_core::traits::{AssetStore, DownloadOptions};
use brandbot_core::types::{
    AssetCategory, AssetId, AssetRecord, TenantId, Workspace, WorkspaceId,
};

/// In-memory asset store for tests.
pub struct MockAssets {
    workspaces: Mutex<HashMap<WorkspaceId, Workspace>>,
    assets: Mutex<HashMap<(i64, AssetCategory), Vec<AssetRecord>>>,
    download_base: Mutex<String>,
}

impl Default for MockAssets {
    fn default() -> Self {
        Self {
            workspaces: Mutex::new(HashMap::new()),
            assets: Mutex::new(HashMap::new()),
            download_base: Mutex::new("https://storage.test".to_string()),
        }
    }
}

impl MockAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point download URLs at a test server (e.g. wiremock).
    pub fn set_download_base(&self, base: &str) {
        *self.download_base.lock().unwrap() = base.trim_end_matches('/').to_string();
    }

    /// Register an active workspace mapped to a tenant.
    pub fn add_workspace(&self, id: &str, tenant_id: i64, active: bool) {
        let workspace = Workspace {
            id: WorkspaceId(id.to_string()),
            tenant_id: TenantId(tenant_id),
            bot_credential: "enc:test-credential".to_string(),
            active,
        };
        self.workspaces
            .lock()
            .unwrap()
            .insert(workspace.id.clone(), workspace);
    }

    /// Add one asset to a tenant's category, preserving insertion order.
    pub fn add_asset(
        &self,
        tenant_id: i64,
        category: AssetCategory,
        id: i64,
        name: &str,
        metadata: serde_json::Value,
    ) {
        self.assets
            .lock()
            .unwrap()
            .entry((tenant_id, category))
            .or_default()
            .push(AssetRecord {
                id: AssetId(id),
                name: name.to_string(),
                category,
                metadata,
            });
    }
}

#[async_trait]
impl AssetStore for MockAssets {
    async fn workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, BrandbotError> {
        Ok(self.workspaces.lock().unwrap().get(id).cloned())
    }

    async fn fetch_by_category(
        &self,
        tenant_id: TenantId,
        category: AssetCategory,
    ) -> Result<Vec<AssetRecord>, BrandbotError> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .get(&(tenant_id.0, category))
            .cloned()
            .unwrap_or_default())
    }

    fn download_url(
        &self,
        asset_id: AssetId,
        tenant_id: TenantId,
        opts: &DownloadOptions,
    ) -> String {
        let mut url = format!(
            "{}/tenants/{}/assets/{}",
            self.download_base.lock().unwrap(),
            tenant_id.0,
            asset_id.0
        );
        if let Some(ref format) = opts.format {
            url.push_str(&format!("?format={format}"));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixtures_round_trip() {
        let store = MockAssets::new();
        store.add_workspace("W1", 7, true);
        store.add_asset(
            7,
            AssetCategory::Logo,
            1,
            "Primary Logo",
            serde_json::json!({"variant": "standard"}),
        );

        let ws = store
            .workspace(&WorkspaceId("W1".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ws.tenant_id, TenantId(7));
        assert!(ws.active);

        let assets = store
            .fetch_by_category(TenantId(7), AssetCategory::Logo)
            .await
            .unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "Primary Logo");

        let url = store.download_url(AssetId(1), TenantId(7), &DownloadOptions::default());
        assert!(url.contains("/tenants/7/assets/1"));
    }
}

//! Emby notification client.
//!
//! Tells a configured Emby server about pointer files the reconciler just
//! touched so the library picks them up without waiting for a full scan.
//! Strictly best effort: a run never fails because Emby is down.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::models::{Change, ItemPath};

/// Scope of a per-item refresh: metadata-only, no directory rescan, and
/// nothing already in Emby is replaced.
const ITEM_REFRESH_PARAMS: [(&str, &str); 5] = [
    ("Recursive", "false"),
    ("ImageRefreshMode", "FullRefresh"),
    ("MetadataRefreshMode", "FullRefresh"),
    ("ReplaceAllImages", "false"),
    ("ReplaceAllMetadata", "false"),
];

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(rename = "Items", default)]
    items: Vec<EmbyItem>,
}

#[derive(Debug, Deserialize)]
struct EmbyItem {
    #[serde(rename = "Id")]
    id: String,
}

/// Translate a managed path into the path Emby sees on its host.
///
/// When a host mapping is configured for the path's root, the container
/// root is swapped for the host root; otherwise the container path is used
/// as-is.
pub fn map_host_path(config: &Config, path: &ItemPath) -> PathBuf {
    match config.host_root(path.root) {
        Some(host) => host.join(&path.relative),
        None => config.root_dir(path.root).join(&path.relative),
    }
}

/// Emby API client, present only when both server URL and API key are
/// configured.
pub struct EmbyNotifier {
    http: Client,
    base_url: String,
    api_key: String,
}

impl EmbyNotifier {
    pub fn from_config(config: &Config) -> Option<Self> {
        let server = config.emby_server_url.as_deref()?;
        let api_key = config.emby_api_key.as_deref()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            http,
            base_url: server.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Notify Emby about a single change. New files trigger a library
    /// refresh of their parent folder; updated files refresh the specific
    /// item, falling back to a parent refresh when Emby does not know the
    /// path yet. Removals and unchanged items are not announced.
    pub async fn notify(&self, config: &Config, change: &Change) {
        match change {
            Change::Created(path) => {
                self.refresh_parent(config, path).await;
            }
            Change::Updated { path, .. } => {
                let host_path = map_host_path(config, path);
                match self.find_item_id(&host_path).await {
                    Ok(Some(id)) => {
                        if let Err(e) = self.refresh_item(&id).await {
                            warn!("Failed to refresh Emby item {}: {}", id, e);
                        }
                    }
                    Ok(None) => {
                        debug!("Emby has no item for {}, refreshing parent", path);
                        self.refresh_parent(config, path).await;
                    }
                    Err(e) => {
                        warn!("Emby item lookup failed for {}: {}", path, e);
                    }
                }
            }
            Change::Unchanged(_) | Change::RemovedOrphan(_) => {}
        }
    }

    async fn refresh_parent(&self, config: &Config, path: &ItemPath) {
        let host_path = map_host_path(config, path);
        let Some(parent) = host_path.parent() else {
            return;
        };
        if let Err(e) = self.refresh_library_path(&parent.to_string_lossy()).await {
            warn!("Emby library refresh failed for {}: {}", path, e);
        }
    }

    /// Resolve the Emby item id for a host path, `None` when unknown.
    async fn find_item_id(&self, host_path: &std::path::Path) -> Result<Option<String>> {
        let url = format!("{}/emby/Items", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("X-Emby-Token", &self.api_key)
            .query(&[
                ("Path", host_path.to_string_lossy().as_ref()),
                ("Recursive", "false"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ItemsResponse = response.json().await?;
        Ok(body.items.into_iter().next().map(|item| item.id))
    }

    async fn refresh_item(&self, item_id: &str) -> Result<()> {
        let url = format!("{}/emby/Items/{}/Refresh", self.base_url, item_id);
        self.http
            .post(&url)
            .header("X-Emby-Token", &self.api_key)
            .query(&ITEM_REFRESH_PARAMS)
            .send()
            .await?
            .error_for_status()?;
        debug!("Emby item {} refreshed", item_id);
        Ok(())
    }

    async fn refresh_library_path(&self, host_path: &str) -> Result<()> {
        let url = format!("{}/emby/Library/Refresh", self.base_url);
        self.http
            .post(&url)
            .header("X-Emby-Token", &self.api_key)
            .query(&[("Path", host_path), ("Recursive", "true")])
            .send()
            .await?
            .error_for_status()?;
        debug!("Emby library refresh triggered for {}", host_path);
        Ok(())
    }
}

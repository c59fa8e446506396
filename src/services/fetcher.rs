use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::{Result, SyncError};

/// HTTP client for downloading the source playlist.
///
/// Network errors and 429 responses are retried with exponential backoff;
/// other HTTP failures are mapped to friendly messages and surfaced as
/// [`SyncError::Fetch`].
pub struct PlaylistFetcher {
    client: Client,
    max_retries: u32,
}

impl PlaylistFetcher {
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_retries: config.max_retries,
        }
    }

    /// Download the playlist body as text.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.fetch_with_retry(url).await?;

        if let Some(len) = response.content_length() {
            tracing::info!("Playlist size: {:.2} MB", len as f64 / 1024.0 / 1024.0);
        }

        response
            .text()
            .await
            .map_err(|e| SyncError::Fetch(e.to_string()))
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            match self.client.get(url).send().await {
                Ok(resp) => {
                    if resp.status().is_success() {
                        return Ok(resp);
                    }

                    let status = resp.status();
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                        let backoff_ms = (1u64 << attempt).saturating_mul(500).min(10_000);
                        tracing::warn!("fetch_retry" = attempt + 1, "reason" = "429", "backoff_ms" = backoff_ms);
                        sleep(Duration::from_millis(backoff_ms)).await;
                        continue;
                    }

                    let friendly: String = match status {
                        reqwest::StatusCode::NOT_FOUND => {
                            "playlist not found (404), check the URL".to_string()
                        }
                        reqwest::StatusCode::FORBIDDEN => {
                            "access denied (403), the playlist may require authentication".to_string()
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            "too many requests (429), the playlist server is rate limiting".to_string()
                        }
                        _ => {
                            let reason = status
                                .canonical_reason()
                                .map(|s| s.to_string())
                                .unwrap_or_else(|| "error".to_string());
                            format!("HTTP {}: {}", status.as_u16(), reason)
                        }
                    };

                    return Err(SyncError::Fetch(friendly));
                }
                Err(err) => {
                    last_err = Some(err);
                    if attempt < self.max_retries {
                        let backoff_ms = (1u64 << attempt).saturating_mul(500).min(10_000);
                        tracing::warn!("fetch_retry" = attempt + 1, "reason" = "network", "backoff_ms" = backoff_ms);
                        sleep(Duration::from_millis(backoff_ms)).await;
                        continue;
                    }
                }
            }
        }

        match last_err {
            Some(e) => Err(SyncError::Fetch(e.to_string())),
            None => Err(SyncError::Fetch("unknown fetch error".to_string())),
        }
    }
}

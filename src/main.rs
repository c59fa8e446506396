use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u2strm::config::Config;
use m3u2strm::services::fetcher::PlaylistFetcher;
use m3u2strm::services::sync::run_sync;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "m3u2strm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Starting m3u2strm v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Movies dir: {}", config.movies_dir.display());
    tracing::info!("Series dir: {}", config.series_dir.display());
    tracing::info!("Live TV dir: {}", config.livetv_dir.display());
    tracing::info!("Emby notification enabled: {}", config.notification_enabled());

    let url = config
        .m3u_url
        .clone()
        .context("M3U_URL must be set")?;

    let fetcher = PlaylistFetcher::from_config(&config);

    // With no interval configured this is a one-shot run, for cron-style
    // scheduling; otherwise loop forever with a fixed pause between runs.
    loop {
        match fetcher.fetch(&url).await {
            Ok(text) => {
                if let Err(e) = run_sync(&config, &text).await {
                    tracing::error!("Sync failed: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Playlist download failed: {}", e);
            }
        }

        if config.interval_seconds == 0 {
            break;
        }
        tracing::info!("Waiting {} seconds until next update", config.interval_seconds);
        tokio::time::sleep(Duration::from_secs(config.interval_seconds)).await;
    }

    Ok(())
}

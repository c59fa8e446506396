use std::env;
use std::path::{Path, PathBuf};

use crate::models::ContentRoot;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Playlist source
    pub m3u_url: Option<String>,

    // Managed library roots
    pub movies_dir: PathBuf,
    pub series_dir: PathBuf,
    pub livetv_dir: PathBuf,

    // Reconciliation
    pub remove_files: bool,
    pub cleanup_empty_dirs: bool,
    /// Movies + episodes processed per run; 0 = unlimited.
    pub max_items_per_run: usize,

    // Scheduler
    pub interval_seconds: u64,

    // Emby notification (both url and key required to enable)
    pub emby_server_url: Option<String>,
    pub emby_api_key: Option<String>,

    // Container-root -> host-root mapping per content kind
    pub emby_movies_path: Option<PathBuf>,
    pub emby_series_path: Option<PathBuf>,
    pub emby_livetv_path: Option<PathBuf>,

    // Classification
    pub live_group_keywords: Vec<String>,

    // Fetcher
    pub fetch_timeout_ms: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            m3u_url: env::var("M3U_URL").ok(),

            movies_dir: env::var("MOVIES_DIR")
                .unwrap_or_else(|_| "/usr/src/app/movies".to_string())
                .into(),
            series_dir: env::var("SERIES_DIR")
                .unwrap_or_else(|_| "/usr/src/app/series".to_string())
                .into(),
            livetv_dir: env::var("LIVETV_DIR")
                .unwrap_or_else(|_| "/usr/src/app/livetv".to_string())
                .into(),

            remove_files: env_bool("REMOVE_FILES", false),
            cleanup_empty_dirs: env_bool("CLEANUP_EMPTY_DIRS", env_bool("REMOVE_FILES", false)),

            max_items_per_run: env::var("MAX_ITEMS_PER_RUN")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap_or(0),

            interval_seconds: env::var("INTERVAL_SECONDS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap_or(0),

            emby_server_url: env::var("EMBY_SERVER_URL").ok(),
            emby_api_key: env::var("EMBY_API_KEY").ok(),

            emby_movies_path: env::var("EMBY_MOVIES_PATH").ok().map(PathBuf::from),
            emby_series_path: env::var("EMBY_SERIES_PATH").ok().map(PathBuf::from),
            emby_livetv_path: env::var("EMBY_LIVETV_PATH").ok().map(PathBuf::from),

            live_group_keywords: env::var("LIVE_GROUP_KEYWORDS")
                .map(|v| parse_keywords(&v))
                .unwrap_or_else(|_| default_live_keywords()),

            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "300000".to_string())
                .parse()
                .unwrap_or(300_000), // 5 minutes

            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),

            // Use VLC user agent to avoid IPTV server blocks
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "VLC/3.0.20 LibVLC/3.0.20".to_string()),
        }
    }

    /// Absolute directory for a content kind.
    pub fn root_dir(&self, root: ContentRoot) -> &Path {
        match root {
            ContentRoot::Movies => &self.movies_dir,
            ContentRoot::Series => &self.series_dir,
            ContentRoot::LiveTv => &self.livetv_dir,
        }
    }

    /// Host-path mapping for a content kind, when configured.
    pub fn host_root(&self, root: ContentRoot) -> Option<&Path> {
        match root {
            ContentRoot::Movies => self.emby_movies_path.as_deref(),
            ContentRoot::Series => self.emby_series_path.as_deref(),
            ContentRoot::LiveTv => self.emby_livetv_path.as_deref(),
        }
    }

    pub fn notification_enabled(&self) -> bool {
        self.emby_server_url.is_some() && self.emby_api_key.is_some()
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(default)
}

fn parse_keywords(raw: &str) -> Vec<String> {
    let keywords: Vec<String> = raw
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        default_live_keywords()
    } else {
        keywords
    }
}

fn default_live_keywords() -> Vec<String> {
    ["live", "tv channels", "iptv", "24/7"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

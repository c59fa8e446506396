use std::collections::BTreeMap;
use std::fs;

use walkdir::WalkDir;

use crate::config::Config;
use crate::models::{ContentRoot, ItemPath};
use crate::services::paths::{LIVETV_FILE, STRM_EXT};

/// Snapshot of the materialized tree, taken once before any writes.
///
/// The tree itself is the only durable state; there is no database to
/// desynchronize from. Pointer paths map to their stored stream URL.
#[derive(Debug, Default)]
pub struct Inventory {
    pub pointers: BTreeMap<ItemPath, String>,
    /// Raw content of the aggregated live playlist, if it exists.
    pub live_playlist: Option<String>,
}

/// Enumerate every pointer file under the managed movie/series roots plus
/// the aggregated live playlist. Unreadable pointer files are kept with
/// empty content so they surface as `Updated` instead of aborting the scan.
pub fn scan(config: &Config) -> Inventory {
    let mut pointers = BTreeMap::new();

    for root in [ContentRoot::Movies, ContentRoot::Series] {
        let base = config.root_dir(root);
        if !base.exists() {
            continue;
        }
        for entry in WalkDir::new(base).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some(STRM_EXT) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(base) else {
                continue;
            };
            let stored_url = match fs::read_to_string(entry.path()) {
                Ok(content) => content.trim().to_string(),
                Err(e) => {
                    tracing::warn!("Unreadable pointer file {}: {}", entry.path().display(), e);
                    String::new()
                }
            };
            pointers.insert(ItemPath::new(root, relative), stored_url);
        }
    }

    let live_playlist = fs::read_to_string(config.livetv_dir.join(LIVETV_FILE)).ok();

    tracing::debug!(
        "Inventory: {} pointer file(s), live playlist present: {}",
        pointers.len(),
        live_playlist.is_some()
    );

    Inventory {
        pointers,
        live_playlist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_config(base: &Path) -> Config {
        Config {
            m3u_url: None,
            movies_dir: base.join("movies"),
            series_dir: base.join("series"),
            livetv_dir: base.join("livetv"),
            remove_files: false,
            cleanup_empty_dirs: false,
            max_items_per_run: 0,
            interval_seconds: 0,
            emby_server_url: None,
            emby_api_key: None,
            emby_movies_path: None,
            emby_series_path: None,
            emby_livetv_path: None,
            live_group_keywords: vec!["live".to_string()],
            fetch_timeout_ms: 1000,
            max_retries: 0,
            user_agent: "test".to_string(),
        }
    }

    #[test]
    fn test_scan_missing_roots() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let inv = scan(&config);
        assert!(inv.pointers.is_empty());
        assert!(inv.live_playlist.is_none());
    }

    #[test]
    fn test_scan_collects_strm_files() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());

        let movie_dir = config.movies_dir.join("Movie (2020)");
        fs::create_dir_all(&movie_dir).unwrap();
        fs::write(movie_dir.join("Movie (2020).strm"), "http://a\n").unwrap();

        let season_dir = config.series_dir.join("Show/Season 1");
        fs::create_dir_all(&season_dir).unwrap();
        fs::write(season_dir.join("S01E01.strm"), "http://b").unwrap();

        // Non-strm files are ignored
        fs::write(movie_dir.join("notes.txt"), "ignored").unwrap();

        let inv = scan(&config);
        assert_eq!(inv.pointers.len(), 2);
        assert_eq!(
            inv.pointers
                .get(&ItemPath::new(
                    ContentRoot::Movies,
                    "Movie (2020)/Movie (2020).strm"
                ))
                .map(String::as_str),
            Some("http://a")
        );
        assert_eq!(
            inv.pointers
                .get(&ItemPath::new(ContentRoot::Series, "Show/Season 1/S01E01.strm"))
                .map(String::as_str),
            Some("http://b")
        );
    }

    #[test]
    fn test_scan_reads_live_playlist() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        fs::create_dir_all(&config.livetv_dir).unwrap();
        fs::write(config.livetv_dir.join(LIVETV_FILE), "#EXTM3U\n").unwrap();

        let inv = scan(&config);
        assert_eq!(inv.live_playlist.as_deref(), Some("#EXTM3U\n"));
    }
}

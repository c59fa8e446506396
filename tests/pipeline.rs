//! End-to-end runs of the sync pipeline against a temporary library tree.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use m3u2strm::config::Config;
use m3u2strm::error::SyncError;
use m3u2strm::services::sync::run_sync;

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
        live_group_keywords: vec![
            "live".to_string(),
            "tv channels".to_string(),
            "iptv".to_string(),
        ],
        fetch_timeout_ms: 1000,
        max_retries: 0,
        user_agent: "test".to_string(),
    }
}

const PLAYLIST: &str = "\
#EXTM3U
#EXTINF:-1 tvg-name=\"EN - Movie Name (2023)\" group-title=\"Films\",EN - Movie Name (2023)
http://example.com/movie/1
#EXTINF:-1 tvg-name=\"Series Name (2023) S01E01\" group-title=\"Series\",Series Name S01E01
http://example.com/series/1
#EXTINF:-1 tvg-name=\"Series Name (2023) S01E02\" group-title=\"Series\",Series Name S01E02
http://example.com/series/2
#EXTINF:-1 tvg-name=\"Globo HD\" group-title=\"Live TV\",Globo HD
http://example.com/live/1
";

#[tokio::test]
async fn full_playlist_materializes_the_tree() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let report = run_sync(&config, PLAYLIST).await.unwrap();
    assert_eq!(report.parsed, 4);
    assert_eq!(report.movies, 1);
    assert_eq!(report.episodes, 2);
    assert_eq!(report.live_channels, 1);
    // 3 pointer files + 1 aggregated live playlist
    assert_eq!(report.created, 4);
    assert!(report.is_clean());

    let movie = config
        .movies_dir
        .join("Movie Name (2023)/Movie Name (2023).strm");
    assert_eq!(
        fs::read_to_string(&movie).unwrap(),
        "http://example.com/movie/1"
    );

    let e1 = config
        .series_dir
        .join("Series Name (2023)/Season 1/S01E01.strm");
    let e2 = config
        .series_dir
        .join("Series Name (2023)/Season 1/S01E02.strm");
    assert_eq!(fs::read_to_string(&e1).unwrap(), "http://example.com/series/1");
    assert_eq!(fs::read_to_string(&e2).unwrap(), "http://example.com/series/2");

    let live = fs::read_to_string(config.livetv_dir.join("livetv.m3u")).unwrap();
    assert!(live.starts_with("#EXTM3U\n"));
    assert!(live.contains("Globo HD"));
    assert!(live.contains("http://example.com/live/1"));
}

#[tokio::test]
async fn second_run_is_a_noop() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    run_sync(&config, PLAYLIST).await.unwrap();
    let report = run_sync(&config, PLAYLIST).await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.removed, 0);
    assert_eq!(report.unchanged, 4);
    assert!(report.changes.is_empty());
}

#[tokio::test]
async fn changed_url_rewrites_only_that_pointer() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    run_sync(&config, PLAYLIST).await.unwrap();

    let changed = PLAYLIST.replace("http://example.com/movie/1", "http://example.com/movie/1-new");
    let report = run_sync(&config, &changed).await.unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.unchanged, 3);

    let movie = config
        .movies_dir
        .join("Movie Name (2023)/Movie Name (2023).strm");
    assert_eq!(
        fs::read_to_string(&movie).unwrap(),
        "http://example.com/movie/1-new"
    );
}

#[tokio::test]
async fn missing_header_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let result = run_sync(&config, "#EXTINF:-1 tvg-name=\"A\",A\nhttp://x\n").await;
    assert!(matches!(result, Err(SyncError::Format(_))));
    assert!(!config.movies_dir.exists());
}

#[tokio::test]
async fn cap_spreads_work_across_runs() {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(tmp.path());
    config.max_items_per_run = 2;

    // Run 1: two pointers created, one deferred; the live file is exempt
    let report = run_sync(&config, PLAYLIST).await.unwrap();
    assert_eq!(report.created, 3);
    assert_eq!(report.deferred, 1);
    assert!(config.livetv_dir.join("livetv.m3u").exists());

    // Run 2: the unchanged pointers pass the cap for free
    let report = run_sync(&config, PLAYLIST).await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.deferred, 0);

    let report = run_sync(&config, PLAYLIST).await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.unchanged, 4);
}

#[tokio::test]
async fn orphans_removed_and_dirs_pruned_when_enabled() {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(tmp.path());
    config.remove_files = true;
    config.cleanup_empty_dirs = true;

    run_sync(&config, PLAYLIST).await.unwrap();
    let movie_dir = config.movies_dir.join("Movie Name (2023)");
    assert!(movie_dir.exists());

    // Drop the movie from the playlist
    let without_movie: String = PLAYLIST
        .lines()
        .skip(3)
        .map(|l| format!("{}\n", l))
        .collect::<String>();
    let playlist = format!("#EXTM3U\n{}", without_movie);

    let report = run_sync(&config, &playlist).await.unwrap();
    assert_eq!(report.removed, 1);
    assert!(!movie_dir.exists());

    // Everything still desired survives
    assert!(config
        .series_dir
        .join("Series Name (2023)/Season 1/S01E01.strm")
        .exists());
}

#[tokio::test]
async fn orphans_survive_when_removal_disabled() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    run_sync(&config, PLAYLIST).await.unwrap();
    let report = run_sync(&config, "#EXTM3U\n").await.unwrap();
    assert_eq!(report.removed, 0);
    assert!(config
        .movies_dir
        .join("Movie Name (2023)/Movie Name (2023).strm")
        .exists());
}

#[tokio::test]
async fn deferred_items_never_deleted() {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(tmp.path());
    config.remove_files = true;

    // Materialize everything first, then constrain later runs
    run_sync(&config, PLAYLIST).await.unwrap();
    config.max_items_per_run = 1;

    // All four entries change URL; only one write lands per run, but
    // nothing desired is ever treated as an orphan
    let changed = PLAYLIST.replace("http://example.com/", "http://mirror.example.com/");
    let report = run_sync(&config, &changed).await.unwrap();
    assert!(report.deferred > 0);
    assert_eq!(report.removed, 0);
    assert!(config
        .series_dir
        .join("Series Name (2023)/Season 1/S01E02.strm")
        .exists());
}

#[tokio::test]
async fn malformed_entries_are_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let playlist = "\
#EXTM3U
#EXTINF:-1 tvg-name=\"No Url Entry\",No Url Entry
#EXTINF:-1 tvg-name=\"Good Movie (2020)\" group-title=\"Films\",Good Movie (2020)
http://example.com/movie/9
";
    let report = run_sync(&config, playlist).await.unwrap();
    assert_eq!(report.parsed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.created, 1);
    assert!(config
        .movies_dir
        .join("Good Movie (2020)/Good Movie (2020).strm")
        .exists());
}

#[tokio::test]
async fn unsafe_titles_are_sanitized_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let playlist = "\
#EXTM3U
#EXTINF:-1 tvg-name=\"Movie: The/Sequel? (2021)\" group-title=\"Films\",Movie: The/Sequel? (2021)
http://example.com/movie/7
";
    run_sync(&config, playlist).await.unwrap();
    assert!(config
        .movies_dir
        .join("Movie TheSequel (2021)/Movie TheSequel (2021).strm")
        .exists());
}

#[tokio::test]
async fn fully_unsafe_title_stays_idempotent() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let playlist = "\
#EXTM3U
#EXTINF:-1 tvg-name=\"???\" group-title=\"Films\",???
http://example.com/movie/8
";
    let report = run_sync(&config, playlist).await.unwrap();
    assert_eq!(report.created, 1);
    assert!(config.movies_dir.join("Unknown/Unknown.strm").exists());

    // The scan must pick the placeholder back up on the next run
    let report = run_sync(&config, playlist).await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.unchanged, 1);
    assert!(report.changes.is_empty());
}

#[tokio::test]
async fn live_only_playlist_touches_only_livetv() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let playlist = "\
#EXTM3U
#EXTINF:-1 tvg-name=\"News 24\" group-title=\"IPTV\",News 24
http://example.com/live/5
";
    let report = run_sync(&config, playlist).await.unwrap();
    assert_eq!(report.created, 1);
    assert!(config.livetv_dir.join("livetv.m3u").exists());
    assert!(!config.movies_dir.exists());
    assert!(!config.series_dir.exists());
}

#[tokio::test]
async fn duplicate_paths_last_entry_wins() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let playlist = "\
#EXTM3U
#EXTINF:-1 tvg-name=\"Movie Name (2023)\" group-title=\"Films\",Movie Name (2023)
http://example.com/movie/first
#EXTINF:-1 tvg-name=\"Movie: Name (2023)\" group-title=\"Films\",Movie: Name (2023)
http://example.com/movie/second
";
    let report = run_sync(&config, playlist).await.unwrap();
    assert_eq!(report.created, 1);

    let file: PathBuf = config
        .movies_dir
        .join("Movie Name (2023)/Movie Name (2023).strm");
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "http://example.com/movie/second"
    );
}

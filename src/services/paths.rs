use std::path::PathBuf;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ContentRoot, ItemPath, MediaItem};

/// Pointer file extension.
pub const STRM_EXT: &str = "strm";
/// Name of the aggregated live-TV playlist inside the livetv root.
pub const LIVETV_FILE: &str = "livetv.m3u";

lazy_static! {
    /// Everything outside the filesystem-safe set is deleted, not substituted.
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9 ()\-_.]").unwrap();
    static ref MULTI_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Strip filesystem-unsafe characters, collapse runs of spaces, trim.
pub fn sanitize(name: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(name, "");
    MULTI_SPACE.replace_all(&cleaned, " ").trim().to_string()
}

/// Deterministic relative path for a classified item.
///
/// Live channels have no per-item path; they render into the aggregated
/// playlist instead, so this returns `None` for them.
pub fn item_path(item: &MediaItem) -> Option<ItemPath> {
    match item {
        MediaItem::Movie { title, year, .. } => {
            let folder = titled_folder(title, *year);
            let relative = PathBuf::from(&folder).join(format!("{}.{}", folder, STRM_EXT));
            Some(ItemPath::new(ContentRoot::Movies, relative))
        }
        MediaItem::Episode {
            series,
            year,
            season,
            episode,
            ..
        } => {
            let relative = PathBuf::from(titled_folder(series, *year))
                .join(format!("Season {}", season))
                .join(format!("S{:02}E{:02}.{}", season, episode, STRM_EXT));
            Some(ItemPath::new(ContentRoot::Series, relative))
        }
        MediaItem::LiveChannel { .. } => None,
    }
}

/// Location of the aggregated live playlist.
pub fn live_playlist_path() -> ItemPath {
    ItemPath::new(ContentRoot::LiveTv, LIVETV_FILE)
}

/// Folder name for a title, with a placeholder when sanitization deletes
/// every character. An empty name would derive the bare dot-file `.strm`,
/// which the inventory scan cannot see, breaking idempotence.
fn titled_folder(title: &str, year: Option<u16>) -> String {
    let mut base = sanitize(title);
    if base.is_empty() {
        base = "Unknown".to_string();
    }
    match year {
        Some(y) => format!("{} ({})", base, y),
        None => base,
    }
}

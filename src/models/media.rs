use std::path::PathBuf;

/// One playlist record as parsed from the M3U document: display metadata
/// plus the stream URL. Produced and consumed within a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    /// Category hint from `group-title`, may be empty.
    pub group: String,
    pub url: String,
}

/// Result of stripping decorations from a display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTitle {
    pub title: String,
    pub year: Option<u16>,
    /// Present only when an S##E## code was found (always paired with `episode`).
    pub season: Option<u8>,
    pub episode: Option<u16>,
}

/// A classified playlist entry. Exactly one kind per entry; `Episode`
/// carries mandatory season/episode numbers so downstream code never has
/// to re-check field presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    Movie {
        title: String,
        year: Option<u16>,
        url: String,
    },
    Episode {
        series: String,
        year: Option<u16>,
        season: u8,
        episode: u16,
        url: String,
    },
    LiveChannel {
        name: String,
        group: String,
        url: String,
    },
}

impl MediaItem {
    pub fn url(&self) -> &str {
        match self {
            MediaItem::Movie { url, .. } => url,
            MediaItem::Episode { url, .. } => url,
            MediaItem::LiveChannel { url, .. } => url,
        }
    }
}

/// Which managed directory tree a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentRoot {
    Movies,
    Series,
    LiveTv,
}

impl std::fmt::Display for ContentRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentRoot::Movies => write!(f, "movies"),
            ContentRoot::Series => write!(f, "series"),
            ContentRoot::LiveTv => write!(f, "livetv"),
        }
    }
}

/// A managed file location: root kind + path relative to that root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemPath {
    pub root: ContentRoot,
    pub relative: PathBuf,
}

impl ItemPath {
    pub fn new(root: ContentRoot, relative: impl Into<PathBuf>) -> Self {
        Self {
            root,
            relative: relative.into(),
        }
    }
}

impl std::fmt::Display for ItemPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.root, self.relative.display())
    }
}

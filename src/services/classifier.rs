use crate::models::{MediaItem, RawEntry};
use crate::services::title::normalize_title;

/// Content classifier for playlist entries.
///
/// Decision order favors structural evidence over category hints: an
/// episode code in the display name always wins, then the group label is
/// checked against the live-category keyword set, and everything else is a
/// movie. A title carrying "S01E02" is an episode even when its group says
/// "Live TV".
pub struct Classifier {
    live_keywords: Vec<String>,
}

impl Classifier {
    pub fn new(live_keywords: &[String]) -> Self {
        Self {
            live_keywords: live_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn classify(&self, entry: &RawEntry) -> MediaItem {
        let parsed = normalize_title(&entry.name);

        if let (Some(season), Some(episode)) = (parsed.season, parsed.episode) {
            return MediaItem::Episode {
                series: parsed.title,
                year: parsed.year,
                season,
                episode,
                url: entry.url.clone(),
            };
        }

        if self.is_live_group(&entry.group) {
            return MediaItem::LiveChannel {
                name: entry.name.clone(),
                group: entry.group.clone(),
                url: entry.url.clone(),
            };
        }

        MediaItem::Movie {
            title: parsed.title,
            year: parsed.year,
            url: entry.url.clone(),
        }
    }

    /// Case-insensitive substring match against the configured marker set.
    fn is_live_group(&self, group: &str) -> bool {
        if group.is_empty() {
            return false;
        }
        let lower = group.to_lowercase();
        self.live_keywords.iter().any(|k| lower.contains(k))
    }
}

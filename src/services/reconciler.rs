use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Change, ItemPath, MediaItem, RunReport};
use crate::services::inventory::Inventory;
use crate::services::paths::{item_path, live_playlist_path};

/// Everything the playlist says should exist, in parse order.
///
/// Movies and episodes are keyed by their derived path; a later entry that
/// maps to the same path replaces the earlier one in place (last wins,
/// original position kept, so the cap ordering stays stable). Live channels
/// accumulate separately in encounter order.
#[derive(Debug, Default)]
pub struct DesiredState {
    items: Vec<(ItemPath, MediaItem)>,
    index: HashMap<ItemPath, usize>,
    live: Vec<MediaItem>,
}

impl DesiredState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: MediaItem) {
        match item_path(&item) {
            Some(path) => {
                if let Some(&pos) = self.index.get(&path) {
                    self.items[pos].1 = item;
                } else {
                    self.index.insert(path.clone(), self.items.len());
                    self.items.push((path, item));
                }
            }
            None => self.live.push(item),
        }
    }

    pub fn contains(&self, path: &ItemPath) -> bool {
        self.index.contains_key(path)
    }

    pub fn movie_count(&self) -> usize {
        self.items
            .iter()
            .filter(|(_, i)| matches!(i, MediaItem::Movie { .. }))
            .count()
    }

    pub fn episode_count(&self) -> usize {
        self.items
            .iter()
            .filter(|(_, i)| matches!(i, MediaItem::Episode { .. }))
            .count()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Diff the desired set against the scanned tree and apply the difference.
///
/// Pass order: movies/episodes in parse order, then the aggregated live
/// playlist, then orphan removal. The change list preserves that encounter
/// order. A failed write is warned and counted, never fatal; the item stays
/// in its prior state and is retried on the next run.
pub fn reconcile(config: &Config, desired: &DesiredState, existing: &Inventory) -> RunReport {
    let mut report = RunReport {
        movies: desired.movie_count(),
        episodes: desired.episode_count(),
        live_channels: desired.live_count(),
        ..RunReport::default()
    };

    let cap = config.max_items_per_run;
    let mut processed = 0usize;

    for (path, item) in &desired.items {
        let url = item.url();
        match existing.pointers.get(path) {
            Some(stored) if stored == url => {
                report.unchanged += 1;
            }
            Some(stored) => {
                if cap != 0 && processed >= cap {
                    report.deferred += 1;
                    continue;
                }
                if write_pointer(config, path, url, &mut report) {
                    processed += 1;
                    report.updated += 1;
                    report.changes.push(Change::Updated {
                        path: path.clone(),
                        old_url: stored.clone(),
                        new_url: url.to_string(),
                    });
                }
            }
            None => {
                if cap != 0 && processed >= cap {
                    report.deferred += 1;
                    continue;
                }
                if write_pointer(config, path, url, &mut report) {
                    processed += 1;
                    report.created += 1;
                    report.changes.push(Change::Created(path.clone()));
                }
            }
        }
    }

    reconcile_live(config, desired, existing, &mut report);

    if config.remove_files {
        remove_orphans(config, desired, existing, &mut report);
    }

    report
}

/// The aggregated live playlist is diffed as a whole file, exempt from the
/// cap. When the playlist has no live channels the existing file is left
/// alone.
fn reconcile_live(
    config: &Config,
    desired: &DesiredState,
    existing: &Inventory,
    report: &mut RunReport,
) {
    if desired.live.is_empty() {
        return;
    }

    let rendered = render_live_playlist(&desired.live);
    let path = live_playlist_path();

    match &existing.live_playlist {
        Some(stored) if *stored == rendered => {
            report.unchanged += 1;
        }
        Some(stored) => {
            if write_pointer(config, &path, &rendered, report) {
                report.updated += 1;
                report.changes.push(Change::Updated {
                    path,
                    old_url: stored.clone(),
                    new_url: rendered,
                });
            }
        }
        None => {
            if write_pointer(config, &path, &rendered, report) {
                report.created += 1;
                report.changes.push(Change::Created(path));
            }
        }
    }
}

/// Orphans are existing paths absent from the FULL desired set. Items that
/// were merely deferred by the cap are in the desired set and therefore
/// never removed here.
fn remove_orphans(
    config: &Config,
    desired: &DesiredState,
    existing: &Inventory,
    report: &mut RunReport,
) {
    for path in existing.pointers.keys() {
        if desired.contains(path) {
            continue;
        }
        let absolute = config.root_dir(path.root).join(&path.relative);
        match fs::remove_file(&absolute) {
            Ok(()) => {
                tracing::info!("Removed orphan {}", path);
                report.removed += 1;
                report.changes.push(Change::RemovedOrphan(path.clone()));
            }
            Err(e) => {
                tracing::warn!("Failed to remove orphan {}: {}", path, e);
                report.write_failures += 1;
            }
        }
    }
}

/// Render the aggregated playlist: header plus one metadata/URL pair per
/// channel, encounter order. A display name from the post-comma title
/// fallback can itself contain double quotes, which would break the
/// quoted attribute syntax, so they are stripped from attribute values.
fn render_live_playlist(channels: &[MediaItem]) -> String {
    let mut out = String::from("#EXTM3U\n");
    for channel in channels {
        if let MediaItem::LiveChannel { name, group, url } = channel {
            let name_attr = name.replace('"', "");
            let group_attr = group.replace('"', "");
            out.push_str(&format!(
                "#EXTINF:-1 tvg-name=\"{}\" group-title=\"{}\",{}\n{}\n",
                name_attr, group_attr, name_attr, url
            ));
        }
    }
    out
}

fn write_pointer(config: &Config, path: &ItemPath, content: &str, report: &mut RunReport) -> bool {
    let absolute = config.root_dir(path.root).join(&path.relative);
    match try_write(&absolute, content) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", path, e);
            report.write_failures += 1;
            false
        }
    }
}

fn try_write(absolute: &Path, content: &str) -> Result<()> {
    if let Some(parent) = absolute.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(absolute, content)?;
    Ok(())
}

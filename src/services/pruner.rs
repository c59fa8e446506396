//! Empty-directory pruning after orphan removal.
//!
//! Deleting pointer files leaves behind their title and season folders;
//! this walks the managed roots deepest-first and removes every directory
//! with nothing left inside it.

use std::fs;

use walkdir::WalkDir;

use crate::config::Config;
use crate::models::ContentRoot;

/// Remove empty directories under the movie and series roots. The roots
/// themselves and the livetv root are never touched. Returns the number of
/// directories removed; failures are warned and skipped.
pub fn prune_empty_dirs(config: &Config) -> usize {
    let mut removed = 0;

    for root in [ContentRoot::Movies, ContentRoot::Series] {
        let base = config.root_dir(root);
        if !base.exists() {
            continue;
        }
        // contents_first yields children before parents, so a chain of
        // nested empty directories collapses in one pass
        for entry in WalkDir::new(base)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            if !is_empty_dir(entry.path()) {
                continue;
            }
            match fs::remove_dir(entry.path()) {
                Ok(()) => {
                    tracing::info!("Removed empty directory {}", entry.path().display());
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to remove {}: {}", entry.path().display(), e);
                }
            }
        }
    }

    removed
}

fn is_empty_dir(path: &std::path::Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

//! One full synchronization pass: parse, classify, diff, apply, notify.

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::RunReport;
use crate::services::classifier::Classifier;
use crate::services::inventory;
use crate::services::notifier::EmbyNotifier;
use crate::services::parser::EntryParser;
use crate::services::pruner::prune_empty_dirs;
use crate::services::reconciler::{reconcile, DesiredState};

/// Synchronize the managed tree with an already-downloaded playlist.
///
/// Idempotent: running twice over the same playlist leaves the tree
/// untouched the second time. Only a missing `#EXTM3U` header is fatal;
/// individual bad entries and failed writes degrade the run, never abort
/// it.
pub async fn run_sync(config: &Config, playlist_text: &str) -> Result<RunReport> {
    let mut parser = EntryParser::new(playlist_text)?;
    let classifier = Classifier::new(&config.live_group_keywords);

    let mut desired = DesiredState::new();
    let mut parsed = 0usize;
    for entry in parser.by_ref() {
        parsed += 1;
        desired.insert(classifier.classify(&entry));
    }
    let skipped = parser.skipped();

    info!(
        "Parsed {} entr(ies) ({} skipped): {} movie(s), {} episode(s), {} live channel(s)",
        parsed,
        skipped,
        desired.movie_count(),
        desired.episode_count(),
        desired.live_count()
    );

    let existing = inventory::scan(config);

    let mut report = reconcile(config, &desired, &existing);
    report.parsed = parsed;
    report.skipped = skipped;

    if let Some(notifier) = EmbyNotifier::from_config(config) {
        for change in &report.changes {
            notifier.notify(config, change).await;
        }
    }

    if config.cleanup_empty_dirs {
        prune_empty_dirs(config);
    }

    info!("{}", report.summary());
    Ok(report)
}

use crate::models::ItemPath;

/// One filesystem-level difference found during reconciliation.
///
/// `Unchanged` items are counted in the run report but never appear in the
/// change list; the notifier only ever sees `Created` and `Updated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Created(ItemPath),
    Updated {
        path: ItemPath,
        old_url: String,
        new_url: String,
    },
    Unchanged(ItemPath),
    RemovedOrphan(ItemPath),
}

impl Change {
    pub fn path(&self) -> &ItemPath {
        match self {
            Change::Created(path) => path,
            Change::Updated { path, .. } => path,
            Change::Unchanged(path) => path,
            Change::RemovedOrphan(path) => path,
        }
    }
}

/// Outcome of a single sync run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub parsed: usize,
    /// Entries dropped by the parser (missing URL line or display name).
    pub skipped: usize,
    pub movies: usize,
    pub episodes: usize,
    pub live_channels: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
    /// Desired items left for a later run because the per-run cap was hit.
    pub deferred: usize,
    pub write_failures: usize,
    /// Non-`Unchanged` changes in diff-pass encounter order.
    pub changes: Vec<Change>,
}

impl RunReport {
    pub fn summary(&self) -> String {
        format!(
            "{} parsed ({} skipped), {} created, {} updated, {} unchanged, {} removed, {} deferred, {} write failures",
            self.parsed,
            self.skipped,
            self.created,
            self.updated,
            self.unchanged,
            self.removed,
            self.deferred,
            self.write_failures
        )
    }

    pub fn is_clean(&self) -> bool {
        self.write_failures == 0
    }
}

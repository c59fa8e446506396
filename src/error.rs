use thiserror::Error;

/// Error taxonomy for a sync run.
///
/// Only document-level failures are fatal. Per-entry parse anomalies and
/// per-item write failures are counted in the run report instead of being
/// raised, so a single bad record never aborts the pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The playlist document is structurally unreadable (missing header).
    #[error("invalid playlist format: {0}")]
    Format(String),

    /// The playlist could not be downloaded.
    #[error("failed to fetch playlist: {0}")]
    Fetch(String),

    /// Filesystem failure outside the per-item write path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An Emby request failed. Always caught and logged by the pipeline.
    #[error("emby request failed: {0}")]
    Notify(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;

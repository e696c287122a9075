//! Error types for startercode-sync.

use std::path::PathBuf;

use thiserror::Error;

use startercode_fetch::FetchError;
use startercode_renderer::RenderError;

/// All errors that abort a generator run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The catalog could not be fetched or parsed.
    #[error("catalog error: {0}")]
    Fetch(#[from] FetchError),

    /// An error from the rendering engine that affects every dataset
    /// (template loading, index rendering).
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

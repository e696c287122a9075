//! Error types for startercode-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (index page).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// A rendered notebook was not valid JSON.
    #[error("rendered notebook for {identifier} is not valid JSON: {source}")]
    Notebook {
        identifier: String,
        #[source]
        source: serde_json::Error,
    },

    /// The notebook template has no `{{ DISTRIBUTION }}` code cell.
    #[error("notebook template has no {{{{ DISTRIBUTION }}}} cell (dataset {identifier})")]
    MissingDistributionCell { identifier: String },

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

//! Error types for startercode-fetch.

use thiserror::Error;

/// All errors that can arise while fetching metadata.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint could not be reached, or the connection broke mid-body.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The endpoint answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not the JSON shape we expect.
    #[error("malformed metadata from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// `true` for unreachable endpoints and non-2xx answers.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network { .. } | FetchError::Status { .. })
    }
}

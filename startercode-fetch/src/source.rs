//! Metadata sources: the [`MetadataSource`] seam and its HTTP implementation.

use std::io::Read;
use std::time::Duration;

use startercode_core::config::DatashopConfig;
use startercode_core::DatasetRecord;

use crate::error::FetchError;
use crate::parse::{self, CatalogEntry};

/// Per-request timeout for [`HttpSource`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can list datasets and resolve one dataset's detail record.
pub trait MetadataSource {
    /// Fetch the full catalog. Entries are validated later, one by one.
    fn catalog(&self) -> Result<Vec<CatalogEntry>, FetchError>;

    /// Resolve the detail record for a catalog entry.
    fn detail(&self, entry: &CatalogEntry) -> Result<DatasetRecord, FetchError>;
}

/// Blocking HTTP source backed by a shared [`ureq::Agent`].
///
/// Each call makes exactly one request; there is no retry.
pub struct HttpSource {
    agent: ureq::Agent,
    catalog_url: String,
    detail_url: Option<String>,
}

impl HttpSource {
    /// `detail_url`, when set, is a prefix to which the identifier is appended.
    pub fn new(catalog_url: impl Into<String>, detail_url: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(&format!("startercode/{}", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            catalog_url: catalog_url.into(),
            detail_url,
        }
    }

    pub fn from_config(datashop: &DatashopConfig) -> Self {
        Self::new(datashop.metadata_link.clone(), datashop.detail_link.clone())
    }

    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    fn get<T>(
        &self,
        url: &str,
        parse: impl FnOnce(Box<dyn Read>) -> Result<T, serde_json::Error>,
    ) -> Result<T, FetchError> {
        tracing::debug!(url, "GET");
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                })
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(FetchError::Network {
                    url: url.to_string(),
                    message: t.to_string(),
                })
            }
        };
        let body: Box<dyn Read> = Box::new(response.into_reader());
        parse(body).map_err(|e| {
            if e.is_io() {
                FetchError::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            } else {
                FetchError::Parse {
                    url: url.to_string(),
                    source: e,
                }
            }
        })
    }
}

impl MetadataSource for HttpSource {
    fn catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        tracing::info!("fetching catalog from {}", self.catalog_url);
        self.get(&self.catalog_url, parse::parse_catalog)
    }

    /// With a detail endpoint, `GET {prefix}{identifier}`. Without one, the
    /// catalog entry itself is the record.
    fn detail(&self, entry: &CatalogEntry) -> Result<DatasetRecord, FetchError> {
        let parse_err = |url: &str, source| FetchError::Parse {
            url: url.to_string(),
            source,
        };
        match &self.detail_url {
            Some(prefix) => {
                let identifier = entry
                    .require_identifier()
                    .map_err(|e| parse_err(&self.catalog_url, e))?;
                let url = format!("{prefix}{identifier}");
                self.get(&url, parse::parse_detail)
            }
            None => entry.to_record().map_err(|e| parse_err(&self.catalog_url, e)),
        }
    }
}

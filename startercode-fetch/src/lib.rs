//! # startercode-fetch
//!
//! Metadata retrieval from a data shop API.
//!
//! [`HttpSource`] issues one blocking GET per call and maps failures onto
//! [`FetchError`]: unreachable endpoints and non-2xx answers are network
//! errors, bodies that are not the expected JSON are parse errors.

pub mod error;
pub mod parse;
pub mod source;

pub use error::FetchError;
pub use parse::CatalogEntry;
pub use source::{HttpSource, MetadataSource};

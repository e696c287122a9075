//! Startercode core library — data shop domain types, catalog shaping, config.
//!
//! - [`types`] — identifiers, dataset and distribution records, output formats
//! - [`catalog`] — distribution filtering and identifier ordering
//! - [`config`] — YAML configuration with defaults
//! - [`error`] — [`ConfigError`]

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{display_value, DatasetRecord, Distribution, Identifier, OutputFormat};

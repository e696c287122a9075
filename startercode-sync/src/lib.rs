//! # startercode-sync
//!
//! Output writer and generator orchestration.
//!
//! Call [`pipeline::run`] to fetch the catalog, render every enabled format
//! and write the output tree, or [`pipeline::plan`] + [`diff::diff_plan`]
//! to preview the changes without writing.

pub mod diff;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use diff::{diff_plan, FileDiff};
pub use error::SyncError;
pub use pipeline::{ApplyOptions, Datasets, GenerateReport, Plan, SkippedDataset};
pub use writer::{write_file, WriteResult};

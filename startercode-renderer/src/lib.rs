//! # startercode-renderer
//!
//! Turns data shop metadata into starter-code documents.
//!
//! Per-dataset templates use plain `{{ NAME }}` placeholders (see
//! [`placeholder`]); unknown names are left as they are. The index README is
//! a Tera template fed with an [`IndexContext`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Local;
//! use startercode_core::{Config, DatasetRecord, OutputFormat};
//! use startercode_renderer::{DatasetContext, Renderer};
//!
//! fn render_one(record: &DatasetRecord, config: &Config) {
//!     if let Ok(renderer) = Renderer::embedded() {
//!         let ctx = DatasetContext::from_record(record, config, Local::now().naive_local());
//!         if let Ok(notebook) = renderer.render_dataset(&ctx, OutputFormat::Python) {
//!             println!("{} bytes", notebook.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod placeholder;

pub use context::{DatasetContext, IndexContext};
pub use engine::{Renderer, TemplateSet};
pub use error::RenderError;
pub use placeholder::Placeholders;

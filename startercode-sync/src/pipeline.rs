//! Generator pipeline: fetch → shape → render → write.
//!
//! [`plan`] does all network and rendering work without touching the output
//! tree; [`apply`] writes a plan. [`run`] chains both and is the entry point
//! used by `startercode generate`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use startercode_core::{catalog, Config, DatasetRecord, Identifier, OutputFormat};
use startercode_fetch::{CatalogEntry, MetadataSource};
use startercode_renderer::{DatasetContext, IndexContext, Renderer};

use crate::error::SyncError;
use crate::writer::{self, WriteResult};

/// File name of the index, relative to the output root.
pub const INDEX_FILE: &str = "README.md";

/// What a planned file is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Dataset {
        identifier: Identifier,
        format: OutputFormat,
    },
    Index,
}

/// A rendered file waiting to be written.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub content: String,
    pub kind: FileKind,
}

/// A dataset (or one of its formats) left out of the run.
#[derive(Debug, Clone)]
pub struct SkippedDataset {
    pub identifier: Identifier,
    /// `None` when the whole dataset was dropped (detail fetch failed).
    pub format: Option<OutputFormat>,
    pub reason: String,
}

/// Everything one run would write.
#[derive(Debug, Clone)]
pub struct Plan {
    pub output_root: PathBuf,
    pub formats: Vec<OutputFormat>,
    /// Datasets listed in the index.
    pub dataset_count: usize,
    /// Datasets dropped for lacking a matching distribution.
    pub excluded_count: usize,
    pub files: Vec<PlannedFile>,
    pub skipped: Vec<SkippedDataset>,
}

impl Plan {
    /// Planned per-dataset files (everything but the index).
    pub fn dataset_files(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files
            .iter()
            .filter(|f| matches!(f.kind, FileKind::Dataset { .. }))
    }
}

/// Knobs for [`apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
    /// Remove per-dataset files this run did not produce.
    pub prune: bool,
}

/// Result of a full [`run`].
#[derive(Debug)]
pub struct GenerateReport {
    pub dataset_count: usize,
    pub excluded_count: usize,
    pub skipped: Vec<SkippedDataset>,
    pub writes: Vec<WriteResult>,
}

/// Enabled formats, de-duplicated in configured order.
fn enabled_formats(config: &Config) -> Vec<OutputFormat> {
    let mut seen = HashSet::new();
    config
        .formats
        .iter()
        .copied()
        .filter(|f| seen.insert(*f))
        .collect()
}

/// `<output>/<format dir>/<identifier>.<ext>`
pub fn dataset_path(config: &Config, identifier: &Identifier, format: OutputFormat) -> PathBuf {
    config
        .paths
        .output
        .join(config.paths.format_dir(format))
        .join(format!("{}.{}", identifier.file_stem(), format.extension()))
}

/// Datasets a run works on: fetched, filtered and sorted.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub records: Vec<DatasetRecord>,
    /// Datasets dropped for lacking a matching distribution.
    pub excluded_count: usize,
    /// Catalog entries whose detail could not be fetched or parsed.
    pub skipped: Vec<SkippedDataset>,
}

/// Resolve every catalog entry to a record. Failures are logged and
/// recorded, never fatal.
fn fetch_details(
    source: &dyn MetadataSource,
    entries: Vec<CatalogEntry>,
    skipped: &mut Vec<SkippedDataset>,
) -> Vec<DatasetRecord> {
    let mut details = Vec::with_capacity(entries.len());
    for entry in entries {
        match source.detail(&entry) {
            Ok(detail) => details.push(detail),
            Err(e) => {
                tracing::warn!("skipping dataset {}: {e}", entry.label());
                skipped.push(SkippedDataset {
                    identifier: Identifier::from(entry.label()),
                    format: None,
                    reason: e.to_string(),
                });
            }
        }
    }
    details
}

/// Fetch the catalog and every detail, then keep and order the datasets
/// that offer the configured distribution format.
///
/// A failing catalog aborts; failing entries are skipped.
pub fn datasets(source: &dyn MetadataSource, config: &Config) -> Result<Datasets, SyncError> {
    let entries = source.catalog()?;
    tracing::info!("catalog lists {} datasets", entries.len());

    let mut skipped = Vec::new();
    let details = fetch_details(source, entries, &mut skipped);
    let fetched = details.len();
    let records = catalog::prepare(details, &config.datashop.distribution_format);
    let excluded_count = fetched - records.len();
    tracing::info!(
        "found {} datasets with {} distributions ({} excluded)",
        records.len(),
        config.datashop.distribution_format,
        excluded_count
    );
    Ok(Datasets {
        records,
        excluded_count,
        skipped,
    })
}

/// Fetch and render everything for one run. Nothing is written.
///
/// A failing catalog aborts; failing datasets are skipped.
pub fn plan(
    source: &dyn MetadataSource,
    renderer: &Renderer,
    config: &Config,
    generated_at: NaiveDateTime,
) -> Result<Plan, SyncError> {
    let formats = enabled_formats(config);
    let Datasets {
        records,
        excluded_count,
        mut skipped,
    } = datasets(source, config)?;

    let mut files = Vec::with_capacity(records.len() * formats.len() + 1);
    for record in &records {
        let ctx = DatasetContext::from_record(record, config, generated_at);
        for format in &formats {
            match renderer.render_dataset(&ctx, *format) {
                Ok(content) => files.push(PlannedFile {
                    path: dataset_path(config, &record.identifier, *format),
                    content,
                    kind: FileKind::Dataset {
                        identifier: record.identifier.clone(),
                        format: *format,
                    },
                }),
                Err(e) => {
                    tracing::warn!("skipping {format} output for {}: {e}", record.identifier);
                    skipped.push(SkippedDataset {
                        identifier: record.identifier.clone(),
                        format: Some(*format),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    let index = IndexContext::from_records(&records, config, &formats, generated_at);
    files.push(PlannedFile {
        path: index_path(&config.paths.output),
        content: renderer.render_index(&index)?,
        kind: FileKind::Index,
    });

    Ok(Plan {
        output_root: config.paths.output.clone(),
        formats,
        dataset_count: records.len(),
        excluded_count,
        files,
        skipped,
    })
}

/// Write a plan: per-dataset files first, the index last, then prune.
///
/// The first write failure aborts.
pub fn apply(plan: &Plan, config: &Config, options: ApplyOptions) -> Result<Vec<WriteResult>, SyncError> {
    let mut writes = Vec::with_capacity(plan.files.len());
    for file in plan.dataset_files() {
        writes.push(writer::write_file(&file.path, &file.content, options.dry_run)?);
    }
    for file in plan.files.iter().filter(|f| f.kind == FileKind::Index) {
        writes.push(writer::write_file(&file.path, &file.content, options.dry_run)?);
    }

    if options.prune {
        let keep = prune_keep_set(plan, config);
        for format in &plan.formats {
            let dir = plan.output_root.join(config.paths.format_dir(*format));
            writes.extend(writer::prune_dir(&dir, format.extension(), &keep, options.dry_run)?);
        }
    }

    Ok(writes)
}

/// Paths prune must leave alone: everything planned, plus the existing
/// outputs of skipped datasets so a transient failure does not delete them.
fn prune_keep_set(plan: &Plan, config: &Config) -> HashSet<PathBuf> {
    let mut keep: HashSet<PathBuf> = plan.files.iter().map(|f| f.path.clone()).collect();
    for skip in &plan.skipped {
        let formats = match skip.format {
            Some(format) => vec![format],
            None => plan.formats.clone(),
        };
        for format in formats {
            keep.insert(dataset_path(config, &skip.identifier, format));
        }
    }
    keep
}

/// Build the renderer described by `config` (embedded templates plus
/// overrides from `paths.templates`).
pub fn renderer_for(config: &Config) -> Result<Renderer, SyncError> {
    Ok(Renderer::new(config.paths.templates.as_deref(), &config.templates)?)
}

/// Plan and apply in one go.
pub fn run(
    source: &dyn MetadataSource,
    config: &Config,
    generated_at: NaiveDateTime,
    options: ApplyOptions,
) -> Result<GenerateReport, SyncError> {
    let renderer = renderer_for(config)?;
    let plan = plan(source, &renderer, config, generated_at)?;
    let writes = apply(&plan, config, options)?;
    Ok(GenerateReport {
        dataset_count: plan.dataset_count,
        excluded_count: plan.excluded_count,
        skipped: plan.skipped,
        writes,
    })
}

/// Path of the index file for `output_root`.
pub fn index_path(output_root: &Path) -> PathBuf {
    output_root.join(INDEX_FILE)
}

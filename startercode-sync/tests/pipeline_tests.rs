//! End-to-end generator runs against an in-memory metadata source.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use startercode_core::{Config, DatasetRecord, OutputFormat};
use startercode_fetch::{CatalogEntry, FetchError, MetadataSource};
use startercode_sync::{
    diff_plan,
    pipeline::{self, ApplyOptions, FileKind},
    SyncError, WriteResult,
};
use tempfile::TempDir;

struct FakeSource {
    catalog: Result<Vec<Value>, u16>,
    broken_details: HashSet<String>,
}

impl FakeSource {
    fn new(records: Vec<Value>) -> Self {
        Self {
            catalog: Ok(records),
            broken_details: HashSet::new(),
        }
    }

    fn with_broken_detail(mut self, id: &str) -> Self {
        self.broken_details.insert(id.to_string());
        self
    }
}

impl MetadataSource for FakeSource {
    fn catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        match &self.catalog {
            Ok(records) => Ok(records
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, raw)| CatalogEntry::new(i, raw))
                .collect()),
            Err(status) => Err(FetchError::Status {
                url: "http://fake/catalog.json".into(),
                status: *status,
            }),
        }
    }

    fn detail(&self, entry: &CatalogEntry) -> Result<DatasetRecord, FetchError> {
        if self.broken_details.contains(&entry.label()) {
            return Err(FetchError::Parse {
                url: format!("http://fake/{}", entry.label()),
                source: serde_json::from_str::<Value>("{").unwrap_err(),
            });
        }
        entry.to_record().map_err(|source| FetchError::Parse {
            url: "http://fake/catalog.json".into(),
            source,
        })
    }
}

fn record(id: &str, format: &str) -> Value {
    json!({
        "identifier": id,
        "title": format!("Dataset {id}"),
        "description": "Sample data",
        "distribution": [{"format": format, "downloadUrl": format!("https://x/{id}.csv")}]
    })
}

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(2, 0, 0)
        .unwrap()
}

fn config(out: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.paths.output = out.join("_work");
    cfg
}

fn written(writes: &[WriteResult]) -> usize {
    writes
        .iter()
        .filter(|w| matches!(w, WriteResult::Written { .. }))
        .count()
}

// ---------------------------------------------------------------------------
// 1. Output counts
// ---------------------------------------------------------------------------

#[test]
fn n_datasets_produce_n_files_per_format_plus_index() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let source = FakeSource::new(vec![record("3@zh", "CSV"), record("1@zh", "CSV"), record("2@zh", "CSV")]);

    let report = pipeline::run(&source, &cfg, at(), ApplyOptions::default()).expect("run");

    assert_eq!(report.dataset_count, 3);
    assert_eq!(written(&report.writes), 3 * 2 + 1);
    let out = &cfg.paths.output;
    for id in ["1@zh", "2@zh", "3@zh"] {
        assert!(out.join("02_python").join(format!("{id}.ipynb")).is_file());
        assert!(out.join("01_r-markdown").join(format!("{id}.Rmd")).is_file());
    }
    let readme = fs::read_to_string(out.join("README.md")).unwrap();
    assert!(readme.contains("**3 datasets**"));
    let first = readme.find("| 1 |").expect("row 1");
    let third = readme.find("| 3 |").expect("row 3");
    assert!(first < third, "index rows must be sorted by identifier");
}

#[test]
fn single_format_run_writes_only_that_format() {
    let tmp = TempDir::new().unwrap();
    let mut cfg = config(tmp.path());
    cfg.formats = vec![OutputFormat::RMarkdown, OutputFormat::RMarkdown];
    let source = FakeSource::new(vec![record("1@zh", "CSV")]);

    let report = pipeline::run(&source, &cfg, at(), ApplyOptions::default()).unwrap();

    assert_eq!(written(&report.writes), 2);
    assert!(!cfg.paths.output.join("02_python").exists());
}

#[test]
fn empty_catalog_writes_only_index_with_zero_count() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let report = pipeline::run(&FakeSource::new(vec![]), &cfg, at(), ApplyOptions::default()).unwrap();

    assert_eq!(report.dataset_count, 0);
    assert_eq!(report.writes.len(), 1);
    let readme = fs::read_to_string(cfg.paths.output.join("README.md")).unwrap();
    assert!(readme.contains("**0 datasets**"));
}

#[test]
fn datasets_without_csv_are_excluded() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let source = FakeSource::new(vec![record("1@zh", "CSV"), record("2@zh", "XLSX")]);

    let report = pipeline::run(&source, &cfg, at(), ApplyOptions::default()).unwrap();

    assert_eq!(report.dataset_count, 1);
    assert_eq!(report.excluded_count, 1);
    assert!(!cfg.paths.output.join("01_r-markdown").join("2@zh.Rmd").exists());
}

// ---------------------------------------------------------------------------
// 2. Failure policy
// ---------------------------------------------------------------------------

#[test]
fn malformed_detail_does_not_abort_the_run() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let source = FakeSource::new(vec![record("1@zh", "CSV"), record("2@zh", "CSV"), record("3@zh", "CSV")])
        .with_broken_detail("2@zh");

    let report = pipeline::run(&source, &cfg, at(), ApplyOptions::default()).expect("run");

    assert_eq!(report.dataset_count, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].identifier.as_str(), "2@zh");
    assert!(report.skipped[0].format.is_none());
    assert!(report.skipped[0].reason.contains("malformed metadata"));
    assert!(cfg.paths.output.join("01_r-markdown").join("3@zh.Rmd").is_file());
}

#[test]
fn malformed_catalog_entries_are_skipped_individually() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let source = FakeSource::new(vec![
        record("1@zh", "CSV"),
        json!({"identifier": "2@zh", "title": 42}),
        json!({"title": "no id"}),
        record("4@zh", "CSV"),
    ]);

    let report = pipeline::run(&source, &cfg, at(), ApplyOptions::default()).expect("run");

    assert_eq!(report.dataset_count, 2);
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.identifier.as_str()).collect();
    assert_eq!(skipped, vec!["2@zh", "#2"]);
    assert!(report.skipped.iter().all(|s| s.format.is_none()));
    assert!(cfg.paths.output.join("02_python").join("1@zh.ipynb").is_file());
    assert!(cfg.paths.output.join("02_python").join("4@zh.ipynb").is_file());
}

#[test]
fn datasets_step_resolves_filters_and_sorts() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let source = FakeSource::new(vec![
        record("10@zh", "CSV"),
        record("2@zh", "CSV"),
        record("3@zh", "XLSX"),
        record("5@zh", "CSV"),
    ])
    .with_broken_detail("5@zh");

    let datasets = pipeline::datasets(&source, &cfg).unwrap();

    let ids: Vec<&str> = datasets.records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(ids, vec!["2@zh", "10@zh"]);
    assert_eq!(datasets.excluded_count, 1);
    assert_eq!(datasets.skipped.len(), 1);
}

#[test]
fn catalog_failure_aborts() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let source = FakeSource {
        catalog: Err(500),
        broken_details: HashSet::new(),
    };

    let err = pipeline::run(&source, &cfg, at(), ApplyOptions::default()).unwrap_err();
    assert!(matches!(err, SyncError::Fetch(FetchError::Status { status: 500, .. })), "got: {err}");
    assert!(!cfg.paths.output.exists(), "nothing may be written on catalog failure");
}

#[test]
fn notebook_template_without_cell_skips_only_notebooks() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("template_python.ipynb"),
        r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#,
    )
    .unwrap();
    let mut cfg = config(tmp.path());
    cfg.paths.templates = Some(templates);

    let report = pipeline::run(&FakeSource::new(vec![record("1@zh", "CSV")]), &cfg, at(), ApplyOptions::default())
        .unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].format, Some(OutputFormat::Python));
    assert!(cfg.paths.output.join("01_r-markdown").join("1@zh.Rmd").is_file());
    assert!(!cfg.paths.output.join("02_python").join("1@zh.ipynb").exists());
}

// ---------------------------------------------------------------------------
// 3. Dry-run, idempotence, prune, diff
// ---------------------------------------------------------------------------

#[test]
fn dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let options = ApplyOptions { dry_run: true, prune: false };

    let report = pipeline::run(&FakeSource::new(vec![record("1@zh", "CSV")]), &cfg, at(), options).unwrap();

    assert_eq!(report.writes.len(), 3);
    assert!(report.writes.iter().all(|w| matches!(w, WriteResult::WouldWrite { .. })));
    assert!(!cfg.paths.output.exists());
}

#[test]
fn repeated_runs_produce_identical_files() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let source = FakeSource::new(vec![record("1@zh", "CSV"), record("2@zh", "CSV")]);
    let readme = cfg.paths.output.join("README.md");
    let notebook = cfg.paths.output.join("02_python").join("2@zh.ipynb");

    pipeline::run(&source, &cfg, at(), ApplyOptions::default()).unwrap();
    let first = (fs::read(&readme).unwrap(), fs::read(&notebook).unwrap());
    pipeline::run(&source, &cfg, at(), ApplyOptions::default()).unwrap();
    let second = (fs::read(&readme).unwrap(), fs::read(&notebook).unwrap());

    assert_eq!(first, second);
}

#[test]
fn prune_removes_datasets_that_left_the_catalog() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    pipeline::run(
        &FakeSource::new(vec![record("1@zh", "CSV"), record("2@zh", "CSV")]),
        &cfg,
        at(),
        ApplyOptions::default(),
    )
    .unwrap();

    let options = ApplyOptions { dry_run: false, prune: true };
    let report = pipeline::run(&FakeSource::new(vec![record("1@zh", "CSV")]), &cfg, at(), options).unwrap();

    let removed: Vec<_> = report
        .writes
        .iter()
        .filter(|w| matches!(w, WriteResult::Removed { .. }))
        .collect();
    assert_eq!(removed.len(), 2);
    assert!(!cfg.paths.output.join("01_r-markdown").join("2@zh.Rmd").exists());
    assert!(cfg.paths.output.join("01_r-markdown").join("1@zh.Rmd").exists());
}

#[test]
fn prune_keeps_outputs_of_skipped_datasets() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let both = vec![record("1@zh", "CSV"), record("2@zh", "CSV")];
    pipeline::run(&FakeSource::new(both.clone()), &cfg, at(), ApplyOptions::default()).unwrap();

    let options = ApplyOptions { dry_run: false, prune: true };
    let flaky = FakeSource::new(both).with_broken_detail("2@zh");
    let report = pipeline::run(&flaky, &cfg, at(), options).unwrap();

    assert!(!report.writes.iter().any(|w| matches!(w, WriteResult::Removed { .. })));
    assert!(cfg.paths.output.join("01_r-markdown").join("2@zh.Rmd").is_file());
    assert!(cfg.paths.output.join("02_python").join("2@zh.ipynb").is_file());
}

#[test]
fn plan_then_diff_is_empty_after_apply() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    let renderer = pipeline::renderer_for(&cfg).unwrap();
    let source = FakeSource::new(vec![record("1@zh", "CSV")]);

    let plan = pipeline::plan(&source, &renderer, &cfg, at()).unwrap();
    assert_eq!(plan.dataset_files().count(), 2);
    assert_eq!(plan.files.iter().filter(|f| f.kind == FileKind::Index).count(), 1);
    assert_eq!(diff_plan(&plan).unwrap().len(), 3);

    pipeline::apply(&plan, &cfg, ApplyOptions::default()).unwrap();
    assert!(diff_plan(&plan).unwrap().is_empty());
}

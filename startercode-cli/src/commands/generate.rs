//! `startercode generate` — fetch metadata, render and write every output file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;

use startercode_core::OutputFormat;
use startercode_fetch::HttpSource;
use startercode_sync::{pipeline, ApplyOptions, GenerateReport, WriteResult};

use super::ConfigArgs;

/// Arguments for `startercode generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output root, overriding `paths.output`.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Formats to generate (repeatable), overriding `formats`.
    #[arg(long = "format", short = 'f', value_name = "FORMAT")]
    pub formats: Vec<OutputFormat>,

    /// Show what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Delete generated files of datasets no longer in the catalog.
    #[arg(long)]
    pub prune: bool,

    /// Exit non-zero if any dataset was skipped.
    #[arg(long)]
    pub strict: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let mut config = self.config.load()?;
        if let Some(output) = self.output {
            config.paths.output = output;
        }
        if !self.formats.is_empty() {
            config.formats = self.formats;
        }

        let source = HttpSource::from_config(&config.datashop);

        let options = ApplyOptions {
            dry_run: self.dry_run,
            prune: self.prune,
        };
        let generated_at = Local::now().naive_local();
        let report = pipeline::run(&source, &config, generated_at, options)
            .context("generate failed")?;

        print_report(&report, self.dry_run);

        if self.strict && !report.skipped.is_empty() {
            bail!("{} dataset output(s) skipped (--strict)", report.skipped.len());
        }
        Ok(())
    }
}

fn print_report(report: &GenerateReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = report
        .writes
        .iter()
        .filter(|w| matches!(w, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
        .count();

    println!(
        "{prefix}{} {} datasets, {} files written ({} excluded, {} skipped)",
        "✓".green().bold(),
        report.dataset_count,
        written,
        report.excluded_count,
        report.skipped.len(),
    );

    for w in &report.writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Removed { path } => println!("  {}  {}", "✗".red(), path.display()),
            WriteResult::WouldRemove { path } => println!("  -  {}", path.display()),
        }
    }

    if report.skipped.is_empty() {
        return;
    }
    println!("{}", "Skipped:".yellow().bold());
    for skip in &report.skipped {
        match skip.format {
            Some(format) => println!("  ·  {} ({format}): {}", skip.identifier, skip.reason),
            None => println!("  ·  {}: {}", skip.identifier, skip.reason),
        }
    }
}

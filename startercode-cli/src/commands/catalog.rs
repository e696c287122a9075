//! `startercode catalog` — list the datasets a generator run would cover.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use startercode_core::{catalog, DatasetRecord};
use startercode_fetch::HttpSource;
use startercode_sync::pipeline;

use super::ConfigArgs;

/// Arguments for `startercode catalog`.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct CatalogRow {
    #[tabled(rename = "identifier")]
    identifier: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "distributions")]
    distributions: usize,
}

impl CatalogRow {
    fn from_record(record: &DatasetRecord) -> Self {
        CatalogRow {
            identifier: record.identifier.to_string(),
            title: catalog::collapse_line_breaks(&record.title),
            distributions: record.distributions.len(),
        }
    }
}

impl CatalogArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.load()?;
        let source = HttpSource::from_config(&config.datashop);
        let datasets = pipeline::datasets(&source, &config)
            .with_context(|| format!("cannot fetch catalog from {}", source.catalog_url()))?;
        let rows: Vec<CatalogRow> = datasets.records.iter().map(CatalogRow::from_record).collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!(
            "{} datasets offer {} distributions ({} excluded, {} skipped)",
            rows.len().to_string().bold(),
            config.datashop.distribution_format,
            datasets.excluded_count,
            datasets.skipped.len(),
        );
        if rows.is_empty() {
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

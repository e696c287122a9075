//! `startercode diff` — show unified diffs for what generate would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use startercode_fetch::HttpSource;
use startercode_sync::{diff_plan, pipeline};

use super::ConfigArgs;

/// Arguments for `startercode diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output root to compare against, overriding `paths.output`.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let mut config = self.config.load()?;
        if let Some(output) = self.output {
            config.paths.output = output;
        }

        let source = HttpSource::from_config(&config.datashop);
        let renderer = pipeline::renderer_for(&config).context("cannot load templates")?;
        let plan = pipeline::plan(&source, &renderer, &config, Local::now().naive_local())
            .context("diff failed")?;
        let diffs = diff_plan(&plan).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences in '{}'.", plan.output_root.display());
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}

pub mod catalog;
pub mod diff;
pub mod generate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use startercode_core::config::{self, Config, DEFAULT_CONFIG_FILE};

/// `--config` flag shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// YAML config file. Defaults to ./startercode.yaml, falling back to
    /// built-in defaults when that file does not exist.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        match &self.config {
            Some(path) => config::load_at(path)
                .with_context(|| format!("cannot load config '{}'", path.display())),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    tracing::info!("no {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                }
                config::load_or_default(&path)
                    .with_context(|| format!("cannot load config '{}'", path.display()))
            }
        }
    }
}

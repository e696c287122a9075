//! YAML configuration.
//!
//! Every section and field is optional; anything omitted falls back to the
//! defaults below. The file is looked up at `./startercode.yaml` unless a
//! path is passed explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::OutputFormat;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "startercode.yaml";

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub templates: TemplatesConfig,
    pub datashop: DatashopConfig,
    pub github: GithubConfig,
    pub display: DisplayConfig,
    pub metadata_keys: MetadataKeysConfig,
    /// Output formats to generate.
    pub formats: Vec<OutputFormat>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            templates: TemplatesConfig::default(),
            datashop: DatashopConfig::default(),
            github: GithubConfig::default(),
            display: DisplayConfig::default(),
            metadata_keys: MetadataKeysConfig::default(),
            formats: OutputFormat::all().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the generated tree (README.md lives here).
    pub output: PathBuf,
    /// Directory with template overrides; embedded templates are used for
    /// anything not found here.
    pub templates: Option<PathBuf>,
    /// Notebook sub-directory, relative to `output` and to the repo root.
    pub python_output: String,
    /// R Markdown sub-directory, relative to `output` and to the repo root.
    pub r_markdown_output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("_work"),
            templates: None,
            python_output: "02_python".to_string(),
            r_markdown_output: "01_r-markdown".to_string(),
        }
    }
}

impl PathsConfig {
    /// Sub-directory name for `format`, without surrounding slashes.
    pub fn format_dir(&self, format: OutputFormat) -> &str {
        let dir = match format {
            OutputFormat::Python => &self.python_output,
            OutputFormat::RMarkdown => &self.r_markdown_output,
        };
        dir.trim_matches('/')
    }
}

/// Template file names looked up in [`PathsConfig::templates`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub python: String,
    pub rmarkdown: String,
    pub header: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            python: "template_python.ipynb".to_string(),
            rmarkdown: "template_rmarkdown.Rmd".to_string(),
            header: "template_header.md".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatashopConfig {
    /// Prefix for human-facing dataset links; the identifier is appended.
    pub base_link: String,
    /// Catalog endpoint returning `{"dataset": [...]}`.
    pub metadata_link: String,
    /// Optional per-dataset endpoint; the identifier is appended. When
    /// unset the catalog entries are used as detail records.
    pub detail_link: Option<String>,
    /// Substring a distribution's `format` must contain to be kept.
    pub distribution_format: String,
}

impl Default for DatashopConfig {
    fn default() -> Self {
        Self {
            base_link: "https://www.zh.ch/de/politik-staat/statistik-daten/datenkatalog.html#/datasets/"
                .to_string(),
            metadata_link: "https://www.web.statistik.zh.ch/ogd/daten/zhweb.json".to_string(),
            detail_link: None,
            distribution_format: "CSV".to_string(),
        }
    }
}

/// Where the generated tree is published; used to build index links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub account: String,
    pub repo_name: String,
    pub branch: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            account: "statistikZH".to_string(),
            repo_name: "ogd_startercode".to_string(),
            branch: "main".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Provider name for the `PROVIDER` placeholder. When empty, the
    /// dataset's own publisher is used.
    pub provider: String,
    /// Index titles longer than this are cut and suffixed with `…`.
    pub title_max_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            provider: "Statistisches Amt Kanton Zürich".to_string(),
            title_max_chars: 100,
        }
    }
}

/// Metadata keys listed in the generated files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataKeysConfig {
    pub dataset: Vec<String>,
    pub distribution: Vec<String>,
}

impl Default for MetadataKeysConfig {
    fn default() -> Self {
        let owned = |keys: &[&str]| keys.iter().map(|k| k.to_string()).collect();
        Self {
            dataset: owned(&[
                "issued",
                "modified",
                "startDate",
                "endDate",
                "theme",
                "keyword",
                "publisher",
                "landingPage",
            ]),
            distribution: owned(&["title", "description", "issued", "modified", "rights"]),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse a config document from YAML text. `path` is used for error context.
pub fn parse(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    // An empty document is valid and means "all defaults".
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config at `path`.
///
/// Returns [`ConfigError::NotFound`] if the file is absent and
/// [`ConfigError::Parse`] (with path + line context) if it is malformed.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, path)
}

/// Load `path` if it exists, otherwise fall back to [`Config::default`].
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    match load_at(path) {
        Err(ConfigError::NotFound { .. }) => Ok(Config::default()),
        other => other,
    }
}

//! Rendering payloads built from [`DatasetRecord`]s and [`Config`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use startercode_core::config::Config;
use startercode_core::{display_value, DatasetRecord, OutputFormat};

use crate::placeholder::{json_escape, Placeholders};

/// Replacement text for metadata that is absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Width the distribution key column is padded to.
const KEY_COLUMN_WIDTH: usize = 25;

/// Python-style capitalisation: first character upper, the rest lower.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn datashop_url(config: &Config, record: &DatasetRecord) -> String {
    format!("{}{}", config.datashop.base_link, record.identifier)
}

// ---------------------------------------------------------------------------
// Per-dataset context
// ---------------------------------------------------------------------------

/// One distribution as it appears in generated code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionCtx {
    /// Zero-based position within the dataset.
    pub index: usize,
    /// `# Key                      : value` comment lines, each newline-terminated.
    pub summary: String,
    pub download_url: String,
}

impl DistributionCtx {
    /// Starter-code block for this distribution.
    pub fn code_block(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Python => format!(
                "# Distribution {}\n{}\ndf = get_dataset('{}')\n",
                self.index, self.summary, self.download_url
            ),
            OutputFormat::RMarkdown => format!(
                "# Distribution {}\n{}\ndf <- read_delim('{}')\n\n",
                self.index, self.summary, self.download_url
            ),
        }
    }
}

/// Everything a per-dataset template can refer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetContext {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub provider: String,
    /// `- **Key** \`value\`` lines for the configured dataset keys.
    pub metadata: String,
    pub contact: String,
    /// Markdown link to the dataset's data shop page.
    pub datashop_link: String,
    /// `YYYY-MM-DD`.
    pub today_date: String,
    pub distributions: Vec<DistributionCtx>,
}

impl DatasetContext {
    /// Build the context for `record`, stamped with `generated_at`.
    pub fn from_record(record: &DatasetRecord, config: &Config, generated_at: NaiveDateTime) -> Self {
        let metadata: String = config
            .metadata_keys
            .dataset
            .iter()
            .map(|key| {
                let value = record
                    .value_of(key)
                    .map(|v| display_value(&v))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                format!("- **{}** `{}`\n", capitalize(key), value)
            })
            .collect();

        let contact = {
            let values = record.contact_values();
            if values.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                values.join(" | ")
            }
        };

        let distributions = record
            .distributions
            .iter()
            .enumerate()
            .map(|(index, dist)| {
                let summary = config
                    .metadata_keys
                    .distribution
                    .iter()
                    .map(|key| {
                        let value = dist
                            .value_of(key)
                            .map(|v| display_value(&v))
                            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                        format!(
                            "# {:<width$}: {}\n",
                            capitalize(key),
                            value,
                            width = KEY_COLUMN_WIDTH
                        )
                    })
                    .collect();
                DistributionCtx {
                    index,
                    summary,
                    download_url: dist.download_url.clone().unwrap_or_default(),
                }
            })
            .collect();

        let provider = if config.display.provider.trim().is_empty() {
            record
                .provider()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        } else {
            config.display.provider.clone()
        };

        DatasetContext {
            identifier: record.identifier.0.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            provider,
            metadata,
            contact,
            datashop_link: format!(
                "[Direct data shop link for dataset]({})",
                datashop_url(config, record)
            ),
            today_date: generated_at.format("%Y-%m-%d").to_string(),
            distributions,
        }
    }

    /// Concatenated code blocks for every distribution.
    pub fn distribution_code(&self, format: OutputFormat) -> String {
        self.distributions
            .iter()
            .map(|d| d.code_block(format))
            .collect()
    }

    /// Placeholder values for `format`.
    ///
    /// Notebook values are JSON-escaped because the template is a JSON
    /// document and the placeholders sit inside string literals.
    pub fn placeholders(&self, format: OutputFormat) -> Placeholders {
        let pairs = [
            ("PROVIDER", self.provider.clone()),
            ("DATASET_TITLE", self.title.clone()),
            ("DATASET_DESCRIPTION", self.description.clone()),
            ("DATASET_IDENTIFIER", self.identifier.clone()),
            ("DATASET_METADATA", self.metadata.clone()),
            ("DISTRIBUTION_COUNT", self.distributions.len().to_string()),
            ("DATASHOP_LINK", self.datashop_link.clone()),
            ("CONTACT", self.contact.clone()),
            ("TODAY_DATE", self.today_date.clone()),
            ("DISTRIBUTIONS", self.distribution_code(format)),
        ];
        pairs
            .into_iter()
            .map(|(name, value)| {
                let value = match format {
                    OutputFormat::Python => json_escape(&value),
                    OutputFormat::RMarkdown => value,
                };
                (name.to_string(), value)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Index context
// ---------------------------------------------------------------------------

/// One row of the index table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRow {
    /// Identifier prefix (`"123@abc"` → `"123"`).
    pub id: String,
    /// Title cleaned for use inside a Markdown link and truncated.
    pub title: String,
    pub datashop_link: String,
    pub python_colab: String,
    pub python_github: String,
    pub r_github: String,
}

/// Payload for the index README.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexContext {
    pub dataset_count: usize,
    pub title_max_chars: usize,
    /// `YYYY-MM-DD HH:MM:SS`.
    pub generated_at: String,
    /// Whether the Python columns are shown.
    pub python: bool,
    /// Whether the R column is shown.
    pub rmarkdown: bool,
    pub rows: Vec<IndexRow>,
}

/// Blank out brackets and line breaks, cut to `max_chars` characters with a
/// trailing `…`, then escape `|` for the table cell. Escaping runs after the
/// cut so it never splits `\|`.
pub fn index_title(title: &str, max_chars: usize) -> String {
    let clean = title.replace(['[', ']'], " ").replace(['\r', '\n'], " ");
    let cut = if clean.chars().count() > max_chars {
        let mut cut: String = clean.chars().take(max_chars).collect();
        cut.push('…');
        cut
    } else {
        clean
    };
    cut.replace('|', "\\|")
}

impl IndexContext {
    /// Build the index payload for `records` (already filtered and sorted).
    pub fn from_records(
        records: &[DatasetRecord],
        config: &Config,
        formats: &[OutputFormat],
        generated_at: NaiveDateTime,
    ) -> Self {
        let gh = &config.github;
        let blob_base = |host: &str, format: OutputFormat| {
            format!(
                "https://{host}/{}/{}/blob/{}/{}/",
                gh.account,
                gh.repo_name,
                gh.branch,
                config.paths.format_dir(format)
            )
        };
        let py_github = blob_base("github.com", OutputFormat::Python);
        let py_colab = blob_base("githubtocolab.com", OutputFormat::Python);
        let r_github = blob_base("github.com", OutputFormat::RMarkdown);

        let rows = records
            .iter()
            .map(|record| {
                let stem = record.identifier.file_stem();
                IndexRow {
                    id: record.identifier.prefix().to_string(),
                    title: index_title(&record.title, config.display.title_max_chars),
                    datashop_link: datashop_url(config, record),
                    python_colab: format!("{py_colab}{stem}.ipynb"),
                    python_github: format!("{py_github}{stem}.ipynb"),
                    r_github: format!("{r_github}{stem}.Rmd"),
                }
            })
            .collect();

        IndexContext {
            dataset_count: records.len(),
            title_max_chars: config.display.title_max_chars,
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            python: formats.contains(&OutputFormat::Python),
            rmarkdown: formats.contains(&OutputFormat::RMarkdown),
            rows,
        }
    }

    /// Placeholder values for the header template.
    pub fn header_placeholders(&self) -> Placeholders {
        [
            ("DATASET_COUNT", self.dataset_count.to_string()),
            ("TODAY_DATE", self.generated_at.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Convert to a [`tera::Context`], with the rendered `header` included.
    pub fn to_tera_context(&self, header: &str) -> Result<tera::Context, crate::RenderError> {
        let mut ctx = tera::Context::from_serialize(self)?;
        ctx.insert("header", header);
        Ok(ctx)
    }
}

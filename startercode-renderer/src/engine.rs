//! Template loading and rendering — [`TemplateSet`] and [`Renderer`].
//!
//! | Template            | Default file name         | Placeholders                     |
//! |---------------------|---------------------------|----------------------------------|
//! | Python notebook     | `template_python.ipynb`   | dataset set + `{{ DISTRIBUTION }}` cell |
//! | R Markdown          | `template_rmarkdown.Rmd`  | dataset set + `DISTRIBUTIONS`    |
//! | Index header        | `template_header.md`      | `DATASET_COUNT`, `TODAY_DATE`    |
//! | Index table (Tera)  | `index.md.tera`           | [`IndexContext`] fields          |

use std::path::{Path, PathBuf};

use serde_json::Value;
use tera::Tera;

use startercode_core::config::TemplatesConfig;
use startercode_core::OutputFormat;

use crate::context::{DatasetContext, IndexContext};
use crate::error::RenderError;
use crate::placeholder;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const PYTHON_TEMPLATE: &str = include_str!("templates/template_python.ipynb");
const RMARKDOWN_TEMPLATE: &str = include_str!("templates/template_rmarkdown.Rmd");
const HEADER_TEMPLATE: &str = include_str!("templates/template_header.md");
const INDEX_TEMPLATE: &str = include_str!("templates/index.md.tera");

const INDEX_TEMPLATE_NAME: &str = "index.md.tera";
const DISTRIBUTION_CELL: &str = "DISTRIBUTION";

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

/// Read `dir/name` if it exists, otherwise return `None`.
fn read_override(dir: Option<&Path>, name: &str) -> Result<Option<String>, RenderError> {
    let Some(dir) = dir else {
        return Ok(None);
    };
    let path = dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(Some(contents))
}

// ---------------------------------------------------------------------------
// TemplateSet
// ---------------------------------------------------------------------------

/// The raw template texts used by a [`Renderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub python: String,
    pub rmarkdown: String,
    pub header: String,
    pub index: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            python: PYTHON_TEMPLATE.to_string(),
            rmarkdown: RMARKDOWN_TEMPLATE.to_string(),
            header: HEADER_TEMPLATE.to_string(),
            index: INDEX_TEMPLATE.to_string(),
        }
    }
}

impl TemplateSet {
    /// Embedded defaults, with any file from `dir` named in `names` (or
    /// `index.md.tera`) taking precedence.
    pub fn load(dir: Option<&Path>, names: &TemplatesConfig) -> Result<Self, RenderError> {
        let defaults = TemplateSet::default();
        Ok(TemplateSet {
            python: read_override(dir, &names.python)?.unwrap_or(defaults.python),
            rmarkdown: read_override(dir, &names.rmarkdown)?.unwrap_or(defaults.rmarkdown),
            header: read_override(dir, &names.header)?.unwrap_or(defaults.header),
            index: read_override(dir, INDEX_TEMPLATE_NAME)?.unwrap_or(defaults.index),
        })
    }

    pub fn for_format(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Python => &self.python,
            OutputFormat::RMarkdown => &self.rmarkdown,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders per-dataset documents and the index README.
///
/// Create once and reuse for every dataset of a run.
pub struct Renderer {
    templates: TemplateSet,
    tera: Tera,
}

impl Renderer {
    /// Construct a [`Renderer`] from an explicit [`TemplateSet`].
    pub fn with_templates(templates: TemplateSet) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE_NAME, &templates.index)?;
        Ok(Renderer { templates, tera })
    }

    /// Embedded templates plus overrides from `dir`.
    pub fn new(dir: Option<&Path>, names: &TemplatesConfig) -> Result<Self, RenderError> {
        Self::with_templates(TemplateSet::load(dir, names)?)
    }

    /// Embedded templates only.
    pub fn embedded() -> Result<Self, RenderError> {
        Self::with_templates(TemplateSet::default())
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Render the starter-code document for one dataset.
    pub fn render_dataset(
        &self,
        ctx: &DatasetContext,
        format: OutputFormat,
    ) -> Result<String, RenderError> {
        let filled = placeholder::render(
            self.templates.for_format(format),
            &ctx.placeholders(format),
        );
        match format {
            OutputFormat::RMarkdown => Ok(filled),
            OutputFormat::Python => fill_distribution_cell(&filled, ctx),
        }
    }

    /// Render the index README: the header followed by the dataset table.
    pub fn render_index(&self, ctx: &IndexContext) -> Result<String, RenderError> {
        let header = placeholder::render(&self.templates.header, &ctx.header_placeholders());
        let tera_ctx = ctx.to_tera_context(&header)?;
        Ok(self.tera.render(INDEX_TEMPLATE_NAME, &tera_ctx)?)
    }
}

/// Parse the filled notebook and swap the `{{ DISTRIBUTION }}` code cell's
/// source for the per-distribution Python code.
fn fill_distribution_cell(notebook: &str, ctx: &DatasetContext) -> Result<String, RenderError> {
    let mut doc: Value = serde_json::from_str(notebook).map_err(|source| RenderError::Notebook {
        identifier: ctx.identifier.clone(),
        source,
    })?;

    let cell = doc
        .get_mut("cells")
        .and_then(Value::as_array_mut)
        .and_then(|cells| cells.iter_mut().find(|cell| is_distribution_cell(cell)))
        .ok_or_else(|| RenderError::MissingDistributionCell {
            identifier: ctx.identifier.clone(),
        })?;

    let code = ctx.distribution_code(OutputFormat::Python);
    let lines: Vec<Value> = code
        .trim_end_matches('\n')
        .split_inclusive('\n')
        .map(|line| Value::String(line.to_string()))
        .collect();
    cell["source"] = Value::Array(lines);

    // nbformat convention: one-space indent, trailing newline.
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(&doc, &mut ser).map_err(|source| RenderError::Notebook {
        identifier: ctx.identifier.clone(),
        source,
    })?;
    let mut text = String::from_utf8_lossy(&out).into_owned();
    text.push('\n');
    Ok(text)
}

fn is_distribution_cell(cell: &Value) -> bool {
    let source = match cell.get("source") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts.iter().filter_map(Value::as_str).collect(),
        _ => return false,
    };
    placeholder::is_only(&source, DISTRIBUTION_CELL)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

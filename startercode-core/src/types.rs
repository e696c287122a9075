//! Domain types for data shop metadata.
//!
//! Records mirror the DCAT-style JSON served by the data shop. Keys this
//! crate does not model explicitly are kept in `extra` so that configured
//! metadata keys can still be rendered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A data shop dataset identifier, e.g. `"123@statistisches-amt-kanton-zuerich"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(pub String);

impl Identifier {
    /// Text before the first `@` (`"123@abc"` → `"123"`).
    pub fn prefix(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    /// Numeric value of [`Identifier::prefix`], if it is one.
    pub fn numeric_prefix(&self) -> Option<u64> {
        self.prefix().parse().ok()
    }

    /// Identifier made safe for use as a file stem.
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| match c {
                '/' | '\\' => '-',
                c if c.is_control() => '-',
                c => c,
            })
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// Starter-code flavours the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Jupyter notebook with Python starter code.
    Python,
    /// R Markdown document with R starter code.
    #[serde(rename = "rmarkdown")]
    RMarkdown,
}

impl OutputFormat {
    /// All formats in a stable order.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Python, OutputFormat::RMarkdown]
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Python => "ipynb",
            OutputFormat::RMarkdown => "Rmd",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Python => "python",
            OutputFormat::RMarkdown => "rmarkdown",
        };
        f.write_str(s)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" | "ipynb" => Ok(OutputFormat::Python),
            "rmarkdown" | "r" | "rmd" => Ok(OutputFormat::RMarkdown),
            other => Err(format!(
                "unknown output format '{other}'; expected: python, rmarkdown"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

fn null_as_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(d).map(Option::unwrap_or_default)
}

fn null_as_empty_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(d).map(Option::unwrap_or_default)
}

/// One downloadable variant of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub format: String,
    #[serde(rename = "downloadUrl", default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Every other key returned by the portal.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Distribution {
    /// Look up a metadata key, modelled or not.
    pub fn value_of(&self, key: &str) -> Option<Value> {
        match key {
            "format" => Some(Value::String(self.format.clone())),
            "downloadUrl" => self.download_url.clone().map(Value::String),
            "description" => self.description.clone().map(Value::String),
            _ => self.extra.get(key).cloned(),
        }
    }
}

/// A single dataset as described by the data shop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub identifier: Identifier,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Contact points; only the first one is rendered.
    #[serde(rename = "contactPoint", default, deserialize_with = "null_as_empty_vec")]
    pub contact_point: Vec<Map<String, Value>>,
    #[serde(rename = "distribution", default, deserialize_with = "null_as_empty_vec")]
    pub distributions: Vec<Distribution>,
    /// Every other key returned by the portal.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DatasetRecord {
    /// Look up a metadata key, modelled or not.
    pub fn value_of(&self, key: &str) -> Option<Value> {
        match key {
            "identifier" => Some(Value::String(self.identifier.0.clone())),
            "title" => Some(Value::String(self.title.clone())),
            "description" => Some(Value::String(self.description.clone())),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Publishing organisation, taken from the `publisher` key.
    ///
    /// Accepts a plain string, an object with a `name`, or a list of either.
    pub fn provider(&self) -> Option<String> {
        fn name_of(v: &Value) -> Option<String> {
            match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Object(o) => o.get("name").and_then(name_of),
                Value::Array(items) => items.iter().find_map(name_of),
                _ => None,
            }
        }
        self.extra.get("publisher").and_then(name_of)
    }

    /// Non-null values of the first contact point.
    pub fn contact_values(&self) -> Vec<String> {
        let Some(first) = self.contact_point.first() else {
            return Vec::new();
        };
        first
            .values()
            .filter_map(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect()
    }
}

/// Render a JSON metadata value as plain text.
///
/// Strings are emitted raw, arrays are comma-joined, everything else uses
/// its JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

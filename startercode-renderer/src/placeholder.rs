//! `{{ NAME }}` placeholder substitution.
//!
//! Substitution is a single left-to-right pass: inserted values are never
//! rescanned, and names without a value are left in place untouched.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Placeholder name → replacement text.
pub type Placeholders = BTreeMap<String, String>;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex"));

/// Replace every recognised placeholder in `template`.
pub fn render(template: &str, values: &Placeholders) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of all placeholders in `template`, in order of appearance.
pub fn names(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// `true` if `text` is exactly one `{{ name }}` placeholder (surrounding
/// whitespace allowed).
pub fn is_only(text: &str, name: &str) -> bool {
    let text = text.trim();
    PLACEHOLDER
        .captures(text)
        .map(|caps| caps[0].len() == text.len() && &caps[1] == name)
        .unwrap_or(false)
}

/// Escape `value` for embedding inside a JSON string literal.
pub fn json_escape(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

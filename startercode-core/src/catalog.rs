//! Catalog shaping: distribution filtering and deterministic ordering.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::DatasetRecord;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid regex"));

/// Collapse runs of line breaks into a single space.
pub fn collapse_line_breaks(text: &str) -> String {
    LINE_BREAKS.replace_all(text, " ").into_owned()
}

/// Keep only distributions whose format contains `format`, dropping datasets
/// that end up with none.
///
/// Distribution descriptions are flattened to one line; multi-line text
/// would break the comment blocks in generated code.
pub fn filter_by_format(records: Vec<DatasetRecord>, format: &str) -> Vec<DatasetRecord> {
    records
        .into_iter()
        .filter_map(|mut record| {
            record.distributions.retain(|d| d.format.contains(format));
            if record.distributions.is_empty() {
                return None;
            }
            for dist in &mut record.distributions {
                if let Some(desc) = dist.description.as_mut() {
                    *desc = collapse_line_breaks(desc);
                }
            }
            Some(record)
        })
        .collect()
}

/// Ordering used for generated output: numeric identifier prefix ascending,
/// non-numeric identifiers last (by full identifier).
pub fn compare_identifiers(a: &DatasetRecord, b: &DatasetRecord) -> Ordering {
    match (a.identifier.numeric_prefix(), b.identifier.numeric_prefix()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.identifier.0.cmp(&b.identifier.0),
    }
}

/// Stable sort by [`compare_identifiers`].
pub fn sort_by_identifier(records: &mut [DatasetRecord]) {
    records.sort_by(compare_identifiers);
}

/// Filter then sort, the shape every generator run works on.
pub fn prepare(records: Vec<DatasetRecord>, format: &str) -> Vec<DatasetRecord> {
    let mut kept = filter_by_format(records, format);
    sort_by_identifier(&mut kept);
    kept
}

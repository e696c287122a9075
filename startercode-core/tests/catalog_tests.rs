//! Catalog filtering and ordering.

use rstest::rstest;
use serde_json::json;
use startercode_core::{catalog, DatasetRecord};

fn record(id: &str, formats: &[&str]) -> DatasetRecord {
    let dists: Vec<_> = formats
        .iter()
        .map(|f| json!({"format": f, "downloadUrl": format!("https://x/{id}.{f}")}))
        .collect();
    serde_json::from_value(json!({
        "identifier": id,
        "title": format!("Dataset {id}"),
        "distribution": dists,
    }))
    .expect("record")
}

fn ids(records: &[DatasetRecord]) -> Vec<&str> {
    records.iter().map(|r| r.identifier.as_str()).collect()
}

// ---------------------------------------------------------------------------
// 1. Filtering
// ---------------------------------------------------------------------------

#[test]
fn filter_keeps_only_matching_distributions() {
    let out = catalog::filter_by_format(vec![record("1@a", &["CSV", "XLSX", "CSV"])], "CSV");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].distributions.len(), 2);
    assert!(out[0].distributions.iter().all(|d| d.format == "CSV"));
}

#[test]
fn filter_drops_datasets_without_matching_distribution() {
    let out = catalog::filter_by_format(
        vec![record("1@a", &["XLSX"]), record("2@a", &[]), record("3@a", &["text/CSV"])],
        "CSV",
    );
    assert_eq!(ids(&out), vec!["3@a"]);
}

#[test]
fn filter_is_case_sensitive() {
    let out = catalog::filter_by_format(vec![record("1@a", &["csv"])], "CSV");
    assert!(out.is_empty());
}

#[test]
fn filter_flattens_multiline_descriptions() {
    let rec: DatasetRecord = serde_json::from_value(json!({
        "identifier": "1@a",
        "distribution": [{"format": "CSV", "description": "line one\n\nline two\nthree"}],
    }))
    .unwrap();
    let out = catalog::filter_by_format(vec![rec], "CSV");
    assert_eq!(
        out[0].distributions[0].description.as_deref(),
        Some("line one line two three")
    );
}

// ---------------------------------------------------------------------------
// 2. Ordering
// ---------------------------------------------------------------------------

#[rstest]
#[case(&["10@a", "2@a", "1@b"], &["1@b", "2@a", "10@a"])]
#[case(&["b@x", "3@a", "a@x"], &["3@a", "a@x", "b@x"])]
#[case(&["5@b", "5@a"], &["5@b", "5@a"])]
#[case(&[], &[])]
fn sort_orders_by_numeric_prefix(#[case] input: &[&str], #[case] expected: &[&str]) {
    let mut records: Vec<_> = input.iter().map(|id| record(id, &["CSV"])).collect();
    catalog::sort_by_identifier(&mut records);
    assert_eq!(ids(&records), expected);
}

#[test]
fn prepare_filters_then_sorts() {
    let out = catalog::prepare(
        vec![record("20@a", &["CSV"]), record("3@a", &["JSON"]), record("4@a", &["CSV"])],
        "CSV",
    );
    assert_eq!(ids(&out), vec!["4@a", "20@a"]);
}

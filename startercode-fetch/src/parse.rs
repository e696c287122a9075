//! JSON body shapes served by the data shop.

use std::io::Read;

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

use startercode_core::DatasetRecord;

/// DCAT-style catalog: `{"dataset": [ ... ]}`. Entries stay raw so one bad
/// entry cannot sink the whole catalog.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    dataset: Vec<Value>,
}

/// Detail bodies come either wrapped (`{"dataset": {...}}`) or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetailDocument {
    Wrapped { dataset: DatasetRecord },
    Bare(DatasetRecord),
}

/// One unvalidated catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Zero-based position in the catalog.
    pub position: usize,
    pub raw: Value,
}

impl CatalogEntry {
    pub fn new(position: usize, raw: Value) -> Self {
        Self { position, raw }
    }

    /// The entry's `identifier`, if it is a string.
    pub fn identifier(&self) -> Option<&str> {
        self.raw.get("identifier").and_then(Value::as_str)
    }

    /// Identifier, or `#<position>` for entries without one. Used in logs.
    pub fn label(&self) -> String {
        match self.identifier() {
            Some(id) => id.to_string(),
            None => format!("#{}", self.position),
        }
    }

    /// Deserialize the entry as a full dataset record.
    pub fn to_record(&self) -> Result<DatasetRecord, serde_json::Error> {
        DatasetRecord::deserialize(&self.raw)
    }

    /// Identifier for building a detail URL.
    pub fn require_identifier(&self) -> Result<&str, serde_json::Error> {
        self.identifier()
            .ok_or_else(|| serde_json::Error::custom("catalog entry has no string `identifier`"))
    }
}

/// Parse a catalog body.
pub fn parse_catalog<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, serde_json::Error> {
    let doc: CatalogDocument = serde_json::from_reader(reader)?;
    Ok(doc
        .dataset
        .into_iter()
        .enumerate()
        .map(|(position, raw)| CatalogEntry::new(position, raw))
        .collect())
}

/// Parse a single-dataset detail body.
pub fn parse_detail<R: Read>(reader: R) -> Result<DatasetRecord, serde_json::Error> {
    match serde_json::from_reader(reader)? {
        DetailDocument::Wrapped { dataset } => Ok(dataset),
        DetailDocument::Bare(dataset) => Ok(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_reads_dataset_list() {
        let body = r#"{"dataset":[{"identifier":"1@a","title":"One"},{"identifier":"2@a","title":"Two"}]}"#;
        let entries = parse_catalog(body.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].to_record().unwrap().title, "Two");
    }

    #[test]
    fn empty_catalog_is_valid() {
        let entries = parse_catalog(r#"{"dataset":[]}"#.as_bytes()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn catalog_without_dataset_key_is_rejected() {
        let err = parse_catalog(r#"{"items":[]}"#.as_bytes()).unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn truncated_body_is_a_syntax_error() {
        let err = parse_catalog(r#"{"dataset":[{"identifier":"#.as_bytes()).unwrap_err();
        assert!(err.is_eof() || err.is_syntax());
    }

    #[test]
    fn bad_entries_do_not_spoil_the_catalog() {
        let body = r#"{"dataset":[
            {"identifier":"1@zh","title":"Good"},
            {"identifier":"2@zh","title":42},
            {"title":"no id"}
        ]}"#;
        let entries = parse_catalog(body.as_bytes()).expect("catalog parses");
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].to_record().unwrap().identifier.as_str(), "1@zh");
        assert_eq!(entries[1].label(), "2@zh");
        assert!(entries[1].to_record().unwrap_err().is_data());
        assert_eq!(entries[2].label(), "#2");
        assert!(entries[2].to_record().is_err());
        assert!(entries[2].require_identifier().is_err());
    }

    #[test]
    fn detail_accepts_wrapped_and_bare() {
        let wrapped = parse_detail(r#"{"dataset":{"identifier":"9@a","title":"W"}}"#.as_bytes())
            .unwrap();
        assert_eq!(wrapped.identifier.as_str(), "9@a");
        let bare = parse_detail(r#"{"identifier":"9@a","title":"B"}"#.as_bytes()).unwrap();
        assert_eq!(bare.title, "B");
    }

    #[test]
    fn detail_without_identifier_is_rejected() {
        assert!(parse_detail(r#"{"title":"no id"}"#.as_bytes()).is_err());
    }
}

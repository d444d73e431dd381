//! # Default-Id Table
//!
//! A user-maintained CSV mapping object names to one known record id:
//!
//! ```csv
//! object,id
//! Account,001xx000003DGb2AAC
//! Pricebook2,01s5g00000ABCDeAAF
//! ```
//!
//! When a reference field targets an object listed here, the mapped id is used
//! as the whole identifier pool and no remote query is made. Rows whose id is
//! not a 15- or 18-character alphanumeric record id are dropped on load.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, SfSeedError};

static RECORD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{15}(?:[a-zA-Z0-9]{3})?$").unwrap());

#[derive(Debug, Deserialize)]
struct DefaultIdRow {
    #[serde(alias = "Object")]
    object: String,
    #[serde(alias = "Id", alias = "ID")]
    id: String,
}

/// Object name -> known record id.
#[derive(Debug, Clone, Default)]
pub struct DefaultIds {
    ids: HashMap<String, String>,
}

impl DefaultIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an in-memory map, applying the same id validation as CSV loading.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        let ids = map
            .into_iter()
            .filter(|(object, id)| keep_row(object, id))
            .collect();
        Self { ids }
    }

    /// Load from a CSV file with `object` and `id` columns.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| SfSeedError::Config {
            message: format!("Failed to open default-id table {}: {}", path.display(), e),
        })?;
        Self::from_reader(file)
    }

    /// Load from any CSV reader with `object` and `id` columns.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut ids = HashMap::new();
        for (line, row) in csv_reader.deserialize::<DefaultIdRow>().enumerate() {
            let row = row.map_err(|e| SfSeedError::Csv {
                message: format!("reading default-id table row {}", line + 1),
                source: e,
            })?;
            if keep_row(&row.object, &row.id) {
                ids.insert(row.object, row.id);
            }
        }

        tracing::debug!(entries = ids.len(), "Loaded default-id table");
        Ok(Self { ids })
    }

    pub fn get(&self, object_name: &str) -> Option<&str> {
        self.ids.get(object_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Whether `id` looks like a real 15- or 18-character record id.
pub fn is_record_id(id: &str) -> bool {
    RECORD_ID.is_match(id)
}

fn keep_row(object: &str, id: &str) -> bool {
    if object.is_empty() {
        tracing::warn!("Default-id row with empty object name ignored");
        return false;
    }
    if !is_record_id(id) {
        tracing::warn!(
            "Default id '{}' for {} is not a 15- or 18-character record id. Ignoring.",
            id,
            object
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_filter() {
        let csv = "object,id\n\
                   Account,001xx000003DGb2AAC\n\
                   Contact,003xx000004TmiQ\n\
                   Lead,NOT FOUND\n\
                   Case,500xx\n\
                   Pricebook2, 01s5g00000ABCDeAAF \n";
        let ids = DefaultIds::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.get("Account"), Some("001xx000003DGb2AAC"));
        assert_eq!(ids.get("Contact"), Some("003xx000004TmiQ"));
        assert_eq!(ids.get("Pricebook2"), Some("01s5g00000ABCDeAAF"));
        assert_eq!(ids.get("Lead"), None);
        assert_eq!(ids.get("Case"), None);
    }

    #[test]
    fn test_capitalized_headers() {
        let csv = "Object,Id\nAccount,001xx000003DGb2AAC\n";
        let ids = DefaultIds::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ids.get("Account"), Some("001xx000003DGb2AAC"));
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "name,value\nAccount,001xx000003DGb2AAC\n";
        let err = DefaultIds::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SfSeedError::Csv { .. }));
    }

    #[test]
    fn test_from_map_validates() {
        let mut map = HashMap::new();
        map.insert("Account".to_string(), "001xx000003DGb2AAC".to_string());
        map.insert("User".to_string(), "#N/A".to_string());
        let ids = DefaultIds::from_map(map);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_is_record_id() {
        assert!(is_record_id("001xx000003DGb2AAC"));
        assert!(is_record_id("001xx000003DGb2"));
        assert!(!is_record_id("001xx000003DGb2AA"));
        assert!(!is_record_id("001xx000003DG-2AAC"));
    }
}

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Descriptor for one tracked signal: a stable id, a display name, and the
/// opaque query parameters the query compiler turns into an API filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub id: String,
    pub name: String,
    pub params: BTreeMap<String, serde_json::Value>,
}

impl SignalConfig {
    /// Build a signal whose filter matches a single entity id.
    #[must_use]
    pub fn from_entity_id(id: &str, name: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert(
            "entity_ids".to_string(),
            serde_json::Value::Array(vec![serde_json::Value::String(id.to_string())]),
        );
        Self {
            id: id.to_string(),
            name: name.to_string(),
            params,
        }
    }
}

/// Load signal descriptors from a CSV file with one row per entity.
///
/// `id_field` names the column holding the entity id; `name_field` the display
/// name column. A row with an empty name falls back to its id.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, a named column is
/// missing, the CSV fails to parse, or validation rejects the rows.
pub fn load_signals_csv(
    path: &Path,
    id_field: &str,
    name_field: &str,
) -> Result<Vec<SignalConfig>, ConfigError> {
    let file = std::fs::File::open(path).map_err(|e| ConfigError::SignalsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    read_signals_csv(file, id_field, name_field)
}

/// Parse signal descriptors from CSV content.
///
/// Separated from [`load_signals_csv`] so tests can feed in-memory bytes.
///
/// # Errors
///
/// Returns `ConfigError` if a named column is missing, the CSV fails to
/// parse, or validation rejects the rows.
pub fn read_signals_csv<R: Read>(
    reader: R,
    id_field: &str,
    name_field: &str,
) -> Result<Vec<SignalConfig>, ConfigError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let id_idx = headers.iter().position(|h| h == id_field).ok_or_else(|| {
        ConfigError::Validation(format!("signals file has no '{id_field}' column"))
    })?;
    let name_idx = headers.iter().position(|h| h == name_field);

    let mut signals = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let id = record.get(id_idx).unwrap_or("").trim();
        let name = name_idx
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(id);
        signals.push(SignalConfig::from_entity_id(id, name));
    }

    validate_signals(&signals)?;

    Ok(signals)
}

fn validate_signals(signals: &[SignalConfig]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for signal in signals {
        if signal.id.is_empty() {
            return Err(ConfigError::Validation(
                "signal id must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(signal.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate signal id: '{}'",
                signal.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_entity_id_builds_single_valued_filter() {
        let signal = SignalConfig::from_entity_id("Q42", "Douglas Adams");
        assert_eq!(signal.id, "Q42");
        assert_eq!(signal.name, "Douglas Adams");
        assert_eq!(
            signal.params.get("entity_ids"),
            Some(&serde_json::json!(["Q42"]))
        );
    }

    #[test]
    fn read_signals_csv_maps_rows() {
        let csv = "wikidata_id,label\nQ1,Universe\nQ2,Earth\n";
        let signals = read_signals_csv(csv.as_bytes(), "wikidata_id", "label").unwrap();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].id, "Q1");
        assert_eq!(signals[0].name, "Universe");
        assert_eq!(signals[1].id, "Q2");
        assert_eq!(signals[1].name, "Earth");
    }

    #[test]
    fn read_signals_csv_name_falls_back_to_id() {
        let csv = "wikidata_id,label\nQ1,\n";
        let signals = read_signals_csv(csv.as_bytes(), "wikidata_id", "label").unwrap();
        assert_eq!(signals[0].name, "Q1");
    }

    #[test]
    fn read_signals_csv_missing_name_column_falls_back_to_id() {
        let csv = "wikidata_id\nQ1\n";
        let signals = read_signals_csv(csv.as_bytes(), "wikidata_id", "label").unwrap();
        assert_eq!(signals[0].name, "Q1");
    }

    #[test]
    fn read_signals_csv_rejects_missing_id_column() {
        let csv = "label\nUniverse\n";
        let err = read_signals_csv(csv.as_bytes(), "wikidata_id", "label").unwrap_err();
        assert!(err.to_string().contains("wikidata_id"));
    }

    #[test]
    fn read_signals_csv_rejects_duplicate_ids() {
        let csv = "wikidata_id,label\nQ1,Universe\nQ1,Cosmos\n";
        let err = read_signals_csv(csv.as_bytes(), "wikidata_id", "label").unwrap_err();
        assert!(err.to_string().contains("duplicate signal id"));
    }

    #[test]
    fn read_signals_csv_rejects_empty_id() {
        let csv = "wikidata_id,label\n,Universe\n";
        let err = read_signals_csv(csv.as_bytes(), "wikidata_id", "label").unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }
}

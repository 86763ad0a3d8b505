//! The dataset container: a named collection of realized signals on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use storypulse_newsapi::DEFAULT_PERIOD;

use crate::error::DatasetError;
use crate::io::{read_json, write_json};
use crate::types::{DatasetMetadata, DatasetSummary, Signal, TableRow};

pub const DEFAULT_DATASET_NAME: &str = "Story Signals Dataset";

const METADATA_FILE: &str = "metadata.json";
const SIGNAL_SUFFIX: &str = ".signal.json";

/// A realized dataset: metadata plus one [`Signal`] per entity id.
///
/// All signals share the dataset's period convention. Pass-through views are
/// deliberately enumerated — [`Self::to_table`] and [`Self::describe`] — so
/// the capability surface stays statically checkable.
#[derive(Debug, Clone)]
pub struct SignalsDataset {
    pub metadata: DatasetMetadata,
    signals: BTreeMap<String, Signal>,
}

impl SignalsDataset {
    #[must_use]
    pub fn new(metadata: DatasetMetadata, signals: Vec<Signal>) -> Self {
        let signals = signals
            .into_iter()
            .map(|s| (s.config.id.clone(), s))
            .collect();
        Self { metadata, signals }
    }

    /// Path of a signal's self-contained artifact inside a dataset directory.
    /// Presence of this exact file marks the signal as fully realized.
    #[must_use]
    pub fn signal_artifact_path(dir: &Path, signal_id: &str) -> PathBuf {
        dir.join(format!("{signal_id}{SIGNAL_SUFFIX}"))
    }

    /// Load a dataset directory: every `*.signal.json` artifact plus
    /// `metadata.json` (defaults apply when metadata is absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be scanned or an artifact
    /// fails to parse.
    pub fn load(dir: &Path) -> Result<Self, DatasetError> {
        let metadata_path = dir.join(METADATA_FILE);
        let metadata = if metadata_path.exists() {
            read_json(&metadata_path)?
        } else {
            DatasetMetadata {
                name: DEFAULT_DATASET_NAME.to_string(),
                period: DEFAULT_PERIOD.to_string(),
            }
        };

        let entries = std::fs::read_dir(dir).map_err(|e| DatasetError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut signals = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DatasetError::Io {
                path: dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            let is_artifact = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SIGNAL_SUFFIX));
            if is_artifact {
                signals.push(read_json::<Signal>(&path)?);
            }
        }

        Ok(Self::new(metadata, signals))
    }

    /// Persist every signal artifact plus `metadata.json` into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file write
    /// fails.
    pub fn save(&self, dir: &Path) -> Result<(), DatasetError> {
        std::fs::create_dir_all(dir).map_err(|e| DatasetError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        for signal in self.signals.values() {
            write_json(&Self::signal_artifact_path(dir, &signal.config.id), signal)?;
        }
        write_json(&dir.join(METADATA_FILE), &self.metadata)?;
        tracing::info!(
            dir = %dir.display(),
            signals = self.signals.len(),
            "saved dataset"
        );
        Ok(())
    }

    #[must_use]
    pub fn get(&self, signal_id: &str) -> Option<&Signal> {
        self.signals.get(signal_id)
    }

    #[must_use]
    pub fn contains(&self, signal_id: &str) -> bool {
        self.signals.contains_key(signal_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.values()
    }

    /// Long-form view across all signals, ordered by signal id then timestamp.
    #[must_use]
    pub fn to_table(&self) -> Vec<TableRow> {
        self.signals.values().flat_map(|s| s.table.clone()).collect()
    }

    /// Summary statistics over the whole dataset.
    #[must_use]
    pub fn describe(&self) -> DatasetSummary {
        let rows = self.to_table();
        DatasetSummary {
            signals: self.signals.len(),
            periods: rows.len(),
            total_volume: rows.iter().map(|r| r.volume).sum(),
            total_stories: rows.iter().map(|r| r.story_count).sum(),
            start: rows.iter().map(|r| r.timestamp).min(),
            end: rows.iter().map(|r| r.timestamp).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use storypulse_core::SignalConfig;
    use storypulse_newsapi::TimeSeriesPoint;

    use crate::types::StoryBucketRecord;

    use super::*;

    fn signal(id: &str, volumes: &[u64]) -> Signal {
        let buckets: Vec<StoryBucketRecord> = volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| StoryBucketRecord {
                timestamp: Utc
                    .with_ymd_and_hms(2023, 1, u32::try_from(i).unwrap() + 1, 0, 0, 0)
                    .unwrap(),
                stories: vec![],
                volume: v,
            })
            .collect();
        let time_series: Vec<TimeSeriesPoint> = buckets
            .iter()
            .map(|b| TimeSeriesPoint {
                published_at: b.timestamp,
                count: b.volume,
            })
            .collect();
        let table = Signal::derive_table(id, &buckets);
        Signal {
            config: SignalConfig::from_entity_id(id, id),
            time_series,
            buckets,
            table,
        }
    }

    fn metadata() -> DatasetMetadata {
        DatasetMetadata {
            name: "test dataset".to_string(),
            period: DEFAULT_PERIOD.to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = SignalsDataset::new(metadata(), vec![signal("Q1", &[5, 0, 3])]);
        dataset.save(dir.path()).unwrap();

        let loaded = SignalsDataset::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.metadata, metadata());
        assert_eq!(loaded.get("Q1").unwrap().buckets.len(), 3);
    }

    #[test]
    fn load_without_metadata_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = SignalsDataset::load(dir.path()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.metadata.name, DEFAULT_DATASET_NAME);
        assert_eq!(dataset.metadata.period, DEFAULT_PERIOD);
    }

    #[test]
    fn to_table_is_long_form_across_signals() {
        let dataset = SignalsDataset::new(
            metadata(),
            vec![signal("Q1", &[5, 0]), signal("Q2", &[7])],
        );
        let rows = dataset.to_table();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].signal_id, "Q1");
        assert_eq!(rows[2].signal_id, "Q2");
    }

    #[test]
    fn describe_aggregates_counts() {
        let dataset = SignalsDataset::new(metadata(), vec![signal("Q1", &[5, 0, 3])]);
        let summary = dataset.describe();
        assert_eq!(summary.signals, 1);
        assert_eq!(summary.periods, 3);
        assert_eq!(summary.total_volume, 8);
        assert_eq!(
            summary.start,
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            summary.end,
            Some(Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap())
        );
    }
}

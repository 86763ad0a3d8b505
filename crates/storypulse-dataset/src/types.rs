//! Persisted record and container types for signal datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storypulse_core::SignalConfig;
use storypulse_newsapi::TimeSeriesPoint;

use crate::reduce::ReducedStory;

/// One persisted unit per period in a signal's story log: the period start,
/// the reduced story sample, and the period's known volume. `timestamp` is
/// the primary key within one log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryBucketRecord {
    pub timestamp: DateTime<Utc>,
    pub stories: Vec<ReducedStory>,
    pub volume: u64,
}

/// One row of a signal's derived tabular view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub signal_id: String,
    pub timestamp: DateTime<Utc>,
    pub volume: u64,
    pub story_count: usize,
}

/// A fully realized signal: its descriptor plus everything retrieved for it.
///
/// Persisted as one self-contained JSON document per signal; the presence of
/// that document is the signal's completion marker for whole-entity resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub config: SignalConfig,
    pub time_series: Vec<TimeSeriesPoint>,
    pub buckets: Vec<StoryBucketRecord>,
    pub table: Vec<TableRow>,
}

impl Signal {
    /// Derive the tabular view rows from an accumulated bucket log, ordered
    /// by timestamp.
    #[must_use]
    pub fn derive_table(
        signal_id: &str,
        buckets: &[StoryBucketRecord],
    ) -> Vec<TableRow> {
        let mut rows: Vec<TableRow> = buckets
            .iter()
            .map(|b| TableRow {
                signal_id: signal_id.to_string(),
                timestamp: b.timestamp,
                volume: b.volume,
                story_count: b.stories.len(),
            })
            .collect();
        rows.sort_by_key(|r| r.timestamp);
        rows
    }
}

/// Dataset-level metadata. `period` is the shared time-index convention for
/// every signal in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub name: String,
    pub period: String,
}

/// Summary statistics over a dataset, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub signals: usize,
    pub periods: usize,
    pub total_volume: u64,
    pub total_stories: usize,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

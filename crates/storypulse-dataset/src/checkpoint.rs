//! Checkpoint recovery from a signal's story log.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::DatasetError;
use crate::io::read_jsonl;
use crate::types::StoryBucketRecord;

/// Recover the last successfully persisted period boundary from a story log.
///
/// Returns `None` if the log does not exist or is empty. Scans every line and
/// takes the maximum timestamp, so out-of-order lines are tolerated on read.
///
/// # Errors
///
/// Returns [`DatasetError::CorruptLog`] if any line fails to parse — a
/// degenerate log must surface, not silently restart the signal from scratch.
pub fn read_last_timestamp(path: &Path) -> Result<Option<DateTime<Utc>>, DatasetError> {
    if !path.exists() {
        return Ok(None);
    }
    let records: Vec<StoryBucketRecord> = read_jsonl(path)?;
    Ok(records.iter().map(|r| r.timestamp).max())
}

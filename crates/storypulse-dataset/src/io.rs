//! JSON and JSONL file helpers with path-carrying errors.
//!
//! [`append_jsonl`] is the pipeline's only log mutation: one record, one
//! open-append-write-close cycle, so a crash can damage at most the trailing
//! line and every prior record stays valid on restart.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DatasetError;

fn io_err(path: &Path, source: std::io::Error) -> DatasetError {
    DatasetError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn json_err(path: &Path, source: serde_json::Error) -> DatasetError {
    DatasetError::Json {
        path: path.display().to_string(),
        source,
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&content).map_err(|e| json_err(path, e))
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DatasetError> {
    let content = serde_json::to_string(value).map_err(|e| json_err(path, e))?;
    std::fs::write(path, content).map_err(|e| io_err(path, e))
}

/// Read every record of a JSONL file. A line that fails to parse is a
/// [`DatasetError::CorruptLog`] carrying its 1-based line number.
pub(crate) fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| io_err(path, e))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| io_err(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| DatasetError::CorruptLog {
            path: path.display().to_string(),
            line: idx + 1,
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Append one record as a single JSONL line, opening and closing the file
/// around the write.
pub(crate) fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> Result<(), DatasetError> {
    let line = serde_json::to_string(record).map_err(|e| json_err(path, e))?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    file.write_all(line.as_bytes()).map_err(|e| io_err(path, e))?;
    file.write_all(b"\n").map_err(|e| io_err(path, e))?;
    file.flush().map_err(|e| io_err(path, e))
}

//! Dataset assembly: drives the cache step, retriever, and table derivation
//! per signal, with whole-signal resume and optional intermediate cleanup.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use storypulse_core::SignalConfig;
use storypulse_newsapi::DEFAULT_PERIOD;

use crate::dataset::{SignalsDataset, DEFAULT_DATASET_NAME};
use crate::endpoints::{StoriesEndpoint, TimeSeriesEndpoint};
use crate::error::DatasetError;
use crate::io::{read_jsonl, write_json};
use crate::retriever::retrieve_and_write_stories;
use crate::timeseries::get_or_fetch_timeseries;
use crate::types::{DatasetMetadata, Signal, StoryBucketRecord};

/// Parameters for one dataset generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub signals: Vec<SignalConfig>,
    pub output_dir: PathBuf,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period: String,
    pub language: String,
    pub stories_per_period: u32,
    pub dataset_name: String,
    /// Delete and rebuild an existing output directory (after confirmation).
    pub overwrite: bool,
    /// Remove the per-signal time-series cache and story log once the signal
    /// artifact has been persisted.
    pub delete_tmp_files: bool,
}

impl GenerateRequest {
    /// A request with the default period, language, and per-period cap.
    #[must_use]
    pub fn new(
        signals: Vec<SignalConfig>,
        output_dir: PathBuf,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            signals,
            output_dir,
            start,
            end,
            period: DEFAULT_PERIOD.to_string(),
            language: "en".to_string(),
            stories_per_period: 20,
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            overwrite: false,
            delete_tmp_files: false,
        }
    }
}

/// Realize every signal in the request and return the assembled dataset.
///
/// Per signal: if the final artifact already exists the signal is skipped
/// entirely (whole-signal resume, zero external calls); otherwise the time
/// series is obtained through the write-once cache, the story log is brought
/// up to date period by period, the tabular view is derived, and the signal
/// is persisted as one self-contained artifact. Intermediate files are
/// deleted only after that persist succeeds, and only when requested.
///
/// `confirm` gates the destructive overwrite path: it receives a prompt and
/// returns whether to proceed. Declining aborts the run with
/// [`DatasetError::OverwriteDeclined`] and leaves the directory untouched.
///
/// # Errors
///
/// Propagates endpoint, I/O, and pipeline errors. On-disk state remains
/// valid and resumable: rerunning the same request continues from the last
/// persisted period of the signal that failed.
pub async fn generate_dataset<A, F>(
    api: &A,
    request: &GenerateRequest,
    confirm: F,
) -> Result<SignalsDataset, DatasetError>
where
    A: TimeSeriesEndpoint + StoriesEndpoint,
    F: Fn(&str) -> bool,
{
    let dir = &request.output_dir;

    if request.overwrite && dir.exists() {
        let prompt = format!(
            "Delete {} and rebuild the dataset from scratch (y|n)? ",
            dir.display()
        );
        if !confirm(&prompt) {
            return Err(DatasetError::OverwriteDeclined {
                path: dir.display().to_string(),
            });
        }
        std::fs::remove_dir_all(dir).map_err(|e| io_err(dir, e))?;
        tracing::warn!(dir = %dir.display(), "deleted existing dataset directory");
    }

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let metadata_path = dir.join("metadata.json");
    if !metadata_path.exists() {
        let metadata = DatasetMetadata {
            name: request.dataset_name.clone(),
            period: request.period.clone(),
        };
        write_json(&metadata_path, &metadata)?;
    }

    for config in &request.signals {
        let artifact = SignalsDataset::signal_artifact_path(dir, &config.id);
        if artifact.exists() {
            tracing::info!(signal = %config.id, "signal already realized; skipping");
            continue;
        }

        realize_signal(api, request, config, &artifact).await?;
    }

    SignalsDataset::load(dir)
}

/// Run the full cache → retrieve → derive → persist pipeline for one signal.
async fn realize_signal<A>(
    api: &A,
    request: &GenerateRequest,
    config: &SignalConfig,
    artifact: &Path,
) -> Result<(), DatasetError>
where
    A: TimeSeriesEndpoint + StoriesEndpoint,
{
    let dir = &request.output_dir;
    let ts_path = dir.join(format!("timeseries_{}.json", config.id));
    let log_path = dir.join(format!("buckets_{}.jsonl", config.id));

    // Distinct from the artifact check above: the artifact marks a realized
    // signal, an existing log only marks one that was started.
    if log_path.exists() {
        tracing::info!(signal = %config.id, "story log exists; resuming period retrieval");
    }

    let ts = get_or_fetch_timeseries(
        api,
        &config.params,
        request.start,
        request.end,
        &request.period,
        &request.language,
        &ts_path,
    )
    .await?;

    retrieve_and_write_stories(
        api,
        &config.params,
        request.start,
        request.end,
        &request.period,
        &request.language,
        &ts,
        &log_path,
        request.stories_per_period,
    )
    .await?;

    let mut buckets: Vec<StoryBucketRecord> = if log_path.exists() {
        read_jsonl(&log_path)?
    } else {
        Vec::new()
    };
    buckets.sort_by_key(|b| b.timestamp);

    let table = Signal::derive_table(&config.id, &buckets);
    let signal = Signal {
        config: config.clone(),
        time_series: ts,
        buckets,
        table,
    };

    // Stage through a temp file so a crash mid-write cannot leave a partial
    // artifact that would later read as "signal realized".
    let staged = artifact.with_extension("tmp");
    write_json(&staged, &signal)?;
    std::fs::rename(&staged, artifact).map_err(|e| io_err(artifact, e))?;
    tracing::info!(signal = %config.id, "signal realized");

    if request.delete_tmp_files {
        std::fs::remove_file(&ts_path).map_err(|e| io_err(&ts_path, e))?;
        if log_path.exists() {
            std::fs::remove_file(&log_path).map_err(|e| io_err(&log_path, e))?;
        }
    }

    Ok(())
}

fn io_err(path: &Path, source: std::io::Error) -> DatasetError {
    DatasetError::Io {
        path: path.display().to_string(),
        source,
    }
}

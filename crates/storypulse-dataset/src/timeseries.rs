//! Write-once caching of a signal's aggregate volume series.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use storypulse_newsapi::{compile_query, TimeSeriesPoint};

use crate::endpoints::TimeSeriesEndpoint;
use crate::error::DatasetError;
use crate::io::{read_json, write_json};

/// Obtain the volume series for a signal over `[start, end)`, fetching at
/// most once per cache path.
///
/// If `cache_path` exists its contents are returned verbatim — no
/// re-validation against `start`/`end`, no network. Otherwise the query is
/// compiled, the endpoint called exactly once, and the raw result persisted
/// before returning. Callers must mint a new path for a new range.
///
/// # Errors
///
/// Propagates endpoint failures and cache-file I/O or JSON errors.
pub async fn get_or_fetch_timeseries<E: TimeSeriesEndpoint>(
    endpoint: &E,
    params: &BTreeMap<String, serde_json::Value>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: &str,
    language: &str,
    cache_path: &Path,
) -> Result<Vec<TimeSeriesPoint>, DatasetError> {
    if cache_path.exists() {
        tracing::debug!(path = %cache_path.display(), "time series cache hit");
        return read_json(cache_path);
    }

    let query = compile_query(params, start, end, period, language);
    let ts = endpoint.fetch_timeseries(&query).await?;
    write_json(cache_path, &ts)?;
    tracing::info!(
        path = %cache_path.display(),
        points = ts.len(),
        "fetched and cached time series"
    );
    Ok(ts)
}

//! Period planning: the ordered, gap-free cover of `[start, end)` in
//! fixed-width buckets, and the volume lookup derived from a time series.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use storypulse_newsapi::TimeSeriesPoint;

/// One planned bucket: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolve a period string to its fixed width.
///
/// Returns `None` for conventions without a fixed width (months) or unknown
/// strings.
#[must_use]
pub fn period_width(period: &str) -> Option<Duration> {
    match period {
        "+1DAY" => Some(Duration::days(1)),
        "+1HOUR" => Some(Duration::hours(1)),
        _ => None,
    }
}

/// Plan the ordered, non-overlapping period sequence covering `[start, end)`.
///
/// A trailing partial bucket (range not divisible by `width`) is emitted
/// clamped to `end`, so coverage is always exact. An empty or inverted range
/// yields an empty plan.
///
/// # Panics
///
/// Panics if `width` is not positive.
#[must_use]
pub fn plan_periods(start: DateTime<Utc>, end: DateTime<Utc>, width: Duration) -> Vec<Period> {
    assert!(width > Duration::zero(), "period width must be positive");

    let mut periods = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let bucket_end = std::cmp::min(cursor + width, end);
        periods.push(Period {
            start: cursor,
            end: bucket_end,
        });
        cursor = bucket_end;
    }
    periods
}

/// Build the period-start → volume lookup from a fetched time series.
#[must_use]
pub fn volume_index(ts: &[TimeSeriesPoint]) -> HashMap<DateTime<Utc>, u64> {
    ts.iter().map(|p| (p.published_at, p.count)).collect()
}

//! News-search API response types.
//!
//! All types model the JSON structures returned by the REST API. Stories and
//! time-series points carry RFC 3339 timestamps, deserialized to
//! `DateTime<Utc>` via chrono's serde support.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for the `time_series` response: `{ "time_series": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct TimeSeriesResponse {
    pub time_series: Vec<TimeSeriesPoint>,
}

/// One period's aggregate volume: the period start and the count of matching
/// stories published within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub published_at: DateTime<Utc>,
    pub count: u64,
}

/// Wrapper for the `stories` response: `{ "stories": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct StoriesResponse {
    pub stories: Vec<RawStory>,
}

/// A full content record as returned by the `stories` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStory {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
    pub language: String,
    pub links: StoryLinks,
    #[serde(default)]
    pub categories: Vec<StoryCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryLinks {
    pub permalink: String,
}

/// A category tag attached to a story. `taxonomy` names the tagging scheme;
/// stories commonly carry tags from several taxonomies at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCategory {
    pub taxonomy: String,
    pub id: String,
    pub score: f64,
}

//! Typed HTTP client for the storypulse news-search API.
//!
//! Exposes the two endpoints the retrieval pipeline needs — aggregate volume
//! time series and per-period story samples — plus the query compiler that
//! turns a signal's opaque parameter map into the API's query syntax.

mod client;
mod error;
mod query;
mod retry;
mod types;

pub use client::NewsApiClient;
pub use error::NewsApiError;
pub use query::{compile_query, params_to_aql, StoryQuery, DEFAULT_PERIOD};
pub use types::{RawStory, StoryCategory, StoryLinks, TimeSeriesPoint};

//! Resumable incremental retrieval of signal datasets.
//!
//! The pipeline walks a date range in fixed-width periods, decides per period
//! whether to fetch, reuse, or write an empty record, and appends results to
//! a per-signal log so that a restart after partial failure never re-fetches
//! completed periods nor duplicates records.

mod assembler;
mod checkpoint;
mod dataset;
mod endpoints;
mod error;
mod io;
mod periods;
mod reduce;
mod retriever;
mod timeseries;
mod types;

pub use assembler::{generate_dataset, GenerateRequest};
pub use checkpoint::read_last_timestamp;
pub use dataset::{SignalsDataset, DEFAULT_DATASET_NAME};
pub use endpoints::{StoriesEndpoint, TimeSeriesEndpoint};
pub use error::DatasetError;
pub use periods::{period_width, plan_periods, volume_index, Period};
pub use reduce::{reduce_story, ReducedCategory, ReducedStory, MAX_BODY_TOKENS, SMART_TAGGER_TAXONOMY};
pub use retriever::{retrieve_and_write_stories, RetrievalSummary};
pub use timeseries::get_or_fetch_timeseries;
pub use types::{DatasetMetadata, DatasetSummary, Signal, StoryBucketRecord, TableRow};

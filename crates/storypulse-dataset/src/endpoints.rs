//! Endpoint seams between the pipeline and the news-search API.
//!
//! The retriever and cache step are generic over these traits so tests can
//! substitute fakes that count calls — the idempotency properties are
//! assertions about how often these methods run.

use std::future::Future;

use storypulse_newsapi::{NewsApiClient, NewsApiError, RawStory, StoryQuery, TimeSeriesPoint};

/// The aggregate-volume endpoint.
pub trait TimeSeriesEndpoint {
    fn fetch_timeseries(
        &self,
        query: &StoryQuery,
    ) -> impl Future<Output = Result<Vec<TimeSeriesPoint>, NewsApiError>>;
}

/// The per-period story-sample endpoint.
pub trait StoriesEndpoint {
    fn fetch_stories(
        &self,
        query: &StoryQuery,
    ) -> impl Future<Output = Result<Vec<RawStory>, NewsApiError>>;
}

impl TimeSeriesEndpoint for NewsApiClient {
    async fn fetch_timeseries(
        &self,
        query: &StoryQuery,
    ) -> Result<Vec<TimeSeriesPoint>, NewsApiError> {
        self.time_series(query).await
    }
}

impl StoriesEndpoint for NewsApiClient {
    async fn fetch_stories(&self, query: &StoryQuery) -> Result<Vec<RawStory>, NewsApiError> {
        self.stories(query).await
    }
}

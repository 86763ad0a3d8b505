//! HTTP client for the storypulse news-search REST API.
//!
//! Wraps `reqwest` with API-key header auth, typed response deserialization,
//! and transient-error retry. Both endpoints check the `"errors"` array in
//! the JSON body and surface API-level failures as [`NewsApiError::Api`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::NewsApiError;
use crate::query::StoryQuery;
use crate::retry::retry_with_backoff;
use crate::types::{RawStory, StoriesResponse, TimeSeriesPoint, TimeSeriesResponse};

const DEFAULT_BASE_URL: &str = "https://api.storypulse.io/v1/";

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;

/// Client for the news-search REST API.
///
/// Manages the HTTP client, API key, and base URL. Use [`NewsApiClient::new`]
/// for production or [`NewsApiClient::with_base_url`] to point at a mock
/// server in tests.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NewsApiClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, NewsApiError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NewsApiError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NewsApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("storypulse/0.1 (signal-retrieval)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the endpoint path rather than replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| NewsApiError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Overrides the transient-error retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches the aggregate volume time series for a compiled query.
    ///
    /// Calls the `time_series` endpoint and returns one point per period in
    /// the query's date range. Transient failures are retried per the
    /// configured policy.
    ///
    /// # Errors
    ///
    /// - [`NewsApiError::Api`] if the API returns an error envelope.
    /// - [`NewsApiError::Http`] on network failure or non-2xx HTTP status.
    /// - [`NewsApiError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn time_series(&self, query: &StoryQuery) -> Result<Vec<TimeSeriesPoint>, NewsApiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.time_series_once(query)
        })
        .await
    }

    /// Fetches up to `per_page` stories for a compiled period-scoped query.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::time_series`].
    pub async fn stories(&self, query: &StoryQuery) -> Result<Vec<RawStory>, NewsApiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.stories_once(query)
        })
        .await
    }

    async fn time_series_once(&self, query: &StoryQuery) -> Result<Vec<TimeSeriesPoint>, NewsApiError> {
        let url = self.build_url("time_series", &query.to_query_pairs())?;
        let body = self.request_json(&url).await?;
        Self::check_api_error(&body)?;

        let response: TimeSeriesResponse =
            serde_json::from_value(body).map_err(|e| NewsApiError::Deserialize {
                context: "time_series".to_string(),
                source: e,
            })?;

        Ok(response.time_series)
    }

    async fn stories_once(&self, query: &StoryQuery) -> Result<Vec<RawStory>, NewsApiError> {
        let url = self.build_url("stories", &query.to_query_pairs())?;
        let body = self.request_json(&url).await?;
        Self::check_api_error(&body)?;

        let response: StoriesResponse =
            serde_json::from_value(body).map_err(|e| NewsApiError::Deserialize {
                context: "stories".to_string(),
                source: e,
            })?;

        Ok(response.stories)
    }

    /// Builds the full request URL with properly percent-encoded query parameters.
    fn build_url(&self, endpoint: &str, pairs: &[(String, String)]) -> Result<Url, NewsApiError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| NewsApiError::Api(format!("invalid endpoint '{endpoint}': {e}")))?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (k, v) in pairs {
                query.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request with the API-key header, asserts a 2xx HTTP
    /// status, and parses the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] on network failure or a non-2xx status.
    /// Returns [`NewsApiError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, NewsApiError> {
        let response = self
            .client
            .get(url.clone())
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NewsApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Checks the top-level `"errors"` array and returns an error if present.
    fn check_api_error(body: &serde_json::Value) -> Result<(), NewsApiError> {
        if let Some(errors) = body.get("errors").and_then(serde_json::Value::as_array) {
            let msg = errors
                .first()
                .and_then(|e| e.get("detail"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(NewsApiError::Api(msg));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> NewsApiClient {
        NewsApiClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_endpoint_and_pairs() {
        let client = test_client("https://api.storypulse.io/v1");
        let url = client
            .build_url("stories", &[("language".to_string(), "en".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.storypulse.io/v1/stories?language=en");
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://api.storypulse.io/v1/");
        let url = client.build_url("time_series", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.storypulse.io/v1/time_series");
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://api.storypulse.io/v1");
        let url = client
            .build_url(
                "stories",
                &[("aql".to_string(), "entity.id:(Q1 OR Q2)".to_string())],
            )
            .unwrap();
        assert!(
            url.as_str().contains("entity.id%3A%28Q1+OR+Q2%29")
                || url.as_str().contains("entity.id%3A%28Q1%20OR%20Q2%29"),
            "aql param should be percent-encoded: {url}"
        );
    }
}

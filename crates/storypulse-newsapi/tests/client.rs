//! Integration tests for `NewsApiClient` using wiremock HTTP mocks.

use chrono::{TimeZone, Utc};
use storypulse_newsapi::{compile_query, NewsApiClient, DEFAULT_PERIOD};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> NewsApiClient {
    NewsApiClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(0, 0)
}

fn q1_query() -> storypulse_newsapi::StoryQuery {
    let params = serde_json::from_value(serde_json::json!({"entity_ids": ["Q1"]}))
        .expect("valid params map");
    compile_query(
        &params,
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 4, 0, 0, 0).unwrap(),
        DEFAULT_PERIOD,
        "en",
    )
}

#[tokio::test]
async fn time_series_returns_parsed_points() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "time_series": [
            { "published_at": "2023-01-01T00:00:00Z", "count": 5 },
            { "published_at": "2023-01-02T00:00:00Z", "count": 0 },
            { "published_at": "2023-01-03T00:00:00Z", "count": 3 }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/time_series"))
        .and(header("X-Api-Key", "test-key"))
        .and(query_param("aql", "entity.id:(Q1)"))
        .and(query_param("period", "+1DAY"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ts = client
        .time_series(&q1_query())
        .await
        .expect("should parse time series");

    assert_eq!(ts.len(), 3);
    assert_eq!(ts[0].count, 5);
    assert_eq!(ts[1].count, 0);
    assert_eq!(
        ts[2].published_at,
        Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn stories_returns_parsed_records() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "stories": [
            {
                "id": 101,
                "title": "Launch day",
                "body": "The product launched today.",
                "published_at": "2023-01-01T08:30:00Z",
                "language": "en",
                "links": { "permalink": "https://example.com/story/101" },
                "categories": [
                    { "taxonomy": "smart_tagger", "id": "st.business", "score": 0.91 },
                    { "taxonomy": "iptc", "id": "04000000", "score": 0.5 }
                ]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/stories"))
        .and(query_param("per_page", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stories = client
        .stories(&q1_query().with_per_page(20))
        .await
        .expect("should parse stories");

    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].id, 101);
    assert_eq!(stories[0].title, "Launch day");
    assert_eq!(stories[0].links.permalink, "https://example.com/story/101");
    assert_eq!(stories[0].categories.len(), 2);
}

#[tokio::test]
async fn stories_tolerates_missing_categories() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "stories": [
            {
                "id": 7,
                "title": "Untagged",
                "body": "No categories on this one.",
                "published_at": "2023-01-01T12:00:00Z",
                "language": "en",
                "links": { "permalink": "https://example.com/story/7" }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/stories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stories = client.stories(&q1_query()).await.expect("should parse");

    assert!(stories[0].categories.is_empty());
}

#[tokio::test]
async fn api_error_envelope_returns_err() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "errors": [
            { "detail": "Invalid API key" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.time_series(&q1_query()).await;

    assert!(result.is_err());
    let msg = result.unwrap_err().to_string();
    assert!(
        msg.contains("Invalid API key"),
        "expected error message to contain 'Invalid API key', got: {msg}"
    );
}

#[tokio::test]
async fn http_error_status_returns_err() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stories"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.stories(&q1_query()).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn malformed_body_returns_deserialize_err() {
    let server = MockServer::start().await;

    let body = serde_json::json!({ "time_series": "not-a-list" });

    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.time_series(&q1_query()).await;

    let msg = result.unwrap_err().to_string();
    assert!(
        msg.contains("deserialization"),
        "expected a deserialization error, got: {msg}"
    );
}

//! Integration tests for WeatherGateway using wiremock.
//!
//! These tests verify fetching, caching and error handling against a mock
//! archive server.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use weatherbox::app::{App, AppState, NO_DATA_MESSAGE};
use weatherbox::cache::{CacheKey, WeatherCache};
use weatherbox::data::{ErrorKind, WeatherError, WeatherGateway, WeatherQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARCHIVE_PATH: &str = "/v1/archive";

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn january_query() -> WeatherQuery {
    WeatherQuery::new(40.7128, -74.006, at(2024, 1, 1, 0), at(2024, 1, 2, 0)).unwrap()
}

/// Archive body with two days of data
fn two_day_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 40.71,
        "longitude": -74.0,
        "daily_units": { "time": "iso8601", "temperature_2m_max": "°C" },
        "daily": {
            "time": ["2024-01-01", "2024-01-02"],
            "temperature_2m_max": [5.2, 6.1],
            "temperature_2m_min": [-1.4, 0.3],
            "temperature_2m_mean": [1.9, 3.0],
            "apparent_temperature_max": [1.8, null],
            "apparent_temperature_min": [-5.0, -3.2],
            "apparent_temperature_mean": [-1.7, -0.4]
        }
    })
}

fn gateway_for(server: &MockServer) -> WeatherGateway {
    WeatherGateway::new().with_base_url(format!("{}{}", server.uri(), ARCHIVE_PATH))
}

async fn mount_ok(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_transforms_daily_arrays() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 1).await;

    let gateway = gateway_for(&mock_server);
    let series = gateway.fetch(&january_query()).await.unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(series[0].temperature_2m_max, Some(5.2));
    assert_eq!(series[0].temperature_2m_min, Some(-1.4));
    assert_eq!(series[0].apparent_temperature_mean, Some(-1.7));
    assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(series[1].temperature_2m_mean, Some(3.0));
    assert_eq!(series[1].apparent_temperature_max, None);
}

#[tokio::test]
async fn test_repeated_fetch_hits_network_once() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 1).await;

    let gateway = gateway_for(&mock_server);
    let first = gateway.fetch(&january_query()).await.unwrap();
    let second = gateway.fetch(&january_query()).await.unwrap();
    let third = gateway.fetch(&january_query()).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(gateway.cache().len(), 1);
}

#[tokio::test]
async fn test_distinct_keys_fetch_separately() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 3).await;

    let gateway = gateway_for(&mock_server);
    let midnight = january_query();
    let same_days_later_hour =
        WeatherQuery::new(40.7128, -74.006, at(2024, 1, 1, 6), at(2024, 1, 2, 0)).unwrap();
    let elsewhere =
        WeatherQuery::new(51.5074, -0.1278, at(2024, 1, 1, 0), at(2024, 1, 2, 0)).unwrap();

    let a = gateway.fetch(&midnight).await.unwrap();
    let b = gateway.fetch(&same_days_later_hour).await.unwrap();
    let c = gateway.fetch(&elsewhere).await.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(gateway.cache().len(), 3);
}

#[tokio::test]
async fn test_request_carries_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .and(query_param("latitude", "40.7128"))
        .and(query_param("longitude", "-74.006"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-01-02"))
        .and(query_param(
            "daily",
            "temperature_2m_max,temperature_2m_min,temperature_2m_mean,\
             apparent_temperature_max,apparent_temperature_min,apparent_temperature_mean",
        ))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_day_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let series = gateway.fetch(&january_query()).await.unwrap();
    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn test_missing_daily_is_malformed_and_not_cached() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, serde_json::json!({ "latitude": 40.71 }), 2).await;

    let gateway = gateway_for(&mock_server);

    let err = gateway.fetch(&january_query()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(err.to_string().starts_with("Invalid API response format"));
    assert!(gateway.cache().is_empty());

    // Failures are never memoized: the next call goes back to the archive
    let err = gateway.fetch(&january_query()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let err = gateway.fetch(&january_query()).await.unwrap_err();
    assert!(matches!(err, WeatherError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_server_error_is_http_error_and_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let err = gateway.fetch(&january_query()).await.unwrap_err();

    match &err {
        WeatherError::Http { status, status_text } => {
            assert_eq!(*status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected Http error, got {:?}", other),
    }
    assert_eq!(err.user_message(), "API error: 500 Internal Server Error");
    assert!(gateway.cache().is_empty());
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 2).await;

    let gateway = gateway_for(&mock_server);
    let before = gateway.fetch(&january_query()).await.unwrap();

    gateway.clear_cache();
    assert!(gateway.cache().is_empty());

    let after = gateway.fetch(&january_query()).await.unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_timeout_reports_timeout_and_caches_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(two_day_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let err = gateway
        .fetch_with_timeout(&january_query(), Duration::from_millis(50))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TimeoutError);
    assert_eq!(err.user_message(), "Request timed out. Please try again.");
    assert!(gateway.cache().is_empty());
}

#[tokio::test]
async fn test_fetch_with_timeout_within_limit() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 1).await;

    let gateway = gateway_for(&mock_server);
    let series = gateway
        .fetch_with_timeout(&january_query(), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let gateway = WeatherGateway::new().with_base_url("http://127.0.0.1:1/v1/archive");
    let err = gateway.fetch(&january_query()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert!(gateway.cache().is_empty());
}

#[tokio::test]
async fn test_concurrent_same_key_fetches_share_first_result() {
    let mock_server = MockServer::start().await;
    // Both fetches miss the cache before either response arrives
    mount_ok(&mock_server, two_day_body(), 2).await;

    let gateway = gateway_for(&mock_server);
    let query = january_query();
    let (a, b) = futures::join!(gateway.fetch(&query), gateway.fetch(&query));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    let cached = gateway.cache().get(&CacheKey::for_query(&query)).unwrap();
    assert!(Arc::ptr_eq(&a, &cached));
}

#[tokio::test]
async fn test_gateways_sharing_a_cache() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 1).await;

    let cache = WeatherCache::new();
    let first = gateway_for(&mock_server).with_cache(cache.clone());
    let second = gateway_for(&mock_server).with_cache(cache.clone());

    let a = first.fetch(&january_query()).await.unwrap();
    let b = second.fetch(&january_query()).await.unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_app_load_success_then_cached() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 1).await;

    let mut app = App::with_gateway(
        january_query(),
        gateway_for(&mock_server),
        Duration::from_secs(5),
        10,
    );

    app.load().await;
    assert_eq!(app.state, AppState::Ready);
    assert_eq!(app.records().len(), 2);
    assert_eq!(app.status.as_deref(), Some("Weather data loaded successfully"));
    assert_eq!(
        app.range_summary().as_deref(),
        Some("Showing data from 1/1/2024 to 1/2/2024 (2 days)")
    );

    app.load().await;
    assert_eq!(app.state, AppState::Ready);
    assert_eq!(app.status.as_deref(), Some("Using cached weather data"));
}

#[tokio::test]
async fn test_app_load_empty_series_is_failure() {
    let mock_server = MockServer::start().await;
    mount_ok(
        &mock_server,
        serde_json::json!({ "daily": { "time": [] } }),
        1,
    )
    .await;

    let mut app = App::with_gateway(
        january_query(),
        gateway_for(&mock_server),
        Duration::from_secs(5),
        10,
    );
    app.load().await;

    assert_eq!(app.state, AppState::Failed(NO_DATA_MESSAGE.to_string()));
    assert!(app.records().is_empty());
}

#[tokio::test]
async fn test_app_load_error_keeps_previous_series() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 1).await;

    let mut app = App::with_gateway(
        january_query(),
        gateway_for(&mock_server),
        Duration::from_secs(5),
        10,
    );
    app.load().await;
    assert_eq!(app.records().len(), 2);

    // Point a fresh query at a failing endpoint
    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    app.gateway().clear_cache();
    app.load().await;

    assert_eq!(
        app.state,
        AppState::Failed("API error: 503 Service Unavailable".to_string())
    );
    assert_eq!(app.records().len(), 2);
}

#[tokio::test]
async fn test_quit_while_loading_abandons_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(two_day_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut app = App::with_gateway(
        january_query(),
        gateway_for(&mock_server),
        Duration::from_secs(15),
        10,
    );
    let fetch = app.start_load();
    tokio::pin!(fetch);

    // Keys are handled while the request is still pending
    let pending = tokio::time::timeout(Duration::from_millis(100), &mut fetch).await;
    assert!(pending.is_err());
    assert_eq!(app.state, AppState::Loading);

    app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
    assert!(!app.refresh_requested);
    app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
    assert!(app.should_quit);

    drop(fetch);
    assert!(app.gateway().cache().is_empty());
    assert!(app.records().is_empty());
}

#[tokio::test]
async fn test_start_and_finish_load() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, two_day_body(), 1).await;

    let mut app = App::with_gateway(
        january_query(),
        gateway_for(&mock_server),
        Duration::from_secs(5),
        10,
    );
    let outcome = app.start_load().await;
    assert!(!outcome.from_cache);

    app.finish_load(outcome);
    assert_eq!(app.state, AppState::Ready);
    assert_eq!(app.records().len(), 2);
}

//! Open-Meteo archive gateway
//!
//! This module fetches historical daily temperature statistics from the
//! Open-Meteo archive API, reshapes the response's parallel arrays into
//! per-day records, and memoizes the result per query in a [`WeatherCache`].

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::{DailyWeatherRecord, WeatherQuery, WeatherSeries};
use crate::cache::{CacheKey, WeatherCache};

/// Base URL for the Open-Meteo archive API
const OPEN_METEO_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Lets the archive pick the coordinate's local timezone
const TIMEZONE: &str = "auto";

/// Daily variables requested from the archive, in record field order
pub const DAILY_VARIABLES: [&str; 6] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "apparent_temperature_mean",
];

/// Message shown to users when a fetch times out
const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The archive answered with a non-2xx status
    #[error("API error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// The body parsed badly or lacked the expected structure
    #[error("Invalid API response format: {0}")]
    MalformedResponse(String),

    /// The caller's timeout elapsed before the fetch finished
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Coarse classification of a [`WeatherError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkError,
    HttpError,
    MalformedResponse,
    TimeoutError,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Http { .. } => ErrorKind::HttpError,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Timeout(_) => ErrorKind::TimeoutError,
        }
    }

    /// Text to show the user: a generic retry hint for timeouts, the error
    /// itself otherwise
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Memoizing client for the Open-Meteo archive
///
/// Each distinct [`CacheKey`] is fetched at most once for the lifetime of the
/// attached cache. Failed fetches cache nothing. Cloning the gateway shares its
/// cache; use [`WeatherGateway::with_cache`] to isolate or share explicitly.
#[derive(Debug, Clone)]
pub struct WeatherGateway {
    client: Client,
    base_url: String,
    cache: WeatherCache,
}

impl Default for WeatherGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherGateway {
    /// Create a gateway for the public archive with a fresh, empty cache
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: OPEN_METEO_ARCHIVE_URL.to_string(),
            cache: WeatherCache::new(),
        }
    }

    /// Use a custom HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Point the gateway at another archive endpoint (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Attach an existing cache
    pub fn with_cache(mut self, cache: WeatherCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Drop every cached series
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("Weather cache cleared");
    }

    /// Fetch the daily series for `query`
    ///
    /// Returns the cached series when the query's key was fetched before;
    /// otherwise issues one GET to the archive, stores the result and returns
    /// it. Repeated hits return the same shared allocation.
    ///
    /// # Errors
    /// * [`WeatherError::Network`] on transport failure
    /// * [`WeatherError::Http`] on a non-2xx status
    /// * [`WeatherError::MalformedResponse`] when the body is not the expected shape
    pub async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherSeries, WeatherError> {
        let key = CacheKey::for_query(query);
        tracing::debug!(%key, "Fetching weather data");

        if let Some(series) = self.cache.get(&key) {
            tracing::debug!(%key, "Returning cached weather data");
            return Ok(series);
        }

        match self.fetch_uncached(query).await {
            Ok(series) => {
                let series = self.cache.insert(key, series);
                tracing::info!(days = series.len(), "Weather data fetched and cached");
                Ok(series)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching weather data");
                Err(e)
            }
        }
    }

    /// Like [`fetch`](Self::fetch), but gives up after `timeout`
    ///
    /// The in-flight request is dropped on timeout, which aborts it at the
    /// transport level. Nothing is cached in that case.
    pub async fn fetch_with_timeout(
        &self,
        query: &WeatherQuery,
        timeout: Duration,
    ) -> Result<WeatherSeries, WeatherError> {
        match tokio::time::timeout(timeout, self.fetch(query)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?timeout, "Weather request timed out");
                Err(WeatherError::Timeout(timeout))
            }
        }
    }

    async fn fetch_uncached(&self, query: &WeatherQuery) -> Result<WeatherSeries, WeatherError> {
        let params = request_params(query);
        tracing::debug!(url = %self.base_url, ?params, "Requesting archive");

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        parse_archive_body(&body)
    }
}

/// Query parameters for one archive request
///
/// Dates are sent at calendar-day granularity; the time of day only matters
/// for the cache key.
fn request_params(query: &WeatherQuery) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", query.latitude().to_string()),
        ("longitude", query.longitude().to_string()),
        ("start_date", query.start_day().format("%Y-%m-%d").to_string()),
        ("end_date", query.end_day().format("%Y-%m-%d").to_string()),
        ("daily", DAILY_VARIABLES.join(",")),
        ("timezone", TIMEZONE.to_string()),
    ]
}

/// Parse an archive response body into an ordered series
fn parse_archive_body(body: &str) -> Result<WeatherSeries, WeatherError> {
    let response: ArchiveResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    let daily = response
        .daily
        .ok_or_else(|| WeatherError::MalformedResponse("missing `daily` field".to_string()))?;

    daily.into_records()
}

/// Open-Meteo archive response; only the consumed field is modelled
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailyArrays>,
}

/// Index-aligned daily arrays
///
/// A variable array the archive left out is treated like an array of nulls.
#[derive(Debug, Deserialize)]
struct DailyArrays {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_max: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_min: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_mean: Vec<Option<f64>>,
}

impl DailyArrays {
    /// Zip the arrays by index; output length follows `time`
    fn into_records(self) -> Result<WeatherSeries, WeatherError> {
        let mut records = Vec::with_capacity(self.time.len());

        for (i, day) in self.time.iter().enumerate() {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| {
                WeatherError::MalformedResponse(format!("invalid date '{}' in `daily.time`", day))
            })?;

            records.push(DailyWeatherRecord {
                date,
                temperature_2m_max: value_at(&self.temperature_2m_max, i),
                temperature_2m_min: value_at(&self.temperature_2m_min, i),
                temperature_2m_mean: value_at(&self.temperature_2m_mean, i),
                apparent_temperature_max: value_at(&self.apparent_temperature_max, i),
                apparent_temperature_min: value_at(&self.apparent_temperature_min, i),
                apparent_temperature_mean: value_at(&self.apparent_temperature_mean, i),
            });
        }

        Ok(records.into())
    }
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

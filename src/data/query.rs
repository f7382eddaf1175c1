//! Query value object and input validation
//!
//! A `WeatherQuery` can only be built through [`WeatherQuery::new`], which applies
//! the same checks the input form performs before a fetch is allowed.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

/// Latitude used when none is given (New York City)
pub const DEFAULT_LATITUDE: f64 = 40.7128;
/// Longitude used when none is given (New York City)
pub const DEFAULT_LONGITUDE: f64 = -74.0060;
/// Days between the default start date and now
pub const DEFAULT_SPAN_DAYS: i64 = 14;
/// Longest range the archive is asked for in one request
pub const MAX_SPAN_DAYS: i64 = 366;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Errors raised while building a query from user input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Please enter a valid latitude between -90 and 90")]
    InvalidLatitude(f64),

    #[error("Please enter a valid longitude between -180 and 180")]
    InvalidLongitude(f64),

    #[error("Start date must be before end date")]
    StartAfterEnd,

    #[error("Date range cannot exceed 366 days")]
    RangeTooLong(i64),

    /// Date argument was neither `YYYY-MM-DD` nor RFC 3339
    #[error("Invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
}

/// A coordinate plus a date range, validated and immutable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherQuery {
    latitude: f64,
    longitude: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl WeatherQuery {
    /// Validates the inputs and builds a query
    ///
    /// Checks run in order: latitude range, longitude range, `start <= end`,
    /// and a span of at most [`MAX_SPAN_DAYS`] days (partial days round up).
    pub fn new(
        latitude: f64,
        longitude: f64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Self, QueryError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(QueryError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(QueryError::InvalidLongitude(longitude));
        }
        if start_date > end_date {
            return Err(QueryError::StartAfterEnd);
        }

        let span_days = span_in_days(start_date, end_date);
        if span_days > MAX_SPAN_DAYS {
            return Err(QueryError::RangeTooLong(span_days));
        }

        // Adding zero folds -0.0 into 0.0 so both print as `0`
        Ok(Self {
            latitude: latitude + 0.0,
            longitude: longitude + 0.0,
            start_date,
            end_date,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    /// Start of the range at calendar-day granularity (UTC)
    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date_naive()
    }

    /// End of the range at calendar-day granularity (UTC)
    pub fn end_day(&self) -> NaiveDate {
        self.end_date.date_naive()
    }
}

/// Default `(start, end)` pair: the last [`DEFAULT_SPAN_DAYS`] days up to `end`
///
/// Fails when `end` is too close to the earliest representable instant.
pub fn default_range(end: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), QueryError> {
    let start = end
        .checked_sub_signed(Duration::days(DEFAULT_SPAN_DAYS))
        .ok_or_else(|| QueryError::InvalidDate(end.to_rfc3339()))?;
    Ok((start, end))
}

/// Parses a date argument
///
/// Accepts a bare calendar date (`2024-01-31`, taken as midnight UTC) or a full
/// RFC 3339 timestamp (`2024-01-31T06:00:00+02:00`).
pub fn parse_date_arg(value: &str) -> Result<DateTime<Utc>, QueryError> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| QueryError::InvalidDate(value.to_string()))
}

fn span_in_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

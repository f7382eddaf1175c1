//! Core data models for Weather Box
//!
//! This module contains the query value object, the per-day record produced by
//! the archive gateway, and small display helpers shared by the table, chart
//! and plain-text renderers.

pub mod query;
pub mod weather;

pub use query::{default_range, parse_date_arg, QueryError, WeatherQuery};
pub use weather::{ErrorKind, WeatherError, WeatherGateway, DAILY_VARIABLES};

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Ordered daily records for one query, shared between cache and callers
pub type WeatherSeries = Arc<[DailyWeatherRecord]>;

/// One day of temperature statistics from the archive
///
/// Field names follow the archive's daily variable names. A field is `None`
/// when the archive had no value for that day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyWeatherRecord {
    /// Calendar day in the location's local timezone
    pub date: NaiveDate,
    /// Maximum air temperature at 2 m, °C
    pub temperature_2m_max: Option<f64>,
    /// Minimum air temperature at 2 m, °C
    pub temperature_2m_min: Option<f64>,
    /// Mean air temperature at 2 m, °C
    pub temperature_2m_mean: Option<f64>,
    /// Maximum apparent ("feels like") temperature, °C
    pub apparent_temperature_max: Option<f64>,
    /// Minimum apparent temperature, °C
    pub apparent_temperature_min: Option<f64>,
    /// Mean apparent temperature, °C
    pub apparent_temperature_mean: Option<f64>,
}

impl DailyWeatherRecord {
    /// A record for `date` with every statistic absent
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            temperature_2m_max: None,
            temperature_2m_min: None,
            temperature_2m_mean: None,
            apparent_temperature_max: None,
            apparent_temperature_min: None,
            apparent_temperature_mean: None,
        }
    }

    /// The six statistics in [`DAILY_VARIABLES`] order
    pub fn values(&self) -> [Option<f64>; 6] {
        [
            self.temperature_2m_max,
            self.temperature_2m_min,
            self.temperature_2m_mean,
            self.apparent_temperature_max,
            self.apparent_temperature_min,
            self.apparent_temperature_mean,
        ]
    }
}

/// Formats a temperature with one decimal, or `N/A` when absent
pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}°C", v),
        None => "N/A".to_string(),
    }
}

/// Formats a day as e.g. `Mon, Jan 1, 2024`
pub fn format_day(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

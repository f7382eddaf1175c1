//! Command-line interface parsing for Weather Box
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`StartupConfig`]: the query to fetch plus the gateway and
//! display settings.

use chrono::{DateTime, Utc};
use clap::Parser;
use std::time::Duration;
use thiserror::Error;

use crate::data::query::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
use crate::data::{default_range, parse_date_arg, QueryError, WeatherGateway, WeatherQuery};
use crate::pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

/// Seconds to wait for the archive before reporting a timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// Coordinates or dates failed validation
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// Page size is not one of the offered choices
    #[error("Invalid page size: {0}. Valid sizes: 5, 10, 20, 50")]
    InvalidPageSize(usize),

    #[error("Timeout must be at least one second")]
    InvalidTimeout,
}

/// Weather Box - historical daily temperatures from the Open-Meteo archive
#[derive(Parser, Debug)]
#[command(name = "weatherbox")]
#[command(about = "Historical daily temperature dashboard backed by the Open-Meteo archive")]
#[command(version)]
pub struct Cli {
    /// Latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_LATITUDE)]
    pub latitude: f64,

    /// Longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_LONGITUDE)]
    pub longitude: f64,

    /// First day of the range (YYYY-MM-DD or RFC 3339). Defaults to 14 days
    /// before the end date.
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,

    /// Last day of the range (YYYY-MM-DD or RFC 3339). Defaults to now.
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,

    /// Seconds to wait for the archive before giving up
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Table rows per page: 5, 10, 20 or 50
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Archive endpoint to query instead of the public Open-Meteo one
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print the table to stdout instead of opening the dashboard
    #[arg(long)]
    pub plain: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Validated query to fetch on startup
    pub query: WeatherQuery,
    /// Timeout applied to each fetch
    pub timeout: Duration,
    /// Initial table page size
    pub page_size: usize,
    /// Archive endpoint override
    pub base_url: Option<String>,
    /// Print and exit instead of running the dashboard
    pub plain: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments, resolving default
    /// dates against the current time.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with a validated query
    /// * `Err(CliError)` if a date, coordinate, page size or timeout is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Self::from_cli_at(cli, Utc::now())
    }

    /// Same as [`from_cli`](Self::from_cli) with an explicit "now"
    pub fn from_cli_at(cli: &Cli, now: DateTime<Utc>) -> Result<Self, CliError> {
        let start = cli.start.as_deref().map(parse_date_arg).transpose()?;
        let end = cli.end.as_deref().map(parse_date_arg).transpose()?;

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, now),
            (None, Some(end)) => default_range(end)?,
            (None, None) => default_range(now)?,
        };

        let query = WeatherQuery::new(cli.latitude, cli.longitude, start, end)?;

        if !PAGE_SIZES.contains(&cli.page_size) {
            return Err(CliError::InvalidPageSize(cli.page_size));
        }
        if cli.timeout == 0 {
            return Err(CliError::InvalidTimeout);
        }

        Ok(StartupConfig {
            query,
            timeout: Duration::from_secs(cli.timeout),
            page_size: cli.page_size,
            base_url: cli.base_url.clone(),
            plain: cli.plain,
        })
    }

    /// Builds the gateway described by this configuration
    pub fn gateway(&self) -> WeatherGateway {
        match &self.base_url {
            Some(url) => WeatherGateway::new().with_base_url(url.clone()),
            None => WeatherGateway::new(),
        }
    }
}

//! Application state management for Weather Box
//!
//! This module contains the dashboard state, handling keyboard input, data
//! loading through the gateway, and the table's paging state.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use std::future::Future;
use std::time::Duration;

use crate::cache::CacheKey;
use crate::cli::StartupConfig;
use crate::data::{DailyWeatherRecord, WeatherError, WeatherGateway, WeatherQuery, WeatherSeries};
use crate::pagination::Pagination;

/// Shown when the archive returns no days for the query
pub const NO_DATA_MESSAGE: &str = "No weather data available for the selected period and location";

/// Result of a fetch started by [`App::start_load`]
#[derive(Debug)]
pub struct LoadOutcome {
    /// The query's key was already cached when the fetch started
    pub from_cache: bool,
    pub result: Result<WeatherSeries, WeatherError>,
}

/// Application state enum representing what the dashboard shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// A fetch is in progress
    Loading,
    /// Data is available for the current query
    Ready,
    /// The last fetch failed; holds the user-facing message
    Failed(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Query the dashboard displays
    pub query: WeatherQuery,
    /// Last successfully loaded series
    pub series: Option<WeatherSeries>,
    /// Table paging state
    pub pagination: Pagination,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a reload has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// One-line status shown in the footer
    pub status: Option<String>,
    /// Timestamp of last successful load
    pub last_refresh: Option<DateTime<Local>>,
    /// Timeout applied to each fetch
    timeout: Duration,
    /// Archive gateway (owns the cache)
    gateway: WeatherGateway,
}

impl App {
    /// Creates a new App from the startup configuration
    pub fn new(config: &StartupConfig) -> Self {
        Self::with_gateway(config.query, config.gateway(), config.timeout, config.page_size)
    }

    /// Creates a new App with a custom gateway
    pub fn with_gateway(
        query: WeatherQuery,
        gateway: WeatherGateway,
        timeout: Duration,
        page_size: usize,
    ) -> Self {
        Self {
            state: AppState::Loading,
            query,
            series: None,
            pagination: Pagination::new(0, page_size),
            should_quit: false,
            refresh_requested: false,
            show_help: false,
            status: None,
            last_refresh: None,
            timeout,
            gateway,
        }
    }

    pub fn gateway(&self) -> &WeatherGateway {
        &self.gateway
    }

    /// Fetches the current query and updates state
    ///
    /// An empty series counts as a failure. On failure the previously loaded
    /// series stays available.
    pub async fn load(&mut self) {
        let outcome = self.start_load().await;
        self.finish_load(outcome);
    }

    /// Enters `Loading` and returns the fetch for the current query
    ///
    /// The returned future does not borrow the app, so the caller can keep
    /// handling keys while it runs. Dropping it cancels the request.
    pub fn start_load(&mut self) -> impl Future<Output = LoadOutcome> + 'static {
        self.state = AppState::Loading;
        let gateway = self.gateway.clone();
        let query = self.query;
        let timeout = self.timeout;

        async move {
            let from_cache = gateway.cache().contains(&CacheKey::for_query(&query));
            let result = gateway.fetch_with_timeout(&query, timeout).await;
            LoadOutcome { from_cache, result }
        }
    }

    /// Applies the result of a fetch started with [`start_load`](Self::start_load)
    pub fn finish_load(&mut self, outcome: LoadOutcome) {
        match outcome.result {
            Ok(series) if series.is_empty() => self.show_error(NO_DATA_MESSAGE.to_string()),
            Ok(series) => self.show_series(series, outcome.from_cache),
            Err(e) => self.show_error(e.user_message()),
        }
    }

    /// Installs a freshly loaded series and resets paging
    pub fn show_series(&mut self, series: WeatherSeries, from_cache: bool) {
        self.pagination.set_total(series.len());
        self.series = Some(series);
        self.state = AppState::Ready;
        self.last_refresh = Some(Local::now());
        self.status = Some(if from_cache {
            "Using cached weather data".to_string()
        } else {
            "Weather data loaded successfully".to_string()
        });
    }

    /// Records a failed load
    pub fn show_error(&mut self, message: String) {
        self.state = AppState::Failed(message);
        self.status = None;
    }

    /// Clears the gateway cache and schedules a reload
    pub fn clear_cache_and_reload(&mut self) {
        self.gateway.clear_cache();
        self.status = Some("Cache cleared".to_string());
        self.refresh_requested = true;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application (Esc closes help first)
    /// - `Left`/`h`, `Right`/`l`: Previous/next table page
    /// - `g`, `G`: First/last table page
    /// - `+`/`=`, `-`: Next/previous rows-per-page choice
    /// - `r`: Reload (served from cache when unchanged)
    /// - `c`: Clear cache and reload
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Ready | AppState::Failed(_) => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.pagination.previous();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.pagination.next();
                }
                KeyCode::Char('g') => {
                    self.pagination.first();
                }
                KeyCode::Char('G') => {
                    self.pagination.last();
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.pagination.cycle_page_size(true);
                }
                KeyCode::Char('-') => {
                    self.pagination.cycle_page_size(false);
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('c') => {
                    self.clear_cache_and_reload();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Every loaded record, oldest first
    pub fn records(&self) -> &[DailyWeatherRecord] {
        self.series.as_deref().unwrap_or(&[])
    }

    /// Records on the current table page
    pub fn visible_records(&self) -> &[DailyWeatherRecord] {
        match &self.series {
            Some(series) => &series[self.pagination.visible_range()],
            None => &[],
        }
    }

    /// e.g. `Weather Data for 40.7128, -74.0060`
    pub fn location_heading(&self) -> String {
        format!(
            "Weather Data for {:.4}, {:.4}",
            self.query.latitude(),
            self.query.longitude()
        )
    }

    /// e.g. `Showing data from 1/1/2024 to 1/15/2024 (15 days)`
    pub fn range_summary(&self) -> Option<String> {
        let series = self.series.as_ref()?;
        let first = series.first()?;
        let last = series.last()?;
        Some(format!(
            "Showing data from {} to {} ({} days)",
            first.date.format("%-m/%-d/%Y"),
            last.date.format("%-m/%-d/%Y"),
            series.len()
        ))
    }
}

//! Process-lifetime cache shared by gateway handles
//!
//! Provides a `WeatherCache` that stores fetched series in memory behind a
//! cheap cloneable handle. Clones share the same map, so a cache can be
//! injected into several gateways on purpose; separately constructed caches
//! never share state.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::data::{WeatherQuery, WeatherSeries};

/// Identifier for one cached series
///
/// Built from the four query fields with no rounding: coordinates use the
/// shortest round-trip float representation and the instants keep millisecond
/// precision, so queries differing only in time of day get different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a query
    pub fn for_query(query: &WeatherQuery) -> Self {
        Self(format!(
            "{},{},{},{}",
            query.latitude(),
            query.longitude(),
            format_instant(query.start_date()),
            format_instant(query.end_date()),
        ))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Unbounded in-memory map from [`CacheKey`] to fetched series
#[derive(Debug, Clone, Default)]
pub struct WeatherCache {
    entries: Arc<RwLock<HashMap<CacheKey, WeatherSeries>>>,
}

impl WeatherCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the series stored under `key`, if any
    pub fn get(&self, key: &CacheKey) -> Option<WeatherSeries> {
        self.entries.read().get(key).cloned()
    }

    /// Stores `series` under `key` unless an entry already exists
    ///
    /// Returns whichever series ends up cached. An existing entry is kept as is,
    /// so a slower duplicate fetch never replaces what callers may already hold.
    pub fn insert(&self, key: CacheKey, series: WeatherSeries) -> WeatherSeries {
        self.entries.write().entry(key).or_insert(series).clone()
    }

    /// Whether an entry exists for `key`
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of cached series
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

//! In-memory cache for fetched weather series
//!
//! The cache maps a [`CacheKey`] derived from a query to the series the archive
//! returned for it. Entries never expire and are never overwritten; the only way
//! to drop them is a full [`WeatherCache::clear`].

mod memory;

pub use memory::{CacheKey, WeatherCache};

//! Weather Box Library
//!
//! Historical daily temperature statistics from the Open-Meteo archive: a
//! memoizing gateway, query validation, table paging, and the terminal
//! dashboard built on top of them.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod pagination;
pub mod report;
pub mod ui;

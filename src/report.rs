//! Plain-text rendering for `--plain` mode

use std::fmt::Write;

use crate::data::{format_day, format_temperature, DailyWeatherRecord};

/// Column headings, in table order
pub const COLUMN_HEADERS: [&str; 7] = [
    "Date",
    "Max Temp",
    "Min Temp",
    "Mean Temp",
    "Max Apparent",
    "Min Apparent",
    "Mean Apparent",
];

const DATE_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 14;

/// Renders a heading, optional summary line and one row per record
pub fn render_report(heading: &str, summary: Option<&str>, records: &[DailyWeatherRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);
    if let Some(summary) = summary {
        let _ = writeln!(out, "{}", summary);
    }
    out.push('\n');

    let _ = write!(out, "{:<DATE_WIDTH$}", COLUMN_HEADERS[0]);
    for header in &COLUMN_HEADERS[1..] {
        let _ = write!(out, "{:>VALUE_WIDTH$}", header);
    }
    out.push('\n');

    for record in records {
        let _ = write!(out, "{:<DATE_WIDTH$}", format_day(record.date));
        for value in record.values() {
            let _ = write!(out, "{:>VALUE_WIDTH$}", format_temperature(value));
        }
        out.push('\n');
    }

    out
}

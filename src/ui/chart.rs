//! Temperature line chart
//!
//! Plots the six daily temperature statistics of the whole loaded series
//! against the day index. Missing values leave a gap in their line.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::DailyWeatherRecord;

/// Legend name and colour for each statistic, in [`DailyWeatherRecord::values`] order
const SERIES_STYLES: [(&str, Color); 6] = [
    ("Max Temperature", Color::Red),
    ("Min Temperature", Color::Blue),
    ("Mean Temperature", Color::Green),
    ("Max Apparent Temp", Color::LightRed),
    ("Min Apparent Temp", Color::LightBlue),
    ("Mean Apparent Temp", Color::LightGreen),
];

/// Padding added above and below the plotted range, in °C
const Y_MARGIN: f64 = 2.0;

/// Renders the chart for the app's loaded series
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Temperature Overview ")
        .borders(Borders::ALL);

    let records = app.records();
    if records.is_empty() {
        let placeholder = Paragraph::new("No weather data to display")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let points: Vec<Vec<(f64, f64)>> = (0..SERIES_STYLES.len())
        .map(|i| series_points(records, i))
        .collect();

    let datasets = SERIES_STYLES
        .iter()
        .zip(&points)
        .map(|((name, color), data)| {
            Dataset::default()
                .name(*name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(data)
        })
        .collect::<Vec<_>>();

    let [y_min, y_max] = y_bounds(&points);
    let x_max = (records.len() - 1).max(1) as f64;

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels(records)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("°C", Style::default().add_modifier(Modifier::BOLD)))
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels([
                    format!("{:.0}°C", y_min),
                    format!("{:.0}°C", (y_min + y_max) / 2.0),
                    format!("{:.0}°C", y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

/// `(day index, value)` points for one statistic, skipping missing values
fn series_points(records: &[DailyWeatherRecord], statistic: usize) -> Vec<(f64, f64)> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| record.values()[statistic].map(|v| (i as f64, v)))
        .collect()
}

fn y_bounds(points: &[Vec<(f64, f64)>]) -> [f64; 2] {
    let mut values = points.iter().flatten().map(|&(_, y)| y);
    let Some(first) = values.next() else {
        return [0.0, 1.0];
    };
    let (min, max) = values.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    [(min - Y_MARGIN).floor(), (max + Y_MARGIN).ceil()]
}

/// First, middle and last dates as `m/d`
fn x_labels(records: &[DailyWeatherRecord]) -> Vec<String> {
    let label = |record: &DailyWeatherRecord| record.date.format("%-m/%-d").to_string();
    match records {
        [] => Vec::new(),
        [only] => vec![label(only)],
        [first, .., last] => vec![label(first), label(&records[records.len() / 2]), label(last)],
    }
}

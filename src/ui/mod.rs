//! UI rendering module for Weather Box
//!
//! This module contains all the rendering logic for the terminal dashboard,
//! using the ratatui library for TUI components.

pub mod chart;
pub mod help_overlay;
pub mod table;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState};

pub use chart::render as render_chart;
pub use help_overlay::render as render_help_overlay;
pub use table::render as render_table;

/// Renders the whole dashboard for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.state == AppState::Loading && app.series.is_none() {
        render_loading(frame, area);
        return;
    }

    let error = match &app.state {
        AppState::Failed(message) => Some(message.as_str()),
        _ => None,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(if error.is_some() { 4 } else { 0 }),
            Constraint::Percentage(45),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0]);
    render_summary(frame, app, chunks[1]);
    if let Some(message) = error {
        render_error(frame, message, chunks[2]);
    }
    chart::render(frame, app, chunks[3]);
    table::render(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);

    if app.show_help {
        help_overlay::render(frame);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut Frame, area: Rect) {
    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading weather data...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        "\u{26C5} Weather Box",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    let source = Paragraph::new(Span::styled(
        "Open-Meteo API",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Right);

    frame.render_widget(title, halves[0]);
    frame.render_widget(source, halves[1]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        app.location_heading(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(summary) = app.range_summary() {
        lines.push(Line::from(Span::styled(
            summary,
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let paragraph = Paragraph::new(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    ))
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "←/→ page  +/- rows  r reload  c clear cache  ? help  q quit",
        Style::default().fg(Color::DarkGray),
    )];

    if app.state == AppState::Loading {
        spans.push(Span::styled("  Loading...", Style::default().fg(Color::Cyan)));
    } else if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Green),
        ));
    }
    if let Some(at) = app.last_refresh {
        spans.push(Span::styled(
            format!("  Updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

//! Paged table of daily records
//!
//! Shows the current page of the loaded series with one column per
//! statistic, followed by the page strip, the entry caption and the
//! rows-per-page selector.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{format_day, format_temperature};
use crate::pagination::{PageItem, Pagination, PAGE_SIZES};
use crate::report::COLUMN_HEADERS;

/// Renders the table for the app's current page
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Weather Data Table ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    render_rows(frame, app, chunks[0]);
    render_page_strip(frame, &app.pagination, chunks[1]);
    render_page_sizes(frame, &app.pagination, chunks[2]);
}

fn render_rows(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(COLUMN_HEADERS.iter().enumerate().map(|(i, title)| {
        let cell = Cell::from(Text::from(*title).alignment(column_alignment(i)));
        cell.style(Style::default().add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().fg(Color::Yellow))
    .bottom_margin(1);

    let rows = app.visible_records().iter().map(|record| {
        let mut cells = vec![Cell::from(format_day(record.date))];
        cells.extend(record.values().into_iter().map(|value| {
            let text = Text::from(format_temperature(value)).alignment(Alignment::Right);
            Cell::from(text)
        }));
        Row::new(cells)
    });

    let mut widths = vec![Constraint::Length(18)];
    widths.extend([Constraint::Min(10); 6]);

    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, area);
}

fn column_alignment(column: usize) -> Alignment {
    if column == 0 {
        Alignment::Left
    } else {
        Alignment::Right
    }
}

/// Caption on the left, page numbers on the right
fn render_page_strip(frame: &mut Frame, pagination: &Pagination, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let caption = Paragraph::new(Span::styled(
        pagination.caption(),
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(caption, halves[0]);

    let pages = Paragraph::new(page_strip(pagination)).alignment(Alignment::Right);
    frame.render_widget(pages, halves[1]);
}

fn page_strip(pagination: &Pagination) -> Line<'static> {
    let mut spans = vec![Span::styled("‹ ", nav_style(pagination.current_page() > 1))];
    for item in pagination.page_numbers() {
        let span = match item {
            PageItem::Page(page) if page == pagination.current_page() => Span::styled(
                format!("[{}]", page),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            PageItem::Page(page) => Span::raw(format!(" {} ", page)),
            PageItem::Ellipsis => Span::styled(" … ", Style::default().fg(Color::DarkGray)),
        };
        spans.push(span);
    }
    spans.push(Span::styled(
        " ›",
        nav_style(pagination.current_page() < pagination.total_pages()),
    ));
    Line::from(spans)
}

fn nav_style(enabled: bool) -> Style {
    if enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_page_sizes(frame: &mut Frame, pagination: &Pagination, area: Rect) {
    let mut spans = vec![Span::styled(
        "Rows per page: ",
        Style::default().fg(Color::Gray),
    )];
    for size in PAGE_SIZES {
        if size == pagination.page_size() {
            spans.push(Span::styled(
                format!("[{}] ", size),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(format!("{} ", size)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

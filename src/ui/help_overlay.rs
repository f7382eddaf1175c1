//! Key binding reference drawn over the dashboard

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Bindings grouped by what they act on
const KEY_BINDINGS: [(&str, &[(&str, &str)]); 3] = [
    (
        "Table",
        &[
            ("←/h, →/l", "Previous/next page"),
            ("g, G", "First/last page"),
            ("+, -", "More/fewer rows per page"),
        ],
    ),
    (
        "Data",
        &[
            ("r", "Reload (uses cache)"),
            ("c", "Clear cache and reload"),
        ],
    ),
    (
        "Other",
        &[("?", "Toggle this help"), ("q, Esc", "Quit application")],
    ),
];

const KEY_COLUMN: usize = 12;

/// Renders the help box centered over whatever is on screen
pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let area = centered(frame.area(), width, height);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        area,
    );
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (group, bindings) in KEY_BINDINGS {
        lines.push(Line::from(Span::styled(
            group,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(bindings.iter().map(|&(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<KEY_COLUMN$}", keys),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(action),
            ])
        }));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Press Esc or ? to close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

/// A `width` x `height` rect in the middle of `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme;

pub fn render(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 21, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        header_line("Sampling"),
        key_line("+ / -", "Faster / slower update interval"),
        key_line("[ / ]", "Shorter / longer history (10 columns)"),
        key_line("m", "Pause or resume sampling"),
        Line::raw(""),
        header_line("Display"),
        key_line("a", "Show or hide the aggregate lane"),
        key_line("r", "Ramp from background or foregrounds only"),
        key_line("e", "Dim band edges"),
        Line::raw(""),
        header_line("General"),
        key_line("Enter", "Run the task manager command"),
        key_line("?", "Toggle this help"),
        key_line("q / Ctrl+C", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  Any key closes this window.",
            theme::label_style(),
        )),
    ];

    let block = Block::default()
        .title(Line::styled(" Help ", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .style(ratatui::style::Style::default().bg(theme::BASE));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, popup);
}

fn header_line(text: &str) -> Line<'_> {
    Line::from(Span::styled(format!("  {text}"), theme::title_style()))
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<14}"), theme::key_hint_style()),
        Span::styled(desc, theme::label_style()),
    ])
}

fn centered_rect(width_pct: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_pct) / 2),
            Constraint::Percentage(width_pct),
            Constraint::Percentage((100 - width_pct) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

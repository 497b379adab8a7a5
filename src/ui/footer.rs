use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::theme;
use crate::app::App;
use crate::update::Mode;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let hints = vec![
        Span::styled(" q", theme::key_hint_style()),
        Span::styled(" quit  ", theme::label_style()),
        Span::styled("?", theme::key_hint_style()),
        Span::styled(" help  ", theme::label_style()),
        Span::styled("+/-", theme::key_hint_style()),
        Span::styled(" rate  ", theme::label_style()),
        Span::styled("[/]", theme::key_hint_style()),
        Span::styled(" size  ", theme::label_style()),
        Span::styled("a", theme::key_hint_style()),
        Span::styled(" avg  ", theme::label_style()),
        Span::styled("r", theme::key_hint_style()),
        Span::styled(" ramp  ", theme::label_style()),
        Span::styled("e", theme::key_hint_style()),
        Span::styled(" edges  ", theme::label_style()),
        Span::styled("m", theme::key_hint_style()),
        Span::styled(" mode  ", theme::label_style()),
        Span::styled("Enter", theme::key_hint_style()),
        Span::styled(" run", theme::label_style()),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(28)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(hints)).style(theme::footer_style()),
        chunks[0],
    );

    let mode = match app.cycle.mode {
        Mode::Waterfall => "waterfall",
        Mode::Disabled => "disabled",
    };
    let status = Line::from(vec![
        Span::styled(format!("{} ", app.palette.ramp.label()), theme::label_style()),
        Span::styled(format!("{} cols ", app.size), theme::value_style()),
        Span::styled(format!("{mode} "), theme::value_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Right)
            .style(theme::footer_style()),
        chunks[1],
    );
}

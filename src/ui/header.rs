use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::theme;
use crate::app::App;
use crate::util::{format_interval, format_load, format_percent};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(" cpufall ", theme::title_style()),
        Span::styled(format!("  {}", app.hostname), theme::value_style()),
        Span::styled(format!("  {} cores", app.core_count), theme::label_style()),
        Span::styled("  cpu ", theme::label_style()),
    ];

    match app.usage_percent() {
        Some(p) => spans.push(Span::styled(format_percent(p), theme::usage_style(p))),
        None => spans.push(Span::styled(" --", theme::label_style())),
    }

    if let Some(load) = app.load_avg {
        spans.push(Span::styled(
            format!("  load {}", format_load(load)),
            theme::label_style(),
        ));
    }

    spans.push(Span::styled(
        format!("  every {}", format_interval(app.cycle.rate.interval_ms())),
        theme::label_style(),
    ));

    let skipped = app.cycle.skipped();
    if skipped > 0 {
        spans.push(Span::styled(
            format!("  {skipped} skipped"),
            theme::usage_style(100),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(theme::header_style()),
        area,
    );
}

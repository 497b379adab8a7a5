use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(3),    // waterfall
            Constraint::Length(1), // footer
        ])
        .split(area);

    AppLayout {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Right-aligned slice of `area` at most `columns` wide. New samples enter at
/// the right edge, so a narrow history hugs that side.
pub fn history_columns(area: Rect, columns: u32) -> Rect {
    let width = u32::from(area.width).min(columns) as u16;
    Rect {
        x: area.x + area.width - width,
        width,
        ..area
    }
}

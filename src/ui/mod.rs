pub mod footer;
pub mod header;
pub mod help;
pub mod layout;
pub mod palette;
pub mod surface;
pub mod theme;
pub mod waterfall;
pub mod widgets;

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::app::App;
use widgets::waterfall_panel;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);

    header::render(frame, app_layout.header, app);

    let view = waterfall_view_area(area, app.size);
    waterfall_panel::render(frame, app_layout.body, view, app);

    footer::render(frame, app_layout.footer, app);

    if app.show_help {
        help::render(frame, area);
    }
}

/// Cells the waterfall occupies for a terminal of `area`, at most `columns`
/// wide.
pub fn waterfall_view_area(area: Rect, columns: u32) -> Rect {
    let body = layout::compute_layout(area).body;
    // mode only affects the title, not the inner area
    let inner = waterfall_panel::block(Default::default()).inner(body);
    layout::history_columns(inner, columns)
}

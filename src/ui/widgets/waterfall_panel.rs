use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Color;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::Frame;

use crate::app::App;
use crate::ui::palette::Pixel;
use crate::ui::theme;
use crate::ui::waterfall::ScrollingRenderer;
use crate::update::Mode;

/// Upper half block: foreground paints the top pixel row of a cell, background
/// the bottom one.
const HALF_BLOCK: char = '\u{2580}';

/// Outer block of the panel. Shared with the surface sizing so both agree on
/// the drawable area.
pub fn block(mode: Mode) -> Block<'static> {
    let title = match mode {
        Mode::Waterfall => " CPU load ".to_string(),
        Mode::Disabled => " CPU load (paused) ".to_string(),
    };
    Block::default()
        .title(Line::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style())
}

pub fn render(frame: &mut Frame, area: Rect, view: Rect, app: &App) {
    frame.render_widget(block(app.cycle.mode), area);

    if app.core_count == 0 || app.renderer.size().is_none() {
        let inner = block(app.cycle.mode).inner(area);
        let text = Paragraph::new(Line::styled("no CPU data", theme::label_style()))
            .alignment(Alignment::Center);
        frame.render_widget(text, inner);
        return;
    }

    frame.render_widget(WaterfallView::new(&app.renderer), view);
}

/// Blits the renderer's scrolled surface, two pixel rows per cell.
pub struct WaterfallView<'a> {
    renderer: &'a ScrollingRenderer,
}

impl<'a> WaterfallView<'a> {
    pub fn new(renderer: &'a ScrollingRenderer) -> Self {
        Self { renderer }
    }
}

impl Widget for WaterfallView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = col as usize;
                let top = self.renderer.presented(x, row as usize * 2);
                let bottom = self.renderer.presented(x, row as usize * 2 + 1);
                let (Some(top), Some(bottom)) = (top, bottom) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(HALF_BLOCK)
                        .set_fg(to_color(top))
                        .set_bg(to_color(bottom));
                }
            }
        }
    }
}

fn to_color(p: Pixel) -> Color {
    Color::Rgb(p.r, p.g, p.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::history::HistoryStore;
    use crate::ui::palette::Palette;

    #[test]
    fn cells_carry_two_pixel_rows() {
        let palette = Palette::default();
        let mut history = HistoryStore::new(2);
        history.resize(4, 100, 2000);
        history.append(0, &[1.0, 1.0]).unwrap();

        let mut renderer = ScrollingRenderer::new(false, false);
        renderer.ensure_surface(4, 4, &palette);
        renderer.paint_column(&history, &palette);

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        WaterfallView::new(&renderer).render(area, &mut buf);

        let red = Color::Rgb(255, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        let newest = &buf[(3, 0)];
        assert_eq!(newest.symbol(), "\u{2580}");
        assert_eq!(newest.fg, red);
        assert_eq!(newest.bg, red);
        let oldest = &buf[(0, 1)];
        assert_eq!(oldest.fg, white);
        assert_eq!(oldest.bg, white);
    }

    #[test]
    fn missing_surface_leaves_buffer_untouched() {
        let renderer = ScrollingRenderer::new(true, false);
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        WaterfallView::new(&renderer).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}

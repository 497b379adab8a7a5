use super::palette::{Palette, Pixel, Rgba};
use super::surface::{Damage, Surface};
use crate::metrics::history::{HistoryError, HistoryStore, Sample};

/// What a horizontal band of the strip shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    /// A history core; index 0 is the aggregate.
    Core(usize),
    /// Background gap under the aggregate lane.
    Separator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    pub lane: Lane,
    pub y0: usize,
    pub y1: usize,
}

/// Splits `height` rows into equal bands, one per real core.
///
/// `history_cores` counts the aggregate pseudo-core. With the aggregate lane
/// on, it takes the first band and a separator band follows it.
pub fn band_layout(history_cores: usize, show_average: bool, height: usize) -> Vec<Band> {
    let real = history_cores.saturating_sub(1);
    if real == 0 || height == 0 {
        return Vec::new();
    }

    let mut lanes = Vec::with_capacity(real + 2);
    if show_average {
        lanes.push(Lane::Core(0));
        lanes.push(Lane::Separator);
    }
    lanes.extend((1..=real).map(Lane::Core));

    let units = lanes.len();
    lanes
        .into_iter()
        .enumerate()
        .map(|(bar, lane)| Band {
            lane,
            y0: height * bar / units,
            y1: height * (bar + 1) / units,
        })
        .collect()
}

/// Draws the newest column of a [`HistoryStore`] into a persistent surface.
///
/// Old columns are never touched again. The display reads the surface
/// through a repeating tile shifted by the write cursor, so the most recent
/// column always lands on the right edge and one tick costs one column.
#[derive(Default)]
pub struct ScrollingRenderer {
    surface: Option<Surface>,
    cursor_x: usize,
    show_average: bool,
    band_edges: bool,
}

impl ScrollingRenderer {
    pub fn new(show_average: bool, band_edges: bool) -> Self {
        Self {
            surface: None,
            cursor_x: 0,
            show_average,
            band_edges,
        }
    }

    pub fn show_average(&self) -> bool {
        self.show_average
    }

    pub fn set_show_average(&mut self, show_average: bool) {
        self.show_average = show_average;
    }

    pub fn band_edges(&self) -> bool {
        self.band_edges
    }

    pub fn set_band_edges(&mut self, band_edges: bool) {
        self.band_edges = band_edges;
    }

    pub fn cursor_x(&self) -> usize {
        self.cursor_x
    }

    pub fn size(&self) -> Option<(usize, usize)> {
        self.surface.as_ref().map(|s| (s.width(), s.height()))
    }

    /// (Re)builds the surface when the size changed. Returns `true` when a
    /// fresh, background-filled surface was allocated.
    pub fn ensure_surface(&mut self, width: usize, height: usize, palette: &Palette) -> bool {
        if width == 0 || height == 0 {
            if self.surface.take().is_some() {
                log::debug!("waterfall surface collapsed");
            }
            return false;
        }
        if self.size() == Some((width, height)) {
            return false;
        }

        log::debug!("waterfall surface rebuilt at {width}x{height}");
        let mut surface = Surface::new(width, height, palette.background.to_pixel());
        surface.mark_all_dirty();
        self.surface = Some(surface);
        self.cursor_x = 0;
        true
    }

    /// Drops the surface so the next [`ensure_surface`](Self::ensure_surface)
    /// starts over, e.g. after the background colour changed.
    pub fn invalidate(&mut self) {
        self.surface = None;
    }

    pub fn paint_column(&mut self, history: &HistoryStore, palette: &Palette) {
        self.paint_next(history, palette, |core| history.latest(core));
    }

    /// Replays retained samples into a freshly built surface, oldest first,
    /// so a rebuild does not blank what the history still holds.
    pub fn backfill(&mut self, history: &HistoryStore, palette: &Palette) {
        let Some((width, _)) = self.size() else {
            return;
        };
        let depth = history.filled().min(width);
        for age in (0..depth).rev() {
            self.paint_next(history, palette, |core| history.at(core, age));
        }
    }

    fn paint_next<F>(&mut self, history: &HistoryStore, palette: &Palette, sample: F)
    where
        F: Fn(usize) -> Result<Sample, HistoryError>,
    {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let height = surface.height();
        let bands = band_layout(history.core_count(), self.show_average, height);
        if bands.is_empty() {
            return;
        }

        let x = self.cursor_x;
        for band in &bands {
            let colour = match band.lane {
                Lane::Core(core) => sample(core)
                    .map(|s| palette.interpolate(s.value))
                    .unwrap_or(palette.background),
                Lane::Separator => palette.background,
            };
            paint_band(surface, x, band, colour, palette.background, self.band_edges);
        }

        surface.mark_dirty(Damage {
            x,
            y: 0,
            width: 1,
            height,
        });
        self.cursor_x = (x + 1) % surface.width();
    }

    /// Pixel at logical position `x` of the scrolled view; the newest column
    /// is at `width - 1`.
    pub fn presented(&self, x: usize, y: usize) -> Option<Pixel> {
        self.surface.as_ref()?.tiled(self.cursor_x, x, y)
    }

    /// Raw surface pixel, ignoring the scroll offset.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        self.surface.as_ref()?.get(x, y)
    }

    pub fn take_damage(&mut self) -> Option<Damage> {
        self.surface.as_mut()?.take_damage()
    }
}

fn paint_band(
    surface: &mut Surface,
    x: usize,
    band: &Band,
    colour: Rgba,
    background: Rgba,
    edges: bool,
) {
    let Band { y0, y1, .. } = *band;
    if y1 <= y0 {
        return;
    }
    let body = colour.to_pixel();
    if !edges {
        surface.fill_column(x, y0, y1, body);
        return;
    }

    let edge = Rgba::lerp(background, colour, 0.5).to_pixel();
    surface.fill_column(x, y0, y0 + 1, edge);
    if y1 - y0 >= 2 {
        surface.fill_column(x, y0 + 1, y1 - 1, body);
        surface.fill_column(x, y1 - 1, y1, edge);
    }
}

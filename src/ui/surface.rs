use super::palette::Pixel;

/// Rectangle of the surface touched since damage was last taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Damage {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Damage {
    /// Smallest rectangle covering both.
    pub fn union(self, other: Damage) -> Damage {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Damage {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// A persistent row-major RGB raster.
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
    damage: Option<Damage>,
}

impl Surface {
    pub fn new(width: usize, height: usize, fill: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
            damage: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fills rows `y0..y1` of column `x`. Out-of-range rows are ignored.
    pub fn fill_column(&mut self, x: usize, y0: usize, y1: usize, pixel: Pixel) {
        if x >= self.width {
            return;
        }
        for y in y0..y1.min(self.height) {
            self.pixels[y * self.width + x] = pixel;
        }
    }

    /// Grows the pending damage to cover `damage` as well.
    pub fn mark_dirty(&mut self, damage: Damage) {
        self.damage = Some(match self.damage {
            Some(pending) => pending.union(damage),
            None => damage,
        });
    }

    pub fn mark_all_dirty(&mut self) {
        self.mark_dirty(Damage {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        });
    }

    pub fn take_damage(&mut self) -> Option<Damage> {
        self.damage.take()
    }

    /// Reads through an infinitely repeating copy of the surface shifted left
    /// by `offset` columns.
    pub fn tiled(&self, offset: usize, x: usize, y: usize) -> Option<Pixel> {
        if self.width == 0 {
            return None;
        }
        self.get((offset + x) % self.width, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Pixel = Pixel { r: 1, g: 2, b: 3 };
    const FG: Pixel = Pixel { r: 200, g: 0, b: 0 };

    #[test]
    fn fill_column_stays_in_bounds() {
        let mut s = Surface::new(4, 3, BG);
        s.fill_column(2, 1, 10, FG);
        assert_eq!(s.get(2, 0), Some(BG));
        assert_eq!(s.get(2, 1), Some(FG));
        assert_eq!(s.get(2, 2), Some(FG));
        assert_eq!(s.get(1, 1), Some(BG));
        s.fill_column(9, 0, 3, FG);
        assert_eq!(s.get(9, 0), None);
    }

    #[test]
    fn tiling_wraps_horizontally() {
        let mut s = Surface::new(3, 1, BG);
        s.fill_column(0, 0, 1, FG);
        assert_eq!(s.tiled(1, 2, 0), Some(FG));
        assert_eq!(s.tiled(1, 0, 0), Some(BG));
        assert_eq!(s.tiled(0, 3, 0), Some(FG));
    }

    #[test]
    fn damage_is_taken_once() {
        let mut s = Surface::new(2, 2, BG);
        let d = Damage {
            x: 1,
            y: 0,
            width: 1,
            height: 2,
        };
        s.mark_dirty(d);
        assert_eq!(s.take_damage(), Some(d));
        assert_eq!(s.take_damage(), None);
    }

    #[test]
    fn pending_damage_accumulates() {
        let mut s = Surface::new(6, 2, BG);
        for x in [1, 4, 2] {
            s.mark_dirty(Damage {
                x,
                y: 0,
                width: 1,
                height: 2,
            });
        }
        assert_eq!(
            s.take_damage(),
            Some(Damage {
                x: 1,
                y: 0,
                width: 4,
                height: 2
            })
        );

        s.mark_all_dirty();
        assert_eq!(
            s.take_damage(),
            Some(Damage {
                x: 0,
                y: 0,
                width: 6,
                height: 2
            })
        );
    }
}

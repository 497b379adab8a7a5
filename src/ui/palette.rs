use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A colour with float components in `0.0..=1.0`.
///
/// Persisted as an `"R,G,B,A"` string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// An 8-bit RGB pixel as stored in the render surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Error, Debug, PartialEq)]
#[error("invalid colour {0:?}, expected \"R,G,B,A\" with components in 0..1")]
pub struct ParseColorError(pub String);

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Component-wise `a*(1-t) + b*t`; exact at both ends.
    pub fn lerp(from: Rgba, to: Rgba, t: f32) -> Rgba {
        let mix = |x: f32, y: f32| x * (1.0 - t) + y * t;
        Rgba {
            r: mix(from.r, to.r),
            g: mix(from.g, to.g),
            b: mix(from.b, to.b),
            a: mix(from.a, to.a),
        }
    }

    pub fn to_pixel(self) -> Pixel {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Pixel {
            r: byte(self.r),
            g: byte(self.g),
            b: byte(self.b),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err())?;
        let [r, g, b, a] = parts[..] else {
            return Err(err());
        };
        if [r, g, b, a].iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(err());
        }
        Ok(Rgba::new(r, g, b, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

/// Which colours span the load ramp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RampAnchors {
    /// `background -> foreground1 -> foreground2`
    #[default]
    WithBackground,
    /// `foreground1 -> foreground2`
    ForegroundOnly,
}

impl RampAnchors {
    pub fn toggle(self) -> Self {
        match self {
            RampAnchors::WithBackground => RampAnchors::ForegroundOnly,
            RampAnchors::ForegroundOnly => RampAnchors::WithBackground,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RampAnchors::WithBackground => "bg ramp",
            RampAnchors::ForegroundOnly => "fg ramp",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub foreground1: Rgba,
    pub foreground2: Rgba,
    pub ramp: RampAnchors,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            foreground1: Rgba::BLACK,
            foreground2: Rgba::RED,
            ramp: RampAnchors::WithBackground,
        }
    }
}

impl Palette {
    pub fn interpolate(&self, load: f32) -> Rgba {
        match self.ramp {
            RampAnchors::WithBackground => {
                lerp_table(&[self.background, self.foreground1, self.foreground2], load)
            }
            RampAnchors::ForegroundOnly => lerp_table(&[self.foreground1, self.foreground2], load),
        }
    }
}

/// Piecewise-linear ramp over equally spaced anchors.
///
/// An empty table yields transparent black; a single anchor is constant.
pub fn lerp_table(anchors: &[Rgba], load: f32) -> Rgba {
    let n = anchors.len();
    match n {
        0 => return Rgba::new(0.0, 0.0, 0.0, 0.0),
        1 => return anchors[0],
        _ => {}
    }

    let load = if load.is_nan() { 0.0 } else { load.clamp(0.0, 1.0) };
    let scaled = load * (n - 1) as f32;
    let i0 = (scaled as usize).min(n - 2);
    let t = scaled - i0 as f32;
    let i1 = (i0 + 1).min(n - 1);
    Rgba::lerp(anchors[i0], anchors[i1], t)
}

// File: crates/tsgraph-core/src/types.rs
// Summary: Shared types and constants (sizes, colors, flags, alignment enums).

use bitflags::bitflags;

/// Default plot-area width in pixels.
pub const WIDTH: u32 = 400;
/// Default plot-area height in pixels.
pub const HEIGHT: u32 = 100;

/// Maximum number of title lines kept after splitting.
pub const MAX_TITLE_LINES: usize = 3;
/// Capacity of a legend/label buffer in bytes, terminator included.
pub const LEGEND_BUF_LEN: usize = 200;
/// Rotation applied to the y-axis unit legends.
pub const YLEGEND_ANGLE: f64 = -90.0;

/// Stroke width of major grid lines and axes.
pub const MGRID_WIDTH: f64 = 0.6;
/// Stroke width of minor grid lines.
pub const GRID_WIDTH: f64 = 0.4;

/// RGBA color with components in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v, 1.0)
    }

    /// Parse a packed `0xRRGGBBAA` value.
    pub fn from_hex(rgba: u32) -> Self {
        let c = |shift: u32| ((rgba >> shift) & 0xff) as f64 / 255.0;
        Self::new(c(24), c(16), c(8), c(0))
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Color as 8-bit ARGB channels.
    pub fn to_argb8(self) -> (u8, u8, u8, u8) {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.a), q(self.r), q(self.g), q(self.b))
    }
}

bitflags! {
    /// Rendering switches carried by `RenderOptions`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ChartFlags: u32 {
        const ALT_Y_GRID = 1 << 0;
        const ALT_AUTOSCALE = 1 << 1;
        const ALT_AUTOSCALE_MIN = 1 << 2;
        const ALT_AUTOSCALE_MAX = 1 << 3;
        const NO_LEGEND = 1 << 4;
        const NO_MINOR = 1 << 5;
        const ONLY_GRAPH = 1 << 6;
        const FORCE_RULES_LEGEND = 1 << 7;
        const FORCE_UNITS_SI = 1 << 8;
        const FULL_SIZE_MODE = 1 << 9;
        const FORCE_UTC_TIME = 1 << 10;
    }
}

/// Compass position of the legend block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendPosition {
    North,
    West,
    #[default]
    South,
    East,
}

/// Stacking order of legend lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendDirection {
    #[default]
    TopDown,
    BottomUp,
    /// Reverse only the span of lines holding graph legends; comments stay put.
    BottomUp2,
}

/// Default alignment for legend lines without an explicit control code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justified,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Bottom,
    Center,
}

/// Dash pattern with phase offset, in pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Dash {
    pub intervals: Vec<f64>,
    pub offset: f64,
}

impl Dash {
    pub fn new(intervals: impl Into<Vec<f64>>, offset: f64) -> Self {
        Self { intervals: intervals.into(), offset }
    }
}

/// Unix time span `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: i64,
    pub end: i64,
}

impl TimeSpan {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
    pub const fn len(&self) -> i64 { self.end - self.start }
    pub const fn is_empty(&self) -> bool { self.end <= self.start }
    #[inline]
    pub fn contains(&self, t: i64) -> bool { t >= self.start && t <= self.end }
}

// File: crates/tsgraph-core/src/axis.rs
// Summary: Y-axis range model: SI units, range expansion, grid-step solving and gridfit.

use tracing::{trace, warn};

use crate::format::ValueFormatter;
use crate::numeric::si_unit;
use crate::scale::ValueScale;
use crate::types::ChartFlags;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Log10,
}

/// Grid-step candidate with its label-thinning factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YLabel {
    pub grid: f64,
    pub lfac: [i32; 4],
}

/// Candidates for the classic linear grid, in ascending step order.
pub const YLAB: [YLabel; 12] = [
    YLabel { grid: 0.1, lfac: [1, 2, 5, 10] },
    YLabel { grid: 0.2, lfac: [1, 5, 10, 20] },
    YLabel { grid: 0.5, lfac: [1, 2, 4, 10] },
    YLabel { grid: 1.0, lfac: [1, 2, 5, 10] },
    YLabel { grid: 2.0, lfac: [1, 5, 10, 20] },
    YLabel { grid: 5.0, lfac: [1, 2, 4, 10] },
    YLabel { grid: 10.0, lfac: [1, 2, 5, 10] },
    YLabel { grid: 20.0, lfac: [1, 5, 10, 20] },
    YLabel { grid: 50.0, lfac: [1, 2, 4, 10] },
    YLabel { grid: 100.0, lfac: [1, 2, 5, 10] },
    YLabel { grid: 200.0, lfac: [1, 5, 10, 20] },
    YLabel { grid: 500.0, lfac: [1, 2, 4, 10] },
];

/// Conventional bound multipliers, descending; the walk stops at the first non-positive entry.
const SENSIBLE_VALUES: [f64; 48] = [
    1000.0, 900.0, 800.0, 750.0, 700.0, 600.0, 500.0, 400.0, 300.0, 250.0, 200.0, 125.0, 100.0,
    90.0, 80.0, 75.0, 70.0, 60.0, 50.0, 40.0, 30.0, 25.0, 20.0, 10.0, 9.0, 8.0, 7.0, 6.0, 5.0,
    4.0, 3.5, 3.0, 2.5, 2.0, 1.8, 1.5, 1.2, 1.0, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1, 0.0,
    -1.0,
];

/// Solved horizontal grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridScale {
    pub step: f64,
    pub label_factor: i32,
    /// printf-style label format produced by the alternate grid algorithm.
    pub label_format: String,
}

impl Default for GridScale {
    fn default() -> Self {
        Self { step: f64::NAN, label_factor: 2, label_format: String::new() }
    }
}

#[derive(Clone, Debug)]
pub struct Axis {
    /// Unit legend drawn rotated beside the axis.
    pub label: String,
    /// Bounds; NaN requests auto-ranging from the data.
    pub min: f64,
    pub max: f64,
    pub kind: ScaleKind,
    /// Rigid bounds never expand to fit the data.
    pub rigid: bool,
    /// With `rigid`, still allow shrinking to the observed data.
    pub allow_shrink: bool,
    /// SI base, 1000 or 1024.
    pub base: f64,
    /// Pin the displayed exponent (a multiple of three).
    pub units_exponent: Option<i32>,
    /// Label digit count used to size the label gutter.
    pub units_length: usize,
    /// Caller supplied grid step and label factor.
    pub grid_step: Option<f64>,
    pub label_factor: i32,
    /// Optional fixed label format for the tick labels.
    pub format: String,
    pub formatter: ValueFormatter,

    pub magfact: f64,
    pub viewfactor: f64,
    pub symbol: char,
    pub grid: GridScale,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            label: String::new(),
            min: f64::NAN,
            max: f64::NAN,
            kind: ScaleKind::Linear,
            rigid: false,
            allow_shrink: false,
            base: 1000.0,
            units_exponent: None,
            units_length: 6,
            grid_step: None,
            label_factor: 2,
            format: String::new(),
            formatter: ValueFormatter::Numeric,
            magfact: 1.0,
            viewfactor: 1.0,
            symbol: ' ',
            grid: GridScale::default(),
        }
    }
}

impl Axis {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, ..Self::default() }
    }

    pub fn log10(mut self) -> Self {
        self.kind = ScaleKind::Log10;
        self
    }

    pub fn rigid(mut self, allow_shrink: bool) -> Self {
        self.rigid = true;
        self.allow_shrink = allow_shrink;
        self
    }

    #[inline]
    pub fn is_log(&self) -> bool { self.kind == ScaleKind::Log10 }

    /// Pick the unit magnitude and symbol from the current bounds.
    pub fn apply_si_unit(&mut self) {
        let si = si_unit(self.base, self.min, self.max, self.units_exponent);
        self.magfact = si.magfact;
        self.viewfactor = si.viewfactor;
        self.symbol = si.symbol;
    }

    /// Widen the bounds according to the autoscale policy, or snap them to the
    /// caller's grid when one is given.
    pub fn expand_range(&mut self, flags: ChartFlags) {
        if let Some(step) = self.grid_step {
            let unit = f64::from(self.label_factor) * step;
            self.min = unit * (self.min / unit).floor();
            self.max = unit * (self.max / unit).ceil();
            return;
        }
        if flags.contains(ChartFlags::ALT_AUTOSCALE) {
            let delt = self.max - self.min;
            let mut adj = delt * 0.1;
            let fact = 2.0
                * 10f64.powf((self.min.abs().max(self.max.abs()) / self.magfact).log10().floor() - 2.0);
            if delt < fact {
                adj = (fact - delt) * 0.55;
            }
            self.min -= adj;
            self.max += adj;
        } else if flags.contains(ChartFlags::ALT_AUTOSCALE_MIN) {
            self.min -= (self.max - self.min) * 0.1;
        } else if flags.contains(ChartFlags::ALT_AUTOSCALE_MAX) {
            self.max += (self.max - self.min) * 0.1;
        } else {
            let sm = self.min / self.magfact;
            let s_max = self.max / self.magfact;
            let sv = &SENSIBLE_VALUES;
            let mut i = 1;
            while sv[i] > 0.0 {
                if sv[i - 1] >= sm && sv[i] <= sm {
                    self.min = sv[i] * self.magfact;
                }
                if -sv[i - 1] <= sm && -sv[i] >= sm {
                    self.min = -sv[i - 1] * self.magfact;
                }
                if sv[i - 1] >= s_max && sv[i] <= s_max {
                    self.max = sv[i - 1] * self.magfact;
                }
                if -sv[i - 1] <= s_max && -sv[i] >= s_max {
                    self.max = -sv[i] * self.magfact;
                }
                i += 1;
            }
        }
    }

    /// Choose the grid step and label factor. Returns false when the scaled
    /// range is NaN and no grid can be drawn.
    pub fn calc_horizontal_grid(&mut self, ysize: f64, axis_font_size: f64, flags: ChartFlags) -> bool {
        self.grid.label_factor = 2;
        let range = self.max - self.min;
        let scaled_range = range / self.magfact;
        if scaled_range.is_nan() {
            return false;
        }

        let fixed = self.grid_step.filter(|&step| {
            // at most one line per pixel row
            let usable = step.is_finite() && step > 0.0 && range / step <= ysize.max(1.0);
            if !usable {
                warn!(step, range, ysize, "ignoring unusable fixed grid step");
            }
            usable
        });
        if let Some(step) = fixed {
            self.grid.step = step;
            self.grid.label_factor = self.label_factor;
        } else if flags.contains(ChartFlags::ALT_Y_GRID) {
            self.alt_grid(range, axis_font_size);
        } else {
            let mut pixel = 1i64;
            let mut gridind = 0;
            for (i, row) in YLAB.iter().enumerate() {
                pixel = (ysize / (scaled_range / row.grid)) as i64;
                gridind = i;
                if pixel >= 5 {
                    break;
                }
            }
            // No factor wide enough keeps the initial factor of 2.
            if let Some(&f) = YLAB[gridind]
                .lfac
                .iter()
                .find(|&&f| (pixel * i64::from(f)) as f64 >= 1.8 * axis_font_size)
            {
                self.grid.label_factor = f;
            }
            self.grid.step = YLAB[gridind].grid * self.magfact;
        }
        true
    }

    fn alt_grid(&mut self, range: f64, axis_font_size: f64) {
        let (vf, mag) = (self.viewfactor, self.magfact);
        let mut decimals = (self.max.abs().max(self.min.abs()) * vf / mag).log10().ceil() as i32;
        if decimals <= 0 {
            decimals = 1;
        }
        let mut gs = 10f64.powf((range * vf / mag).log10().floor()) / vf * mag;
        if gs == 0.0 {
            gs = 0.1;
        }
        if range / gs < 5.0 && gs >= 30.0 {
            gs /= 10.0;
        }
        if range / gs > 15.0 {
            gs *= 10.0;
        }
        let labfact = if range / gs > 5.0 {
            if range / gs > 8.0 || gs < 1.8 * axis_font_size { 2 } else { 1 }
        } else {
            gs /= 5.0;
            5
        };
        self.grid.step = gs;
        self.grid.label_factor = labfact;

        let unit = if self.symbol != ' ' { " %c" } else { "" };
        let fractionals = (gs * f64::from(labfact) * vf / mag).log10().floor() as i32;
        let (len, prec) = if fractionals < 0 {
            (decimals - fractionals + 1, -fractionals)
        } else {
            (decimals + 1, 0)
        };
        let wanted = (len + 2).max(0) as usize;
        if self.units_length < wanted {
            self.units_length = wanted;
        }
        self.grid.label_format = format!("%{len}.{prec}f{unit}");
    }

    /// Nudge the bounds by sub-pixel amounts so gridlines land on whole pixel
    /// rows, then re-solve the grid. `scale` is reset after every change.
    pub fn apply_gridfit(&mut self, scale: &mut ValueScale, axis_font_size: f64, flags: ChartFlags) {
        if self.min.is_nan() || self.max.is_nan() {
            return;
        }
        scale.set_bounds(self.min, self.max);
        if self.is_log() {
            self.gridfit_log(scale);
        } else {
            self.gridfit_linear(scale);
        }
        self.calc_horizontal_grid(scale.size, axis_font_size, flags);
    }

    fn gridfit_log(&mut self, scale: &mut ValueScale) {
        let mut log10_range = self.max.log10() - self.min.log10();
        let mut ya = 10f64.powf(self.min.log10().floor());
        while ya < self.min {
            ya *= 10.0;
        }
        if ya > self.max {
            trace!("gridfit: no decade line inside the range");
            return;
        }
        let yb = ya * 10.0;
        if yb <= self.max {
            let delta = scale.to_px(ya) - scale.to_px(yb);
            if delta.floor() >= 1.0 {
                let factor = delta / delta.floor();
                self.max = 10f64.powf(self.min.log10() + factor * log10_range);
                scale.set_bounds(self.min, self.max);
                log10_range = self.max.log10() - self.min.log10();
            }
        }
        let ypix = scale.to_px(ya) + scale.size;
        let frac = ypix - ypix.floor();
        if frac > 0.0 && frac < 1.0 {
            let yfrac = frac / scale.size;
            self.min = 10f64.powf(self.min.log10() - yfrac * log10_range);
            self.max = 10f64.powf(self.max.log10() - yfrac * log10_range);
            scale.set_bounds(self.min, self.max);
        }
    }

    fn gridfit_linear(&mut self, scale: &mut ValueScale) {
        let gridstep = self.grid.step;
        let delta = scale.to_px(self.min) - scale.to_px(self.min + gridstep);
        if delta.floor() >= 1.0 {
            let new_range = delta / delta.floor() * (self.max - self.min);
            if self.max > 0.0 {
                self.max = self.min + new_range;
            } else {
                self.min = self.max - new_range;
            }
            scale.set_bounds(self.min, self.max);
        }
        let mut minor_y = gridstep * (self.min / gridstep).ceil();
        if minor_y < self.min {
            minor_y += gridstep;
        }
        let px = scale.to_px(minor_y) + scale.size;
        let frac = px - px.floor();
        if frac > 0.0 && frac < 1.0 {
            let shift = frac / scale.size * (self.max - self.min);
            self.min -= shift;
            self.max -= shift;
            scale.set_bounds(self.min, self.max);
        }
    }
}

/// Optional right-hand axis derived from the primary one.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondAxis {
    pub scale: f64,
    pub shift: f64,
    pub label: String,
    pub format: String,
    pub formatter: ValueFormatter,
}

impl SecondAxis {
    pub fn new(scale: f64, shift: f64, label: impl Into<String>) -> Self {
        Self {
            scale,
            shift,
            label: label.into(),
            format: String::new(),
            formatter: ValueFormatter::Numeric,
        }
    }

    #[inline]
    pub fn map(&self, v: f64) -> f64 { v * self.scale + self.shift }
}

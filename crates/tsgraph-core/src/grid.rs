// File: crates/tsgraph-core/src/grid.rs
// Summary: Horizontal gridline placement and labels for linear and logarithmic y-axes.

use tracing::trace;

use crate::axis::{Axis, SecondAxis};
use crate::format::{format_duration, format_timestamp, sprintf, strfduration, Arg, ValueFormatter};
use crate::numeric::{almost_equal, auto_scale, frexp10};
use crate::scale::ValueScale;
use crate::types::ChartFlags;

/// Prefixes for log-axis labels, yocto to yotta.
const SI_SYMBOLS: [char; 17] = [
    'y', 'z', 'a', 'f', 'p', 'n', 'u', 'm', ' ', 'k', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y',
];

/// Within-decade major positions, sparse to dense; each row ends at 10.
const YLOGLAB: [[f64; 10]; 6] = [
    [1.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 5.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 2.0, 5.0, 7.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 2.0, 4.0, 6.0, 8.0, 10.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
    [0.0; 10],
];

const MAX_LOG_STEPS: usize = 10_000;

/// One horizontal gridline at pixel row `y`. Labeled lines are major.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub major: bool,
    pub label: Option<String>,
    pub right_label: Option<String>,
}

impl GridLine {
    fn minor(y: f64) -> Self {
        Self { y, major: false, label: None, right_label: None }
    }
}

fn inside(scale: &ValueScale, y: f64) -> bool {
    let row = (y + 0.5).floor();
    row >= scale.origin - scale.size && row <= scale.origin
}

fn above_top(scale: &ValueScale, y: f64) -> bool {
    (y + 0.5).floor() <= scale.origin - scale.size
}

/// Gridlines of a linear axis using the solved `axis.grid`.
///
/// Every `label_factor`-th line gets a label; a second label is forced
/// when only one would otherwise be visible.
pub fn linear_grid(axis: &Axis, second: Option<&SecondAxis>, scale: &ValueScale, flags: ChartFlags) -> Vec<GridLine> {
    let gs = axis.grid.step;
    let labfact = axis.grid.label_factor.max(1) as i64;
    let sgrid = (axis.min / gs - 1.0) as i64;
    let egrid = (axis.max / gs + 1.0) as i64;
    if !(gs.is_finite() && gs > 0.0) || egrid.saturating_sub(sgrid) as f64 > scale.size.max(1.0) + 4.0 {
        trace!(step = gs, sgrid, egrid, "grid step does not fit the plot");
        return Vec::new();
    }
    let scaledstep = gs / axis.magfact * axis.viewfactor;
    let max_y = scaledstep * egrid as f64;
    let mut second_scale: Option<(f64, char)> = None;

    let mut lines = Vec::new();
    let mut nlabels = 0;
    for i in sgrid..=egrid {
        let y0 = scale.to_px(gs * i as f64);
        let yn = scale.to_px(gs * (i + 1) as f64);
        if !inside(scale, y0) {
            continue;
        }
        let lone = nlabels == 1 && (yn < scale.origin - scale.size || yn > scale.origin);
        if i % labfact != 0 && !lone {
            if !flags.contains(ChartFlags::NO_MINOR) {
                lines.push(GridLine::minor(y0));
            }
            continue;
        }

        let label = primary_label(axis, flags, scaledstep * i as f64, gs * i as f64, max_y, i == 0);
        nlabels += 1;
        let right_label = second.map(|sa| {
            let sval = sa.map(gs * i as f64);
            match sa.formatter {
                ValueFormatter::Numeric if sa.format.is_empty() => {
                    let (magfact, symbol) = *second_scale.get_or_insert_with(|| {
                        let mid = sa.map(gs * (sgrid + egrid) as f64 / 2.0);
                        let s = auto_scale(axis.base, mid);
                        (s.magfact, s.symbol)
                    });
                    let fmt = if max_y < 10.0 { "%5.1f %s" } else { "%5.0f %s" };
                    sprintf(fmt, &[Arg::Float(sval / magfact), Arg::Char(symbol)]).unwrap_or_default()
                }
                ValueFormatter::Numeric => sprintf(&sa.format, &[Arg::Float(sval), Arg::Str("")]).unwrap_or_default(),
                ValueFormatter::Timestamp => format_timestamp(sval, &sa.format).unwrap_or_default(),
                ValueFormatter::Duration => format_duration(sval, &sa.format).unwrap_or_default(),
            }
        });
        lines.push(GridLine { y: y0, major: true, label: Some(label), right_label });
    }
    lines
}

fn primary_label(axis: &Axis, flags: ChartFlags, scaled: f64, raw: f64, max_y: f64, at_zero: bool) -> String {
    match axis.formatter {
        ValueFormatter::Numeric => {
            let alt = flags.contains(ChartFlags::ALT_Y_GRID);
            let classic = if max_y < 10.0 { "%4.1f" } else { "%4.0f" };
            let res = if axis.symbol == ' ' {
                let fmt = if !axis.format.is_empty() {
                    axis.format.as_str()
                } else if alt {
                    axis.grid.label_format.as_str()
                } else {
                    classic
                };
                sprintf(fmt, &[Arg::Float(scaled)])
            } else {
                let sym = if at_zero { ' ' } else { axis.symbol };
                let with_unit;
                let fmt = if !axis.format.is_empty() {
                    axis.format.as_str()
                } else if alt {
                    axis.grid.label_format.as_str()
                } else {
                    with_unit = format!("{classic} %c");
                    with_unit.as_str()
                };
                sprintf(fmt, &[Arg::Float(scaled), Arg::Char(sym)])
            };
            res.unwrap_or_default()
        }
        ValueFormatter::Timestamp => format_timestamp(raw, &axis.format).unwrap_or_default(),
        ValueFormatter::Duration => {
            if axis.format.is_empty() {
                format_duration(raw, "").unwrap_or_default()
            } else {
                strfduration(&axis.format, raw).unwrap_or_default()
            }
        }
    }
}

/// Gridlines of a logarithmic axis, or `None` when the range has no usable
/// decade spacing.
///
/// Major lines follow the densest `YLOGLAB` row whose spacing stays above
/// twice the legend font size; ranges spanning many decades label every
/// third (sixth, ...) decade instead.
pub fn log_grid(
    axis: &Axis,
    second: Option<&SecondAxis>,
    scale: &ValueScale,
    font_size: f64,
    flags: ChartFlags,
) -> Option<Vec<GridLine>> {
    let nex = (axis.max / axis.min).log10();
    let logscale = scale.size / nex;
    if !logscale.is_finite() || logscale <= 0.0 {
        trace!(min = axis.min, max = axis.max, "log grid: degenerate decade span");
        return None;
    }

    // decade stride: 1, else the smallest multiple of 3 giving enough room
    let need = 3.0 * font_size / logscale;
    if need > 1e9 {
        trace!(need, "log grid: decades too dense to label");
        return None;
    }
    let exfrac: i64 = if need <= 1.0 { 1 } else { 3 * (need / 3.0).ceil() as i64 };

    let mut mid = 0usize;
    loop {
        let last = YLOGLAB[mid].iter().skip(1).take_while(|&&v| v < 10.0).count();
        let mspac = logscale * (10.0 / YLOGLAB[mid][last]).log10();
        if !(mspac > 2.0 * font_size && YLOGLAB[mid][0] > 0.0) {
            break;
        }
        mid += 1;
    }
    mid = mid.saturating_sub(1);
    let row = &YLOGLAB[mid];

    let (mant, exp) = frexp10(axis.min);
    let mut flab = 0usize;
    while row[flab] < 10.0 && mant > row[flab] {
        flab += 1;
    }
    let mut val_exp = i64::from(exp);
    if row[flab] == 10.0 {
        val_exp += 1;
        flab = 0;
    }
    if val_exp % exfrac != 0 {
        val_exp += (-val_exp % exfrac).abs();
    }

    let dense = mid < 4 && exfrac == 1;
    let mut lines = Vec::new();
    let mut pre_value = f64::NAN;
    for _ in 0..MAX_LOG_STEPS {
        let value = row[flab] * 10f64.powi(val_exp as i32);
        if almost_equal(value, pre_value) {
            trace!(value, "log grid: values stopped converging");
            break;
        }
        pre_value = value;
        let y0 = scale.to_px(value);
        if above_top(scale, y0) {
            break;
        }

        let label = if flags.contains(ChartFlags::FORCE_UNITS_SI) {
            let si = (val_exp as f64 / 3.0).floor() as i64;
            let mut pvalue = if value >= 1.0 {
                10f64.powi((val_exp % 3) as i32)
            } else {
                10f64.powi(((val_exp + 1) % 3 + 2) as i32)
            };
            pvalue *= row[flab];
            let idx = si + 8;
            let symbol = if (0..SI_SYMBOLS.len() as i64).contains(&idx) { SI_SYMBOLS[idx as usize] } else { '?' };
            sprintf("%3.0f %c", &[Arg::Float(pvalue), Arg::Char(symbol)])
        } else {
            sprintf("%3.0e", &[Arg::Float(value)])
        };
        let right_label = second.map(|sa| {
            let sval = sa.map(value);
            let res = if !sa.format.is_empty() {
                sprintf(&sa.format, &[Arg::Float(sval), Arg::Str("")])
            } else if flags.contains(ChartFlags::FORCE_UNITS_SI) {
                let s = auto_scale(axis.base, sval);
                sprintf("%4.0f %s", &[Arg::Float(s.value), Arg::Char(s.symbol)])
            } else {
                sprintf("%3.0e", &[Arg::Float(sval)])
            };
            res.unwrap_or_default()
        });
        lines.push(GridLine { y: y0, major: true, label: Some(label.unwrap_or_default()), right_label });

        minor_below(axis, scale, row, flab, val_exp, exfrac, dense, &mut lines);

        flab += 1;
        if row[flab] == 10.0 {
            flab = 0;
            val_exp += exfrac;
        }
    }
    minor_below(axis, scale, row, flab, val_exp, exfrac, dense, &mut lines);
    Some(lines)
}

/// Minor lines between the previous major line and the one at `flab`/`val_exp`.
#[allow(clippy::too_many_arguments)]
fn minor_below(
    axis: &Axis,
    scale: &ValueScale,
    row: &[f64; 10],
    flab: usize,
    val_exp: i64,
    exfrac: i64,
    dense: bool,
    lines: &mut Vec<GridLine>,
) {
    let mut push = |value: f64| -> bool {
        if value < axis.min {
            return true;
        }
        let y0 = scale.to_px(value);
        if above_top(scale, y0) {
            return false;
        }
        lines.push(GridLine::minor(y0));
        true
    };

    if dense {
        let (from, to, min_exp) = if flab == 0 {
            let last = row.iter().skip(1).take_while(|&&v| v < 10.0).count();
            (row[last] as i64 + 1, 10, val_exp - 1)
        } else {
            (row[flab - 1] as i64 + 1, row[flab] as i64, val_exp)
        };
        for i in from..to {
            if !push(i as f64 * 10f64.powi(min_exp as i32)) {
                break;
            }
        }
    } else if exfrac > 1 {
        let stride = exfrac / 3;
        let mut i = val_exp - stride * 2;
        while i < val_exp {
            if !push(10f64.powi(i as i32)) {
                break;
            }
            i += stride;
        }
    }
}

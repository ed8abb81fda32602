// File: crates/tsgraph-core/src/resample.rs
// Summary: Per-pixel normalization of plotted elements and final value-range derivation.

use tracing::debug;

use crate::axis::Axis;
use crate::error::{GraphError, Result};
use crate::numeric::almost_equal;
use crate::series::{Element, ElementKind, SourceData};
use crate::types::TimeSpan;

/// Where a plotted element reads its column values from.
enum Source<'a> {
    Constant(f64),
    Series(&'a SourceData),
}

impl Source<'_> {
    fn value_at(&self, t: i64) -> f64 {
        match self {
            Source::Constant(v) => *v,
            Source::Series(s) => s.sample_at(t),
        }
    }
}

fn resolve_source(elements: &[Element], idx: usize) -> Result<Source<'_>> {
    let el = &elements[idx];
    if !el.yrule.is_nan() && el.kind != ElementKind::Tick {
        return Ok(Source::Constant(el.yrule));
    }
    let src = el
        .source
        .and_then(|id| elements.get(id.0))
        .ok_or(GraphError::MissingSource { element: idx })?;
    if let Some(v) = src.vdef {
        return Ok(Source::Constant(v.value));
    }
    src.data.as_ref().map(Source::Series).ok_or(GraphError::MissingSource { element: idx })
}

fn column_buffer(xsize: usize) -> Result<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(xsize + 1).map_err(|_| GraphError::Alloc { columns: xsize + 1 })?;
    buf.resize(xsize + 1, f64::NAN);
    Ok(buf)
}

/// Fill every plotted element's `processed` array with one value per pixel
/// column, accumulating stacked elements, and fit `axis` to the observed data.
///
/// The axis bounds only move where the caller left them open, or where they
/// are elastic, or where shrinking a rigid bound is allowed. On return
/// `axis.min < axis.max`.
pub fn process(elements: &mut [Element], axis: &mut Axis, span: TimeSpan, xsize: usize) -> Result<()> {
    let plotted: Vec<usize> = (0..elements.len()).filter(|&i| elements[i].kind.is_plotted()).collect();

    let mut buffers = Vec::with_capacity(plotted.len());
    for _ in &plotted {
        buffers.push(column_buffer(xsize)?);
    }

    let log = axis.is_log();
    let pixstep = span.len() as f64 / xsize as f64;
    let mut min = f64::NAN;
    let mut max = f64::NAN;
    {
        let shared: &[Element] = elements;
        let sources = plotted
            .iter()
            .map(|&i| resolve_source(shared, i))
            .collect::<Result<Vec<_>>>()?;

        for col in 0..xsize {
            let t = (span.start as f64 + pixstep * col as f64) as i64;
            let mut paint = 0.0;
            for (slot, &idx) in plotted.iter().enumerate() {
                let el = &shared[idx];
                if !el.stack {
                    paint = 0.0;
                }
                let value = sources[slot].value_at(t);
                if value.is_nan() {
                    buffers[slot][col] = f64::NAN;
                    continue;
                }
                paint += value;
                buffers[slot][col] = paint;
                if paint.is_finite() && el.kind != ElementKind::Tick && !el.skip_scale {
                    if (min.is_nan() || paint < min) && !(log && paint <= 0.0) {
                        min = paint;
                    }
                    if max.is_nan() || paint > max {
                        max = paint;
                    }
                }
            }
        }
    }
    for (buf, &idx) in buffers.into_iter().zip(&plotted) {
        elements[idx].processed = buf;
    }

    debug!(min, max, columns = xsize, "observed data range");
    fit_axis(axis, min, max);
    Ok(())
}

/// Merge observed bounds into the axis and make the range non-degenerate.
fn fit_axis(axis: &mut Axis, mut min: f64, mut max: f64) {
    let log = axis.is_log();
    if log {
        if min.is_nan() || max.is_nan() || max <= 0.0 {
            min = 0.0;
            max = 5.1;
        }
        if min <= 0.0 {
            min = max / 10e8;
        }
    } else if min.is_nan() || max.is_nan() {
        min = 0.0;
        max = 1.0;
    }

    let lo = if log { min / 2.0 } else { min };
    let hi = if log { max * 2.0 } else { max };

    if axis.min.is_nan() || (!axis.rigid && axis.min > min) {
        axis.min = lo;
    }
    if axis.max.is_nan() || (!axis.rigid && axis.max < max) {
        axis.max = hi;
    }
    if axis.rigid && axis.allow_shrink {
        if axis.min < min {
            axis.min = lo;
        }
        if axis.max > max {
            axis.max = hi;
        }
    }

    if axis.min > axis.max {
        axis.min = if axis.min > 0.0 { 0.99 * axis.max } else { 1.01 * axis.max };
    }
    if almost_equal(axis.min, axis.max) {
        axis.max *= if axis.max > 0.0 { 1.01 } else { 0.99 };
        if almost_equal(axis.max, 0.0) {
            axis.max = 1.0;
        }
    }
}

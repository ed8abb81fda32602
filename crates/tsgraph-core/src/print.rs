// File: crates/tsgraph-core/src/print.rs
// Summary: PRINT/GPRINT value computation and formatting; rule positions taken from value definitions.

use chrono::Utc;

use crate::error::{GraphError, Result};
use crate::format::{format_duration, format_number, format_timestamp, strftime_at, time_clean, ValueFormatter};
use crate::numeric::auto_scale;
use crate::series::{Consolidation, Element, ElementKind, SourceData};
use crate::text::truncate_to;
use crate::types::LEGEND_BUF_LEN;

/// Summarize the selected column with `cf`, ignoring non-finite samples.
pub fn consolidate(data: &SourceData, cf: Consolidation) -> f64 {
    let mut acc = f64::NAN;
    let mut valid = 0usize;
    for v in data.column().filter(|v| v.is_finite()) {
        if acc.is_nan() {
            acc = v;
            valid += 1;
            continue;
        }
        match cf {
            Consolidation::Average => {
                acc += v;
                valid += 1;
            }
            Consolidation::Minimum => acc = acc.min(v),
            Consolidation::Maximum => acc = acc.max(v),
            Consolidation::Last => acc = v,
        }
    }
    if cf == Consolidation::Average && valid > 1 {
        acc /= valid as f64;
    }
    acc
}

/// Compute every print value in declaration order.
///
/// GPRINT results replace the element's legend; PRINT results are returned.
/// A `%S` format scales the first non-zero value and keeps that magnitude
/// for the rest of the batch; `%s` picks a prefix per value.
pub fn print_calc(elements: &mut [Element], base: f64, utc: bool) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut magfact = -1.0;
    let mut symbol = String::new();

    for i in 0..elements.len() {
        let kind = elements[i].kind;
        match kind {
            ElementKind::Print | ElementKind::GPrint => {}
            ElementKind::HRule => {
                if elements[i].yrule.is_nan() {
                    if let Some(v) = source_of(elements, i).and_then(|s| s.vdef) {
                        elements[i].yrule = v.value;
                    }
                }
                continue;
            }
            ElementKind::VRule => {
                if elements[i].xrule == 0 {
                    if let Some(when) = source_of(elements, i).and_then(|s| s.vdef).and_then(|v| v.when) {
                        elements[i].xrule = when;
                    }
                }
                continue;
            }
            _ => continue,
        }

        let src = source_of(elements, i).ok_or(GraphError::MissingSource { element: i })?;
        let (mut value, when, never) = match (&src.vdef, &src.data) {
            (Some(v), _) => (v.value, v.when, v.when.is_none()),
            (None, Some(data)) => (consolidate(data, elements[i].cf), None, false),
            (None, None) => return Err(GraphError::MissingSource { element: i }),
        };

        let el = &elements[i];
        let mut format = el.format.clone();
        if !el.strftime && el.formatter == ValueFormatter::Numeric {
            if format.contains("%S") {
                if magfact < 0.0 {
                    let s = auto_scale(base, value);
                    value = s.value;
                    magfact = s.magfact;
                    symbol = s.symbol.to_string();
                    if value == 0.0 {
                        magfact = -1.0;
                    }
                } else {
                    value /= magfact;
                }
                format = format.replacen("%S", "%s", 1);
            } else if format.contains("%s") {
                let s = auto_scale(base, value);
                value = s.value;
                magfact = s.magfact;
                symbol = s.symbol.to_string();
            }
        }

        let mut text = if el.strftime {
            if never {
                time_clean(&format)
            } else {
                let at = when.unwrap_or_else(|| Utc::now().timestamp());
                strftime_at(at, &format, utc)?
            }
        } else {
            match el.formatter {
                ValueFormatter::Numeric => {
                    let mut s = format_number(&format, value, &symbol)?;
                    truncate_to(&mut s, LEGEND_BUF_LEN - 2);
                    s
                }
                ValueFormatter::Timestamp => format_timestamp(value, &format)?,
                ValueFormatter::Duration => format_duration(value, &format)?,
            }
        };
        truncate_to(&mut text, LEGEND_BUF_LEN);
        if kind == ElementKind::Print {
            if text.is_empty() && !format.is_empty() {
                return Err(GraphError::EmptyFormat { element: i });
            }
            lines.push(text);
        } else {
            elements[i].legend = text;
        }
    }
    Ok(lines)
}

fn source_of(elements: &[Element], i: usize) -> Option<&Element> {
    elements[i].source.and_then(|id| elements.get(id.0))
}

// File: crates/tsgraph-core/src/format.rs
// Summary: Value formatting: printf-style numbers, strftime timestamps, durations and
//          fixed-width placeholders for timestamps that never happened.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::error::{GraphError, Result};
use crate::text::truncate_to;
use crate::types::LEGEND_BUF_LEN;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_DURATION_FORMAT: &str = "%H:%02m:%02s";

/// How a value is turned into text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueFormatter {
    #[default]
    Numeric,
    /// Value is seconds since the epoch, printed with strftime in UTC.
    Timestamp,
    /// Value is milliseconds, printed with the duration mini-language.
    Duration,
}

/// Argument consumed by a conversion in [`sprintf`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arg<'a> {
    Float(f64),
    Char(char),
    Str(&'a str),
}

#[derive(Default)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
    width: usize,
    precision: Option<usize>,
}

/// Locale-free printf subset: `%f %e %g` (and upper-case forms) take a float,
/// `%s %c` take a string or character, `%%` is a literal percent. Flags
/// `- + space 0 #`, width, precision and C length modifiers are accepted.
pub fn sprintf(fmt: &str, args: &[Arg<'_>]) -> Result<String> {
    let mut out = String::with_capacity(fmt.len() + 16);
    let mut chars = fmt.chars().peekable();
    let mut next_arg = args.iter();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let mut spec = Spec::default();
        while let Some(&f) = chars.peek() {
            match f {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                '#' => spec.alt = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = take_number(&mut chars).unwrap_or(0);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(take_number(&mut chars).unwrap_or(0));
        }
        while matches!(chars.peek(), Some('h' | 'l' | 'L' | 'q' | 'j' | 'z' | 't')) {
            chars.next();
        }
        let conv = chars
            .next()
            .ok_or_else(|| GraphError::bad_format(fmt, "dangling '%'"))?;
        let body = match conv {
            'f' | 'F' | 'e' | 'E' | 'g' | 'G' => match next_arg.next() {
                Some(Arg::Float(v)) => float_body(*v, conv, &spec),
                _ => return Err(GraphError::bad_format(fmt, format!("%{conv} needs a number"))),
            },
            's' => {
                let s = match next_arg.next() {
                    Some(Arg::Str(s)) => s.to_string(),
                    Some(Arg::Char(c)) => c.to_string(),
                    _ => return Err(GraphError::bad_format(fmt, "%s needs a string")),
                };
                let s = match spec.precision {
                    Some(p) => s.chars().take(p).collect(),
                    None => s,
                };
                pad(s, &spec)
            }
            'c' => {
                let c = match next_arg.next() {
                    Some(Arg::Char(c)) => *c,
                    Some(Arg::Str(s)) => s.chars().next().unwrap_or(' '),
                    _ => return Err(GraphError::bad_format(fmt, "%c needs a character")),
                };
                pad(c.to_string(), &spec)
            }
            other => {
                return Err(GraphError::bad_format(fmt, format!("unsupported conversion '%{other}'")))
            }
        };
        out.push_str(&body);
    }
    Ok(out)
}

/// Width or precision field. Anything wider than the legend buffer would be
/// truncated away, so the value is capped there.
fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(d as usize).min(LEGEND_BUF_LEN));
        chars.next();
    }
    n
}

fn float_body(v: f64, conv: char, spec: &Spec) -> String {
    let upper = conv.is_ascii_uppercase();
    let neg = v.is_sign_negative();
    let a = v.abs();
    let mut digits = if a.is_nan() {
        "nan".to_string()
    } else if a.is_infinite() {
        "inf".to_string()
    } else {
        match conv.to_ascii_lowercase() {
            'f' => {
                let mut s = format!("{:.*}", spec.precision.unwrap_or(6), a);
                if spec.alt && !s.contains('.') { s.push('.'); }
                s
            }
            'e' => exp_notation(a, spec.precision.unwrap_or(6)),
            _ => general(a, spec),
        }
    };
    if upper { digits = digits.to_ascii_uppercase(); }
    let sign = if neg { "-" } else if spec.plus { "+" } else if spec.space { " " } else { "" };
    let finite = v.is_finite();
    if spec.zero && !spec.left && finite && spec.width > sign.len() + digits.len() {
        let zeros = spec.width - sign.len() - digits.len();
        return format!("{sign}{}{digits}", "0".repeat(zeros));
    }
    pad(format!("{sign}{digits}"), spec)
}

/// C style exponent: at least two digits with an explicit sign.
fn exp_notation(a: f64, prec: usize) -> String {
    let s = format!("{:.*e}", prec, a);
    let (mant, exp) = s.split_once('e').unwrap_or((&s, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mant}e{sign}{:02}", exp.abs())
}

fn general(a: f64, spec: &Spec) -> String {
    let p = match spec.precision { Some(0) => 1, Some(p) => p, None => 6 };
    let x = if a == 0.0 {
        0
    } else {
        let s = format!("{:.*e}", p - 1, a);
        s.split_once('e').and_then(|(_, e)| e.parse::<i32>().ok()).unwrap_or(0)
    };
    let mut s = if x < -4 || x >= p as i32 {
        exp_notation(a, p - 1)
    } else {
        format!("{:.*}", (p as i32 - 1 - x).max(0) as usize, a)
    };
    if !spec.alt {
        let (mant, exp) = match s.find('e') {
            Some(at) => (s[..at].to_string(), s[at..].to_string()),
            None => (s.clone(), String::new()),
        };
        let mant = if mant.contains('.') {
            mant.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            mant
        };
        s = mant + &exp;
    }
    s
}

fn pad(s: String, spec: &Spec) -> String {
    let len = s.chars().count();
    if len >= spec.width { return s; }
    let fill = " ".repeat(spec.width - len);
    if spec.left { s + &fill } else { fill + &s }
}

/// Format a number with an optional SI symbol argument for `%s`/`%c`.
pub fn format_number(fmt: &str, value: f64, symbol: &str) -> Result<String> {
    sprintf(fmt, &[Arg::Float(value), Arg::Str(symbol)])
}

/// Validate a strftime pattern once so rendering cannot fail halfway.
fn strftime_items(fmt: &str) -> Result<StrftimeItems<'_>> {
    let items = StrftimeItems::new(fmt);
    if items.clone().any(|i| matches!(i, Item::Error)) {
        return Err(GraphError::bad_format(fmt, "unsupported strftime conversion"));
    }
    Ok(items)
}

/// strftime for any chrono time zone.
pub fn strftime<Tz: TimeZone>(dt: &DateTime<Tz>, fmt: &str) -> Result<String>
where
    Tz::Offset: std::fmt::Display,
{
    let items = strftime_items(fmt)?;
    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(items))
        .map_err(|_| GraphError::bad_format(fmt, "strftime failed"))?;
    Ok(out)
}

/// strftime of a unix time in local time, or UTC when `utc` is set.
pub fn strftime_at(ts: i64, fmt: &str, utc: bool) -> Result<String> {
    let out_of_range = || GraphError::bad_format(fmt, format!("time {ts} out of range"));
    if utc {
        let dt = Utc.timestamp_opt(ts, 0).single().ok_or_else(out_of_range)?;
        strftime(&dt, fmt)
    } else {
        let dt = Local.timestamp_opt(ts, 0).earliest().ok_or_else(out_of_range)?;
        strftime(&dt, fmt)
    }
}

/// Print seconds since the epoch in UTC; values that are not a representable
/// instant fall back to the bare number.
pub fn format_timestamp(value: f64, fmt: &str) -> Result<String> {
    let fmt = if fmt.is_empty() { DEFAULT_TIMESTAMP_FORMAT } else { fmt };
    let instant = if value.is_finite() && value.abs() < i64::MAX as f64 {
        DateTime::<Utc>::from_timestamp(value as i64, 0)
    } else {
        None
    };
    match instant {
        Some(dt) => strftime(&dt, fmt),
        None => sprintf("%.0f", &[Arg::Float(value)]),
    }
}

/// Duration mini-language over a millisecond value.
///
/// `%[0][width][.precision]X` where X is one of `W` weeks, `d` days within the
/// week, `D` days, `h` hours within the day, `H` hours, `m` minutes within the
/// hour, `M` minutes, `s` seconds within the minute, `S` seconds, `f`
/// milliseconds within the second, `%` a literal percent. Values are truncated
/// to the precision, never rounded; negative durations get a leading `-`.
pub fn strfduration(fmt: &str, duration_ms: f64) -> Result<String> {
    let ms = duration_ms.abs();
    let seconds = ms / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let weeks = days / 7.0;

    let mut out = String::new();
    if duration_ms < 0.0 {
        out.push('-');
    }
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let zero = chars.peek() == Some(&'0');
        if zero {
            chars.next();
        }
        let width = take_number(&mut chars).unwrap_or(0);
        let mut precision = 0usize;
        if chars.peek() == Some(&'.') {
            chars.next();
            precision = take_number(&mut chars).unwrap_or(0);
        }
        let value = match chars.next() {
            Some('%') => {
                out.push('%');
                continue;
            }
            Some('W') => weeks,
            Some('d') => days - weeks.trunc() * 7.0,
            Some('D') => days,
            Some('h') => hours - days.trunc() * 24.0,
            Some('H') => hours,
            Some('m') => minutes - hours.trunc() * 60.0,
            Some('M') => minutes,
            Some('s') => seconds - minutes.trunc() * 60.0,
            Some('S') => seconds,
            Some('f') => ms - seconds.trunc() * 1000.0,
            Some(other) => return Err(GraphError::duration(fmt, format!("unknown conversion '{other}'"))),
            None => return Err(GraphError::duration(fmt, "dangling '%'")),
        };
        let scale = 10f64.powi(precision as i32);
        let pval = (value * scale).trunc() / scale;
        if zero {
            out.push_str(&format!("{:0width$.precision$}", pval));
        } else {
            out.push_str(&format!("{:width$.precision$}", pval));
        }
    }
    Ok(out)
}

/// Format a duration, substituting the default pattern for an empty one and
/// `%f` for non-finite values.
pub fn format_duration(value: f64, fmt: &str) -> Result<String> {
    if !value.is_finite() {
        return sprintf("%f", &[Arg::Float(value)]);
    }
    strfduration(if fmt.is_empty() { DEFAULT_DURATION_FORMAT } else { fmt }, value)
}

/// Rewrite a strftime pattern into a same-width placeholder of dashes, used
/// when a time-valued print has no time to show. Literal text, tabs, `%%`,
/// `% `, `%.` and `%@` survive; output is capped at the legend buffer size.
pub fn time_clean(fmt: &str) -> String {
    let mut out = String::new();
    let chars: Vec<char> = fmt.chars().take(LEGEND_BUF_LEN - 1).collect();
    let mut j = 0;
    while j < chars.len() {
        let c = chars[j];
        if c == '%' {
            let next = chars.get(j + 1).copied().unwrap_or('\0');
            let piece = match next {
                'E' | 'O' => {
                    j += 1;
                    "-"
                }
                'C' | 'd' | 'g' | 'H' | 'I' | 'm' | 'M' | 'S' | 'U' | 'V' | 'W' | 'y' => "--",
                'j' => "---",
                'G' | 'Y' => "----",
                'R' => "--:--",
                'T' => "--:--:--",
                'D' => "--/--/--",
                'F' => "----------",
                'n' => "\r\n",
                't' => "\t",
                '%' => "%",
                ' ' => "% ",
                '.' => "%.",
                '@' => "%@",
                _ => "-",
            };
            out.push_str(piece);
            j += 2;
        } else {
            out.push(c);
            j += 1;
        }
    }
    truncate_to(&mut out, LEGEND_BUF_LEN);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printf_general_strips_zeros() {
        assert_eq!(sprintf("%g", &[Arg::Float(0.5)]).unwrap(), "0.5");
        assert_eq!(sprintf("%g", &[Arg::Float(1e-5)]).unwrap(), "1e-05");
        assert_eq!(sprintf("%g", &[Arg::Float(123456789.0)]).unwrap(), "1.23457e+08");
    }

    #[test]
    fn printf_zero_pad_keeps_sign_first() {
        assert_eq!(sprintf("%06.1f", &[Arg::Float(-1.5)]).unwrap(), "-001.5");
        assert_eq!(sprintf("%-5.0f|", &[Arg::Float(3.0)]).unwrap(), "3    |");
    }
}

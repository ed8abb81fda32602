// File: crates/tsgraph-core/src/timegrid.rs
// Summary: Calendar-aware time grid: bucket table, tick rounding/stepping and label times.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc, Weekday};
use tracing::trace;

use crate::error::Result;
use crate::format::strftime_at;
use crate::types::TimeSpan;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// A unit and how many of them make one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeStep {
    pub unit: TimeUnit,
    pub count: i64,
}

impl TimeStep {
    pub const fn new(unit: TimeUnit, count: i64) -> Self {
        Self { unit, count }
    }
}

/// One row of the time grid table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeBucket {
    /// Seconds per pixel from which this row applies.
    pub minsec: f64,
    /// Spans shorter than this fall back to the previous row with the same threshold.
    pub length: i64,
    pub minor: TimeStep,
    pub major: TimeStep,
    pub label: TimeStep,
    /// Label window; labels sit at the middle of it.
    pub precis: i64,
    pub format: &'static str,
}

use TimeUnit::{Day, Hour, Minute, Month, Second, Week};

const fn row(
    minsec: f64,
    length: i64,
    minor: (TimeUnit, i64),
    major: (TimeUnit, i64),
    label: (TimeUnit, i64),
    precis: i64,
    format: &'static str,
) -> TimeBucket {
    TimeBucket {
        minsec,
        length,
        minor: TimeStep::new(minor.0, minor.1),
        major: TimeStep::new(major.0, major.1),
        label: TimeStep::new(label.0, label.1),
        precis,
        format,
    }
}

const DAY: i64 = 86_400;

pub const XLAB: [TimeBucket; 37] = [
    row(0.0, 0, (Second, 1), (Second, 5), (Second, 1), 0, "%H:%M:%S"),
    row(0.015, 0, (Second, 1), (Second, 5), (Second, 5), 0, "%H:%M:%S"),
    row(0.08, 0, (Second, 1), (Second, 5), (Second, 10), 0, "%H:%M:%S"),
    row(0.15, 0, (Second, 5), (Second, 15), (Second, 30), 0, "%H:%M:%S"),
    row(0.4, 0, (Second, 10), (Minute, 1), (Minute, 1), 0, "%H:%M"),
    row(0.7, 0, (Second, 20), (Minute, 1), (Minute, 1), 0, "%H:%M"),
    row(1.0, 0, (Second, 30), (Minute, 1), (Minute, 2), 0, "%H:%M"),
    row(2.0, 0, (Minute, 1), (Minute, 5), (Minute, 5), 0, "%H:%M"),
    row(5.0, 0, (Minute, 2), (Minute, 10), (Minute, 10), 0, "%H:%M"),
    row(10.0, 0, (Minute, 5), (Minute, 20), (Minute, 20), 0, "%H:%M"),
    row(30.0, 0, (Minute, 10), (Minute, 30), (Hour, 1), 0, "%H:%M"),
    row(60.0, 0, (Minute, 30), (Hour, 1), (Hour, 2), 0, "%H:%M"),
    row(60.0, DAY, (Minute, 30), (Hour, 1), (Hour, 3), 0, "%a %H:%M"),
    row(140.0, 0, (Hour, 1), (Hour, 2), (Hour, 4), 0, "%a %H:%M"),
    row(180.0, 0, (Hour, 1), (Hour, 3), (Hour, 6), 0, "%a %H:%M"),
    row(300.0, 0, (Hour, 2), (Hour, 6), (Hour, 12), 0, "%a %H:%M"),
    row(600.0, 0, (Hour, 6), (Day, 1), (Day, 1), DAY, "%a %d %b"),
    row(1200.0, 0, (Hour, 6), (Day, 1), (Day, 1), DAY, "%d %b"),
    row(1800.0, 0, (Hour, 12), (Day, 1), (Day, 2), DAY, "%a %d %b"),
    row(2400.0, 0, (Hour, 12), (Day, 1), (Day, 2), DAY, "%d %b"),
    row(3600.0, 0, (Day, 1), (Week, 1), (Week, 1), 7 * DAY, "Week %V"),
    row(12000.0, 0, (Day, 1), (Month, 1), (Month, 1), 30 * DAY, "%B %Y"),
    row(18000.0, 0, (Day, 2), (Month, 1), (Month, 1), 30 * DAY, "%B %Y"),
    row(23000.0, 0, (Week, 1), (Month, 1), (Month, 1), 30 * DAY, "%b %Y"),
    row(32000.0, 0, (Week, 1), (Month, 1), (Month, 1), 30 * DAY, "%b '%g"),
    row(42000.0, 0, (Week, 1), (Month, 1), (Month, 2), 30 * DAY, "%B %Y"),
    row(52000.0, 0, (Week, 1), (Month, 1), (Month, 2), 30 * DAY, "%b %Y"),
    row(78000.0, 0, (Week, 1), (Month, 1), (Month, 2), 30 * DAY, "%b '%g"),
    row(84000.0, 0, (Week, 2), (Month, 1), (Month, 3), 30 * DAY, "%B %Y"),
    row(94000.0, 0, (Week, 2), (Month, 1), (Month, 3), 30 * DAY, "%b %Y"),
    row(120000.0, 0, (Week, 2), (Month, 1), (Month, 3), 30 * DAY, "%b '%g"),
    row(130000.0, 0, (Month, 1), (Month, 2), (Month, 4), 0, "%Y-%m-%d"),
    row(142000.0, 0, (Month, 1), (Month, 3), (Month, 6), 0, "%Y-%m-%d"),
    row(220000.0, 0, (Month, 1), (Month, 6), (Month, 12), 0, "%Y-%m-%d"),
    row(400000.0, 0, (Month, 2), (Month, 12), (Month, 12), 365 * DAY, "%Y"),
    row(800000.0, 0, (Month, 4), (Month, 12), (Month, 24), 365 * DAY, "%Y"),
    row(2000000.0, 0, (Month, 6), (Month, 12), (Month, 24), 365 * DAY, "'%g"),
];

/// Pick the last row whose threshold is at most `seconds_per_pixel`, then
/// step back over same-threshold rows that need a longer span.
pub fn select_bucket(seconds_per_pixel: f64, span: i64) -> &'static TimeBucket {
    let mut sel = 0;
    while sel + 1 < XLAB.len() && XLAB[sel + 1].minsec <= seconds_per_pixel {
        sel += 1;
    }
    while sel > 0 && XLAB[sel - 1].minsec == XLAB[sel].minsec && XLAB[sel].length > span {
        sel -= 1;
    }
    &XLAB[sel]
}

/// Calendar used to round and step tick times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calendar {
    pub utc: bool,
    pub first_weekday: Weekday,
}

impl Default for Calendar {
    fn default() -> Self {
        Self { utc: false, first_weekday: Weekday::Mon }
    }
}

impl Calendar {
    pub fn utc() -> Self {
        Self { utc: true, ..Self::default() }
    }

    /// Round `start` down to the first tick boundary of `step`.
    pub fn first_time(&self, start: i64, step: TimeStep) -> Option<i64> {
        if self.utc {
            first_time_in(&Utc, start, step, self.first_weekday)
        } else {
            first_time_in(&Local, start, step, self.first_weekday)
        }
    }

    /// The tick after `current`. Local times skipped by a DST change are
    /// stepped over, within a small retry budget.
    pub fn next_time(&self, current: i64, step: TimeStep) -> Option<i64> {
        let next = if self.utc {
            next_time_in(&Utc, current, step)
        } else {
            next_time_in(&Local, current, step)
        };
        next.filter(|&t| t > current)
    }
}

fn civil<Tz: TimeZone>(tz: &Tz, t: i64) -> Option<NaiveDateTime> {
    tz.timestamp_opt(t, 0).earliest().map(|d| d.naive_local())
}

fn resolve<Tz: TimeZone>(tz: &Tz, ndt: NaiveDateTime) -> Option<i64> {
    tz.from_local_datetime(&ndt).earliest().map(|d| d.timestamp())
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn first_time_in<Tz: TimeZone>(tz: &Tz, start: i64, step: TimeStep, first_weekday: Weekday) -> Option<i64> {
    let n = step.count.max(1);
    let tm = civil(tz, start)?;
    let rounded = match step.unit {
        TimeUnit::Second => {
            let s = i64::from(tm.second());
            tm - Duration::seconds(s % n)
        }
        TimeUnit::Minute => {
            let m = i64::from(tm.minute());
            tm.with_second(0)? - Duration::minutes(m % n)
        }
        TimeUnit::Hour => {
            let h = i64::from(tm.hour());
            tm.date().and_hms_opt(tm.hour(), 0, 0)? - Duration::hours(h % n)
        }
        TimeUnit::Day => midnight(tm.date()),
        TimeUnit::Week => {
            let wday = i64::from(tm.weekday().num_days_from_sunday());
            let first = i64::from(first_weekday.num_days_from_sunday());
            let mut back = wday - first;
            if wday == 0 && first > 0 {
                back += 7;
            }
            midnight(tm.date()) - Duration::days(back)
        }
        TimeUnit::Month => {
            let m0 = tm.month0() as i64;
            let month = (m0 - m0 % n) as u32 + 1;
            midnight(NaiveDate::from_ymd_opt(tm.year(), month, 1)?)
        }
        TimeUnit::Year => {
            let y = i64::from(tm.year());
            midnight(NaiveDate::from_ymd_opt((y - y % n) as i32, 1, 1)?)
        }
    };
    resolve(tz, rounded).or_else(|| resolve(tz, rounded + Duration::hours(1)))
}

fn advance(tm: NaiveDateTime, step: TimeStep) -> Option<NaiveDateTime> {
    let n = step.count;
    match step.unit {
        TimeUnit::Second => tm.checked_add_signed(Duration::seconds(n)),
        TimeUnit::Minute => tm.checked_add_signed(Duration::minutes(n)),
        TimeUnit::Hour => tm.checked_add_signed(Duration::hours(n)),
        TimeUnit::Day => tm.checked_add_signed(Duration::days(n)),
        TimeUnit::Week => tm.checked_add_signed(Duration::days(7 * n)),
        TimeUnit::Month => tm.checked_add_months(Months::new(u32::try_from(n).ok()?)),
        TimeUnit::Year => tm.checked_add_months(Months::new(u32::try_from(n * 12).ok()?)),
    }
}

fn next_time_in<Tz: TimeZone>(tz: &Tz, current: i64, step: TimeStep) -> Option<i64> {
    let mut budget = match step.unit {
        TimeUnit::Second => 7200,
        TimeUnit::Minute => 120,
        _ => 2,
    };
    let mut tm = civil(tz, current)?;
    loop {
        tm = advance(tm, step)?;
        if let Some(t) = resolve(tz, tm) {
            return Some(t);
        }
        if budget == 0 {
            trace!(?step, "time step retry budget exhausted");
            return None;
        }
        budget -= 1;
    }
}

/// Grid steps used for one render: a table row, or steps pinned by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGridSpec {
    pub minor: TimeStep,
    pub major: TimeStep,
    pub label: TimeStep,
    pub precis: i64,
    pub format: String,
}

impl From<&TimeBucket> for TimeGridSpec {
    fn from(b: &TimeBucket) -> Self {
        Self { minor: b.minor, major: b.major, label: b.label, precis: b.precis, format: b.format.to_string() }
    }
}

/// Tick times and label texts for one render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeGrid {
    pub minor: Vec<i64>,
    pub major: Vec<i64>,
    pub labels: Vec<(i64, String)>,
}

impl TimeGrid {
    /// Walk the minor, major and label sequences of `spec` over `span`.
    /// Minor ticks landing on a major tick are dropped.
    pub fn compute(span: TimeSpan, spec: &TimeGridSpec, cal: &Calendar, minor: bool) -> Result<Self> {
        let mut grid = Self::default();

        if minor {
            let mut timajor = cal.first_time(span.start, spec.major);
            let mut ti = cal.first_time(span.start, spec.minor);
            while let Some(t) = ti.filter(|&t| t < span.end) {
                ti = cal.next_time(t, spec.minor);
                if !span.contains(t) {
                    continue;
                }
                while let Some(m) = timajor.filter(|&m| m < t) {
                    timajor = cal.next_time(m, spec.major);
                }
                let Some(m) = timajor else { break };
                if t != m {
                    grid.minor.push(t);
                }
            }
        }

        let mut ti = cal.first_time(span.start, spec.major);
        while let Some(t) = ti.filter(|&t| t < span.end) {
            if span.contains(t) {
                grid.major.push(t);
            }
            ti = cal.next_time(t, spec.major);
        }

        let half = spec.precis / 2;
        let mut ti = cal.first_time(span.start - half, spec.label);
        while let Some(t) = ti.filter(|&t| t <= span.end - half) {
            let at = t + half;
            if span.contains(at) {
                grid.labels.push((at, strftime_at(at, &spec.format, cal.utc)?));
            }
            ti = cal.next_time(t, spec.label);
        }
        Ok(grid)
    }
}

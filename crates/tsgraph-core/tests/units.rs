// File: crates/tsgraph-core/tests/units.rs
// Purpose: SI unit selection, duration formatting and time grid table lookup.

use chrono::Weekday;
use tsgraph_core::format::{format_duration, sprintf, strfduration, time_clean, Arg};
use tsgraph_core::numeric::{auto_scale, si_unit};
use tsgraph_core::timegrid::{select_bucket, Calendar, TimeGrid, TimeGridSpec, TimeStep, TimeUnit};
use tsgraph_core::TimeSpan;

#[test]
fn si_unit_picks_kilo_only_above_base() {
    let small = si_unit(1000.0, 3.0, 97.0, None);
    assert_eq!(small.magfact, 1.0);
    assert_eq!(small.symbol, ' ');

    let large = si_unit(1000.0, 3000.0, 97_000.0, None);
    assert_eq!(large.magfact, 1000.0);
    assert_eq!(large.symbol, 'k');
    assert_eq!(large.viewfactor, 1.0);
}

#[test]
fn pinned_units_exponent_changes_only_the_view() {
    let si = si_unit(1000.0, 0.0, 97_000.0, Some(0));
    assert_eq!(si.magfact, 1000.0);
    assert_eq!(si.symbol, ' ');
    assert_eq!(si.viewfactor, 1000.0);
}

#[test]
fn auto_scale_binary_base() {
    let s = auto_scale(1024.0, 2048.0);
    assert_eq!(s.symbol, 'k');
    assert!((s.value - 2.0).abs() < 1e-12);
    assert_eq!(auto_scale(1000.0, 0.0).symbol, ' ');
}

#[test]
fn duration_default_pattern() {
    assert_eq!(strfduration("%H:%02m:%02s", 3_725_000.0).unwrap(), "1:02:05");
    assert_eq!(format_duration(3_725_000.0, "").unwrap(), "1:02:05");
    assert_eq!(strfduration("%W weeks", -7.0 * 86_400_000.0).unwrap(), "-1 weeks");
}

#[test]
fn duration_rejects_unknown_conversion() {
    assert!(strfduration("%Q", 1.0).is_err());
}

#[test]
fn never_happened_times_become_dashes() {
    assert_eq!(time_clean("%Y-%m-%d %H:%M"), "---------- --:--");
    assert_eq!(time_clean("at %T"), "at --:--:--");
    assert_eq!(time_clean("100%%"), "100%");
}

#[test]
fn nine_seconds_per_pixel_uses_ten_minute_labels() {
    let b = select_bucket(9.0, 3600);
    assert_eq!(b.minsec, 5.0);
    assert_eq!(b.label, TimeStep::new(TimeUnit::Minute, 10));
    assert_eq!(b.format, "%H:%M");
}

#[test]
fn short_spans_skip_day_labelled_row() {
    // both rows at 60 s/px; the weekday row needs at least a day of data
    assert_eq!(select_bucket(60.0, 3600).format, "%H:%M");
    assert_eq!(select_bucket(60.0, 2 * 86_400).format, "%a %H:%M");
}

#[test]
fn hourly_grid_in_utc() {
    let spec = TimeGridSpec {
        minor: TimeStep::new(TimeUnit::Minute, 30),
        major: TimeStep::new(TimeUnit::Hour, 1),
        label: TimeStep::new(TimeUnit::Hour, 2),
        precis: 0,
        format: "%H:%M".to_string(),
    };
    let cal = Calendar { utc: true, first_weekday: Weekday::Mon };
    let grid = TimeGrid::compute(TimeSpan::new(0, 4 * 3600), &spec, &cal, true).unwrap();
    assert_eq!(grid.major, vec![0, 3600, 7200, 10800]);
    assert_eq!(grid.minor, vec![1800, 5400, 9000, 12600]);
    let labels: Vec<&str> = grid.labels.iter().map(|(_, s)| s.as_str()).collect();
    assert_eq!(labels, vec!["00:00", "02:00", "04:00"]);
}

#[test]
fn oversized_printf_fields_are_capped() {
    let wide = sprintf("%99999999999999999999f", &[Arg::Float(1.0)]).unwrap();
    assert_eq!(wide.len(), 200);
    assert!(wide.ends_with("1.000000"));

    let precise = sprintf("%.70000f", &[Arg::Float(1.0)]).unwrap();
    assert!(precise.starts_with("1.000"));
    assert_eq!(precise.len(), 202);
}

#[test]
fn oversized_duration_fields_are_capped() {
    let precise = strfduration("%.70000S", 1500.0).unwrap();
    assert!(precise.starts_with("1.") && precise.len() <= 202, "{} bytes", precise.len());

    let wide = strfduration("%99999999999999999999S", 1500.0).unwrap();
    assert_eq!(wide.len(), 200);
    assert_eq!(wide.trim_start(), "1");
}

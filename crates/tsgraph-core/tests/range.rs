// File: crates/tsgraph-core/tests/range.rs
// Purpose: Per-pixel resampling, value range fitting and horizontal grid solving.

use tsgraph_core::grid::{linear_grid, log_grid};
use tsgraph_core::resample;
use tsgraph_core::scale::{TimeScale, ValueScale};
use tsgraph_core::{Axis, ChartFlags, Element, ElementId, Rgba, SourceData, TimeSpan};

fn constant(value: f64) -> Element {
    Element::def(SourceData::new(0, 10, vec![value; 10]))
}

#[test]
fn no_elements_defaults_to_unit_range() {
    let mut axis = Axis::default();
    resample::process(&mut [], &mut axis, TimeSpan::new(0, 100), 10).unwrap();
    assert_eq!((axis.min, axis.max), (0.0, 1.0));
}

#[test]
fn stacked_line_sits_on_area() {
    let mut elements = vec![
        constant(1.0),
        constant(2.0),
        Element::area(ElementId(0), Rgba::gray(0.5), "base"),
        Element::line(ElementId(1), Rgba::gray(0.1), 1.0, "top").stacked(),
    ];
    let mut axis = Axis::default();
    resample::process(&mut elements, &mut axis, TimeSpan::new(0, 100), 10).unwrap();

    assert_eq!(elements[2].processed.len(), 11);
    assert!(elements[2].processed[..10].iter().all(|&v| v == 1.0));
    assert!(elements[3].processed[..10].iter().all(|&v| v == 3.0));
    assert!(elements[3].processed[10].is_nan());
    assert_eq!((axis.min, axis.max), (1.0, 3.0));
}

#[test]
fn processing_twice_is_stable() {
    let mut elements = vec![
        Element::def(SourceData::new(0, 10, (0..10).map(f64::from).collect())),
        Element::line(ElementId(0), Rgba::gray(0.1), 1.0, ""),
    ];
    let mut axis = Axis::default();
    let span = TimeSpan::new(0, 100);
    resample::process(&mut elements, &mut axis, span, 20).unwrap();
    let first = (elements[1].processed.clone(), axis.min, axis.max);
    resample::process(&mut elements, &mut axis, span, 20).unwrap();
    assert_eq!(elements[1].processed[..20], first.0[..20]);
    assert_eq!((axis.min, axis.max), (first.1, first.2));
}

#[test]
fn rigid_bounds_ignore_outliers() {
    let mut elements = vec![constant(50.0), Element::line(ElementId(0), Rgba::gray(0.1), 1.0, "")];
    let mut axis = Axis::new("", 0.0, 10.0).rigid(false);
    resample::process(&mut elements, &mut axis, TimeSpan::new(0, 100), 10).unwrap();
    assert_eq!((axis.min, axis.max), (0.0, 10.0));
}

#[test]
fn flat_data_gets_a_nonzero_range() {
    let mut elements = vec![constant(0.0), Element::line(ElementId(0), Rgba::gray(0.1), 1.0, "")];
    let mut axis = Axis::default();
    resample::process(&mut elements, &mut axis, TimeSpan::new(0, 100), 10).unwrap();
    assert!(axis.min < axis.max);
}

#[test]
fn classic_grid_picks_step_and_label_factor() {
    let mut axis = Axis::new("", 0.0, 100.0);
    assert!(axis.calc_horizontal_grid(100.0, 8.0, ChartFlags::empty()));
    assert_eq!(axis.grid.step, 5.0);
    assert_eq!(axis.grid.label_factor, 4);
    assert!(axis.grid.step > 0.0 && axis.min < axis.max);
}

#[test]
fn classic_grid_without_room_keeps_factor_two() {
    // 5 px per step and no factor reaching 1.8 x font size
    let mut axis = Axis::new("", 0.0, 1000.0);
    assert!(axis.calc_horizontal_grid(10.0, 100.0, ChartFlags::empty()));
    assert_eq!(axis.grid.step, 500.0);
    assert_eq!(axis.grid.label_factor, 2);
}

#[test]
fn nan_range_has_no_grid() {
    let mut axis = Axis::new("", f64::NAN, 1.0);
    assert!(!axis.calc_horizontal_grid(100.0, 8.0, ChartFlags::empty()));
}

#[test]
fn alt_grid_builds_label_format() {
    let mut axis = Axis::new("", 0.0, 1.0);
    axis.apply_si_unit();
    assert!(axis.calc_horizontal_grid(100.0, 8.0, ChartFlags::ALT_Y_GRID));
    assert!(axis.grid.step > 0.0);
    assert!(axis.grid.label_format.starts_with('%'));
    assert!(axis.grid.label_format.ends_with('f'));
}

#[test]
fn gridfit_lands_lines_on_whole_pixels() {
    let flags = ChartFlags::empty();
    let mut axis = Axis::new("", 0.0, 100.0);
    assert!(axis.calc_horizontal_grid(97.0, 8.0, flags));
    let mut scale = ValueScale::new(97.0, 97.0, axis.min, axis.max, false);
    axis.apply_gridfit(&mut scale, 8.0, flags);

    assert!(axis.max > 100.0);
    assert_eq!((scale.min, scale.max), (axis.min, axis.max));
    let d = scale.to_px(axis.min) - scale.to_px(axis.min + axis.grid.step);
    assert!((d - d.round()).abs() < 1e-6, "step spans {d} px");
}

#[test]
fn without_gridfit_bounds_stay_put() {
    let mut axis = Axis::new("", 0.0, 100.0);
    assert!(axis.calc_horizontal_grid(97.0, 8.0, ChartFlags::empty()));
    let scale = ValueScale::new(97.0, 97.0, axis.min, axis.max, false);
    assert_eq!((axis.min, axis.max), (0.0, 100.0));
    let d = scale.to_px(0.0) - scale.to_px(axis.grid.step);
    assert!((d - 4.85).abs() < 1e-9);
}

#[test]
fn linear_grid_labels_every_fourth_line() {
    let mut axis = Axis::new("", 0.0, 100.0);
    assert!(axis.calc_horizontal_grid(100.0, 8.0, ChartFlags::empty()));
    let scale = ValueScale::new(100.0, 100.0, 0.0, 100.0, false);
    let lines = linear_grid(&axis, None, &scale, ChartFlags::empty());

    let labels: Vec<&str> = lines.iter().filter_map(|l| l.label.as_deref()).collect();
    assert_eq!(labels, vec!["   0", "  20", "  40", "  60", "  80", " 100"]);
    assert_eq!(lines.iter().filter(|l| !l.major).count(), 15);
    assert!(lines.iter().all(|l| l.y >= 0.0 && l.y <= 100.0));

    let majors_only = linear_grid(&axis, None, &scale, ChartFlags::NO_MINOR);
    assert_eq!(majors_only.len(), 6);
}

#[test]
fn log_grid_over_six_hundred_decades_terminates() {
    let axis = Axis::new("", 1e-300, 1e300).log10();
    let scale = ValueScale::new(100.0, 100.0, axis.min, axis.max, true);
    let lines = log_grid(&axis, None, &scale, 8.0, ChartFlags::empty()).expect("grid");
    assert!(lines.iter().filter(|l| l.major).count() >= 3);
    assert!(lines.iter().filter(|l| l.major).all(|l| l.label.as_deref().is_some_and(|s| s.contains('e'))));
}

#[test]
fn log_grid_marks_decades() {
    let axis = Axis::new("", 1.0, 1000.0).log10();
    let scale = ValueScale::new(300.0, 300.0, 1.0, 1000.0, true);
    let lines = log_grid(&axis, None, &scale, 8.0, ChartFlags::empty()).expect("grid");
    let labels: Vec<&str> = lines.iter().filter_map(|l| l.label.as_deref()).collect();
    // the top edge itself is never labelled
    for decade in ["1e+00", "5e+00", "1e+01", "1e+02", "5e+02"] {
        assert!(labels.contains(&decade), "missing {decade} in {labels:?}");
    }
}

#[test]
fn scales_round_trip() {
    let ys = ValueScale::new(200.0, 150.0, -3.0, 12.0, false);
    for v in [-3.0, 0.0, 4.5, 12.0] {
        assert!((ys.from_px(ys.to_px(v)) - v).abs() < 1e-9);
    }
    let logs = ValueScale::new(200.0, 150.0, 1.0, 1e4, true);
    assert!((logs.from_px(logs.to_px(250.0)) - 250.0).abs() < 1e-6);

    let xs = TimeScale::new(50.0, 400.0, 1000, 5000);
    assert_eq!(xs.to_px(1000), 50.0);
    assert_eq!(xs.to_px(5000), 450.0);
}

#[test]
fn log_gridfit_lands_decades_on_whole_pixels() {
    let flags = ChartFlags::empty();
    let mut axis = Axis::new("", 1.0, 1000.0).log10();
    assert!(axis.calc_horizontal_grid(97.0, 8.0, flags));
    let mut scale = ValueScale::new(97.0, 97.0, axis.min, axis.max, true);
    axis.apply_gridfit(&mut scale, 8.0, flags);

    assert_eq!(axis.min, 1.0);
    assert!(axis.max > 1000.0);
    let d = scale.to_px(1.0) - scale.to_px(10.0);
    assert!((d - d.round()).abs() < 1e-6, "decade spans {d} px");
}

#[test]
fn log_without_gridfit_keeps_fractional_decades() {
    let mut axis = Axis::new("", 1.0, 1000.0).log10();
    assert!(axis.calc_horizontal_grid(97.0, 8.0, ChartFlags::empty()));
    let scale = ValueScale::new(97.0, 97.0, axis.min, axis.max, true);
    assert_eq!((axis.min, axis.max), (1.0, 1000.0));
    let d = scale.to_px(1.0) - scale.to_px(10.0);
    assert!((d - 97.0 / 3.0).abs() < 1e-9);
}

#[test]
fn unusable_fixed_step_falls_back_to_automatic() {
    for step in [1e-9, 0.0, -5.0, f64::NAN, f64::INFINITY] {
        let mut axis = Axis::new("", 0.0, 100.0);
        axis.grid_step = Some(step);
        assert!(axis.calc_horizontal_grid(100.0, 8.0, ChartFlags::empty()));
        assert_eq!(axis.grid.step, 5.0, "step {step} was kept");
        assert_eq!(axis.grid.label_factor, 4);
    }
}

#[test]
fn usable_fixed_step_is_kept() {
    let mut axis = Axis::new("", 0.0, 100.0);
    axis.grid_step = Some(25.0);
    axis.label_factor = 1;
    assert!(axis.calc_horizontal_grid(100.0, 8.0, ChartFlags::empty()));
    assert_eq!((axis.grid.step, axis.grid.label_factor), (25.0, 1));
}

#[test]
fn linear_grid_refuses_more_lines_than_rows() {
    let mut axis = Axis::new("", 0.0, 100.0);
    axis.grid.step = 1e-9;
    let scale = ValueScale::new(100.0, 100.0, 0.0, 100.0, false);
    assert!(linear_grid(&axis, None, &scale, ChartFlags::empty()).is_empty());
}

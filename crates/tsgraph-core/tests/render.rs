// File: crates/tsgraph-core/tests/render.rs
// Purpose: End-to-end render pipeline against a recording backend.

mod common;

use common::{Call, Recorder};
use tsgraph_core::{
    Axis, Chart, ChartFlags, Consolidation, Element, LegendPosition, RenderOptions, Rgba, SecondAxis, SourceData,
};

const DAY: i64 = 86_400;

fn utc_opts() -> RenderOptions {
    RenderOptions { flags: ChartFlags::FORCE_UTC_TIME, ..RenderOptions::default() }
}

fn wave_chart() -> Chart {
    let mut chart = Chart::new(0, DAY);
    let values: Vec<f64> = (0..288).map(|i| 50.0 + 40.0 * (f64::from(i) * 0.05).sin()).collect();
    let src = chart.push(Element::def(SourceData::new(0, 300, values)));
    chart.push(Element::area(src, Rgba::from_hex(0x00cc00ff), "inbound"));
    chart.push(Element::gprint(src, Consolidation::Maximum, "max %5.1lf\\l"));
    chart
}

#[test]
fn empty_chart_renders() {
    let mut chart = Chart::new(0, DAY);
    let mut gfx = Recorder::default();
    let report = chart.render(&utc_opts(), &mut gfx).unwrap();

    assert!(report.prints.is_empty());
    assert!(report.has_grid);
    assert!(report.min < report.max);
    assert!(report.grid_step > 0.0);
    assert_eq!((report.layout.xsize, report.layout.ysize), (400.0, 100.0));
    assert!(report.layout.ximg > 400.0 && report.layout.yimg > 100.0);
    assert_eq!(
        gfx.calls.first(),
        Some(&Call::Setup { width: report.layout.ximg as u32, height: report.layout.yimg as u32 })
    );
    assert_eq!(gfx.calls.last(), Some(&Call::Finish));
    assert!(!gfx.texts().contains(&"No Data found"));
}

#[test]
fn data_legend_and_rules_are_drawn() {
    let mut chart = wave_chart();
    let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
    chart.push(Element::hrule(60.0, red, "limit\\l"));
    let opts = RenderOptions { title: "Traffic".into(), ..utc_opts() };
    let mut gfx = Recorder::default();
    let report = chart.render(&opts, &mut gfx).unwrap();

    assert!(report.min <= 10.0 && report.max >= 90.0);
    let texts = gfx.texts();
    assert!(texts.contains(&"Traffic"));
    assert!(texts.contains(&"  inbound"));
    assert!(texts.iter().any(|t| t.starts_with("max ") && t.contains('.')));
    assert!(texts.contains(&"  limit"));

    // rules go on top of everything else
    let n = gfx.calls.len();
    assert!(matches!(gfx.calls[n - 2], Call::Line { color, .. } if color == red));
    assert_eq!(gfx.lines_with(red), 1);
}

#[test]
fn only_graph_skips_decorations() {
    let mut chart = wave_chart();
    let opts = RenderOptions { flags: ChartFlags::ONLY_GRAPH | ChartFlags::FORCE_UTC_TIME, ..RenderOptions::default() };
    let mut gfx = Recorder::default();
    let report = chart.render(&opts, &mut gfx).unwrap();

    assert_eq!(gfx.calls.first(), Some(&Call::Setup { width: 400, height: 100 }));
    assert!(gfx.texts().is_empty());
    assert!(report.legend.slots.is_empty());
}

#[test]
fn full_size_mode_keeps_image_size() {
    let mut chart = wave_chart();
    let opts = RenderOptions {
        width: 600,
        height: 300,
        flags: ChartFlags::FULL_SIZE_MODE | ChartFlags::FORCE_UTC_TIME,
        ..RenderOptions::default()
    };
    let mut gfx = Recorder::default();
    let report = chart.render(&opts, &mut gfx).unwrap();
    assert_eq!((report.layout.ximg, report.layout.yimg), (600.0, 300.0));
    assert!(report.layout.xsize < 600.0 && report.layout.ysize < 300.0);
}

#[test]
fn east_legend_widens_the_image() {
    let mut south = wave_chart();
    let mut east = wave_chart();
    let base = south.render(&utc_opts(), &mut Recorder::default()).unwrap();
    let opts = RenderOptions { legend_position: LegendPosition::East, ..utc_opts() };
    let side = east.render(&opts, &mut Recorder::default()).unwrap();
    assert!(side.layout.ximg > base.layout.ximg);
    assert!(side.layout.legend.0 > side.layout.xorigin + side.layout.xsize);
}

#[test]
fn log_axis_renders_decades() {
    let mut chart = Chart::new(0, DAY);
    chart.y_axis = Axis::default().log10();
    let values: Vec<f64> = (0..288).map(|i| 10f64.powf(f64::from(i) / 96.0)).collect();
    let src = chart.push(Element::def(SourceData::new(0, 300, values)));
    chart.push(Element::line(src, Rgba::gray(0.0), 1.0, "growth"));
    let mut gfx = Recorder::default();
    let report = chart.render(&utc_opts(), &mut gfx).unwrap();

    assert!(report.has_grid);
    assert!(report.min > 0.0);
    assert!(gfx.texts().iter().any(|t| t.contains("e+0")));
}

#[test]
fn second_axis_labels_on_the_right() {
    let mut chart = wave_chart();
    chart.right_axis = Some(SecondAxis::new(8.0, 0.0, "bits"));
    let mut gfx = Recorder::default();
    let report = chart.render(&utc_opts(), &mut gfx).unwrap();
    let right_edge = report.layout.xorigin + report.layout.xsize;
    assert!(gfx
        .calls
        .iter()
        .any(|c| matches!(c, Call::Text { x, .. } if *x > right_edge)));
    assert!(gfx.texts().contains(&"bits"));
}

#[test]
fn gridfit_stretches_the_top_bound() {
    let opts = RenderOptions { height: 97, ..utc_opts() };
    let fitted = wave_chart().render(&opts, &mut Recorder::default()).unwrap();
    let raw = wave_chart()
        .render(&RenderOptions { gridfit: false, ..opts.clone() }, &mut Recorder::default())
        .unwrap();
    assert_eq!(raw.layout, fitted.layout);
    assert_eq!(raw.min, fitted.min);
    assert!(fitted.max > raw.max);
}

#[test]
fn tiny_fixed_grid_step_still_renders() {
    let mut chart = Chart::new(0, DAY);
    let src = chart.push(Element::def(SourceData::new(0, 300, vec![50.0; 288])));
    chart.push(Element::line(src, Rgba::from_hex(0x0000ffff), 1.0, "flat"));
    chart.y_axis.grid_step = Some(1e-9);
    let mut gfx = Recorder::default();
    let report = chart.render(&utc_opts(), &mut gfx).unwrap();
    assert!(report.has_grid);
    assert!(report.grid_step > 1e-6, "kept step {}", report.grid_step);
    assert!(gfx.count(|c| matches!(c, Call::Line { .. })) < 1_000);
}

// File: crates/tsgraph-core/tests/paint.rs
// Purpose: Data painters against a recording backend: step and slope lines, area runs,
//          gradients, gap filling, clamping, ticks and legend stacking direction.

mod common;

use common::{Call, Recorder};
use tsgraph_core::geometry::Layout;
use tsgraph_core::paint::{paint_area, paint_line, paint_tick, PaintContext};
use tsgraph_core::scale::{TimeScale, ValueScale};
use tsgraph_core::{
    Chart, ChartFlags, Element, ElementId, LegendDirection, RenderOptions, Rgba, SourceData,
};

const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);
const GREEN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);

/// Ten columns over a 0..100 value range; one value unit is one pixel row.
struct Plot {
    opts: RenderOptions,
    layout: Layout,
    x: TimeScale,
    y: ValueScale,
}

impl Plot {
    fn new(slope_mode: bool) -> Self {
        let layout = Layout { ximg: 10.0, yimg: 100.0, xorigin: 0.0, yorigin: 100.0, xsize: 10.0, ysize: 100.0, ..Layout::default() };
        Self {
            opts: RenderOptions { slope_mode, ..RenderOptions::default() },
            layout,
            x: TimeScale::new(0.0, 10.0, 0, 10),
            y: ValueScale::new(100.0, 100.0, 0.0, 100.0, false),
        }
    }

    fn ctx(&self) -> PaintContext<'_> {
        PaintContext { opts: &self.opts, layout: &self.layout, x: &self.x, y: &self.y }
    }
}

fn line_with(values: Vec<f64>) -> Element {
    let mut el = Element::line(ElementId(0), BLUE, 1.0, "");
    el.processed = values;
    el
}

fn area_with(values: Vec<f64>) -> Element {
    let mut el = Element::area(ElementId(0), GREEN, "");
    el.processed = values;
    el
}

fn ramp() -> Vec<f64> {
    (0..=10).map(|i| f64::from(i) * 10.0).collect()
}

#[test]
fn stair_step_line_doubles_each_change() {
    let plot = Plot::new(false);
    let mut gfx = Recorder::default();
    paint_line(&mut gfx, &plot.ctx(), &mut line_with(ramp()), None);

    assert_eq!(gfx.calls.first(), Some(&Call::Path { color: BLUE }));
    assert_eq!(gfx.count(|c| matches!(c, Call::MoveTo(..))), 1);
    assert_eq!(gfx.count(|c| matches!(c, Call::LineTo(..))), 17);
    // vertical riser at the column boundary, then the flat tread
    assert!(gfx.calls.contains(&Call::LineTo(1.0, 80.0)));
    assert!(gfx.calls.contains(&Call::LineTo(2.0, 80.0)));
    assert_eq!(gfx.calls.last(), Some(&Call::Close));
}

#[test]
fn slope_line_has_one_vertex_per_column() {
    let plot = Plot::new(true);
    let mut gfx = Recorder::default();
    paint_line(&mut gfx, &plot.ctx(), &mut line_with(ramp()), None);

    assert!(gfx.calls.contains(&Call::MoveTo(0.0, 100.0)));
    assert_eq!(gfx.count(|c| matches!(c, Call::LineTo(..))), 9);
    assert!(!gfx.calls.contains(&Call::LineTo(1.0, 80.0)));
}

#[test]
fn line_breaks_at_gaps() {
    let plot = Plot::new(false);
    let mut values = vec![40.0; 11];
    values[5] = f64::NAN;
    let mut gfx = Recorder::default();
    paint_line(&mut gfx, &plot.ctx(), &mut line_with(values), None);
    assert_eq!(gfx.count(|c| matches!(c, Call::MoveTo(..))), 2);
}

#[test]
fn nan_gap_splits_area_into_runs() {
    let plot = Plot::new(false);
    let values = vec![5.0, 10.0, 20.0, f64::NAN, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0];
    let mut gfx = Recorder::default();
    paint_area(&mut gfx, &plot.ctx(), &mut area_with(values), None);

    assert_eq!(gfx.count(|c| *c == Call::Area { color: GREEN }), 2);
    assert_eq!(gfx.count(|c| *c == Call::Close), 2);
}

#[test]
fn flat_area_collapses_to_a_quad() {
    let plot = Plot::new(false);
    let mut gfx = Recorder::default();
    paint_area(&mut gfx, &plot.ctx(), &mut area_with(vec![50.0; 11]), None);

    assert_eq!(gfx.count(|c| *c == Call::Area { color: GREEN }), 1);
    // three seed corners plus two closing points
    assert_eq!(gfx.count(|c| matches!(c, Call::AddPoint(..))), 2);
    assert_eq!(gfx.calls.last(), Some(&Call::Close));
}

#[test]
fn gradient_area_paints_fade_slices() {
    let plot = Plot::new(false);
    let mut el = area_with(vec![50.0; 11]).gradient(BLUE, 0.0);
    let mut gfx = Recorder::default();
    paint_area(&mut gfx, &plot.ctx(), &mut el, None);

    let fades: Vec<&Call> = gfx.calls.iter().filter(|c| matches!(c, Call::Fade { .. })).collect();
    assert!(!fades.is_empty());
    for fade in fades {
        assert!(matches!(fade, Call::Fade { color, color2, height, .. }
            if *color == GREEN && *color2 == BLUE && *height == 0.0));
    }
    assert_eq!(gfx.count(|c| matches!(c, Call::Area { .. } | Call::Close)), 0);
}

#[test]
fn stacked_gaps_take_the_value_below() {
    let plot = Plot::new(false);
    let below = line_with(vec![30.0; 11]);
    let mut values = vec![45.0; 11];
    values[3] = f64::NAN;
    let mut stacked = line_with(values.clone()).stacked();
    let mut plain = line_with(values);

    let mut gfx = Recorder::default();
    paint_line(&mut gfx, &plot.ctx(), &mut stacked, Some(&below));
    paint_line(&mut gfx, &plot.ctx(), &mut plain, Some(&below));

    assert_eq!(stacked.processed[3], 30.0);
    assert_eq!(plain.processed[3], 0.0);
    assert_eq!(stacked.processed[4], 45.0);
}

#[test]
fn extreme_values_are_clamped_near_the_plot() {
    let plot = Plot::new(false);
    let mut values = vec![50.0; 11];
    values[..4].copy_from_slice(&[f64::INFINITY, f64::NEG_INFINITY, 1e9, -1e9]);
    let mut el = line_with(values);
    let mut gfx = Recorder::default();
    paint_line(&mut gfx, &plot.ctx(), &mut el, None);

    assert_eq!(el.processed[..5], [100.0, 0.0, 1000.0, -900.0, 50.0]);
}

#[test]
fn ticks_rise_from_the_bottom_or_hang_from_the_top() {
    let plot = Plot::new(false);
    let values = vec![0.0, 1.0, f64::NAN, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

    let mut up = Element::tick(ElementId(0), BLUE, 0.5, "");
    up.processed = values.clone();
    let mut gfx = Recorder::default();
    paint_tick(&mut gfx, &plot.ctx(), &up);
    assert_eq!(gfx.lines_with(BLUE), 3);
    assert_eq!(gfx.calls[0], Call::Line { from: (1.0, 101.0), to: (1.0, 50.0), color: BLUE, dashed: false });

    let mut down = Element::tick(ElementId(0), BLUE, -0.25, "");
    down.processed = values;
    let mut gfx = Recorder::default();
    paint_tick(&mut gfx, &plot.ctx(), &down);
    assert_eq!(gfx.calls[0], Call::Line { from: (1.0, -1.0), to: (1.0, 25.0), color: BLUE, dashed: false });
}

fn legend_rows(direction: LegendDirection) -> [f64; 4] {
    let mut chart = Chart::new(0, 3_000);
    let src = chart.push(Element::def(SourceData::new(0, 300, vec![1.0; 10])));
    chart.push(Element::comment("head\\l"));
    chart.push(Element::area(src, GREEN, "a\\l"));
    chart.push(Element::area(src, BLUE, "b\\l").stacked());
    chart.push(Element::comment("foot\\l"));
    let opts = RenderOptions { flags: ChartFlags::FORCE_UTC_TIME, legend_direction: direction, ..RenderOptions::default() };
    let mut gfx = Recorder::default();
    chart.render(&opts, &mut gfx).unwrap();
    let y = |t: &str| gfx.text_y(t).unwrap_or_else(|| panic!("no legend text {t:?}"));
    [y("head"), y("  a"), y("  b"), y("foot")]
}

#[test]
fn legend_direction_reorders_rows() {
    let top_down = legend_rows(LegendDirection::TopDown);
    assert!(top_down.windows(2).all(|w| w[0] < w[1]), "{top_down:?}");

    let bottom_up = legend_rows(LegendDirection::BottomUp);
    assert!(bottom_up.windows(2).all(|w| w[0] > w[1]), "{bottom_up:?}");
    assert!(same_row(bottom_up[0], top_down[3]));

    // only the graph entries swap; comments around them stay put
    let graphs_up = legend_rows(LegendDirection::BottomUp2);
    assert!(same_row(graphs_up[0], top_down[0]));
    assert!(same_row(graphs_up[3], top_down[3]));
    assert!(same_row(graphs_up[1], top_down[2]) && same_row(graphs_up[2], top_down[1]), "{graphs_up:?}");
}

fn same_row(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

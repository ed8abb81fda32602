// File: crates/tsgraph-core/src/paint.rs
// Summary: Drawing passes: canvas, data curves, rules, grids, decorations and legend.

use crate::backend::GraphicsBackend;
use crate::chart::RenderOptions;
use crate::geometry::Layout;
use crate::grid::GridLine;
use crate::legend::{has_box, LegendLayout};
use crate::numeric::almost_equal;
use crate::scale::{TimeScale, ValueScale};
use crate::series::{Element, ElementKind};
use crate::text::{split_title, FontRole};
use crate::theme::ColorRole;
use crate::timegrid::TimeGrid;
use crate::types::{Dash, HAlign, LegendDirection, Rgba, VAlign, GRID_WIDTH, MGRID_WIDTH, YLEGEND_ANGLE};

/// Shared state of one paint run.
pub struct PaintContext<'a> {
    pub opts: &'a RenderOptions,
    pub layout: &'a Layout,
    pub x: &'a TimeScale,
    pub y: &'a ValueScale,
}

impl PaintContext<'_> {
    fn color(&self, role: ColorRole) -> Rgba {
        self.opts.theme[role]
    }

    /// Baseline for unstacked areas: zero, or the nearest bound when zero is off the plot.
    fn area_zero(&self) -> f64 {
        if self.y.min > 0.0 {
            self.y.min
        } else if self.y.max < 0.0 {
            self.y.max
        } else {
            0.0
        }
    }

    fn columns(&self) -> usize {
        self.layout.xsize.max(0.0) as usize
    }
}

/// Open the backend context and paint the background and the plot canvas.
pub fn paint_setup(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>) -> crate::error::Result<()> {
    let lay = ctx.layout;
    let zoom = ctx.opts.zoom;
    gfx.setup((lay.ximg * zoom) as u32, (lay.yimg * zoom) as u32, zoom)?;

    gfx.new_area((0.0, 0.0), (0.0, lay.yimg), (lay.ximg, lay.yimg), ctx.color(ColorRole::Back));
    gfx.add_point(lay.ximg, 0.0);
    gfx.close_path();

    let (l, r, t, b) = (lay.plot_left(), lay.plot_right(), lay.plot_top(), lay.plot_bottom());
    gfx.new_area((l, b), (r, b), (r, t), ctx.color(ColorRole::Canvas));
    gfx.add_point(l, t);
    gfx.close_path();

    // plot frame; transparent so backends may treat it as the clip box
    gfx.rectangle(l, t - 1.0, lay.xsize, lay.ysize + 2.0, 1.0, Rgba::TRANSPARENT);
    Ok(())
}

/// Keep curve values finite and near the plot so backends never see huge coordinates.
fn clamp_columns(ctx: &PaintContext<'_>, data: &mut [f64]) {
    let (min, max) = (ctx.y.min, ctx.y.max);
    let diff = max - min;
    let (lo, hi) = (min - 9.0 * diff, max + 9.0 * diff);
    for v in data.iter_mut() {
        if v.is_infinite() {
            *v = if *v > 0.0 { max } else { min };
        }
        if *v > hi {
            *v = hi;
        }
        if *v < lo {
            *v = lo;
        }
    }
}

/// Replace gaps with the value below so a following stacked element has a base.
fn fill_gaps(ctx: &PaintContext<'_>, el: &mut Element, below: Option<&Element>) {
    let zero = ctx.area_zero();
    let n = ctx.columns().min(el.processed.len());
    for ii in 0..n {
        if el.processed[ii].is_nan() {
            el.processed[ii] = match below {
                Some(b) if el.stack => b.processed.get(ii).copied().unwrap_or(zero),
                _ => zero,
            };
        }
    }
}

/// Stroke a LINE element. `below` is the last line or area painted before it.
pub fn paint_line(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, el: &mut Element, below: Option<&Element>) {
    let xsize = ctx.columns().min(el.processed.len());
    clamp_columns(ctx, &mut el.processed[..xsize]);

    if el.color.a != 0.0 {
        match &el.dash {
            Some(d) => gfx.new_dashed_path(el.line_width, el.color, d),
            None => gfx.new_path(el.line_width, el.color),
        }
        let xo = ctx.layout.xorigin;
        let slope = ctx.opts.slope_mode;
        let data = &el.processed;
        let mut last_y = 0.0;
        let mut draw_on = false;
        for ii in 1..xsize {
            if data[ii].is_nan() || (slope && data[ii - 1].is_nan()) {
                draw_on = false;
                continue;
            }
            let x = ii as f64 + xo;
            if !draw_on {
                last_y = ctx.y.to_px(data[ii]);
                let start_y = if slope { ctx.y.to_px(data[ii - 1]) } else { last_y };
                gfx.move_to(x - 1.0, start_y);
                gfx.line_to(x, last_y);
                draw_on = true;
            } else {
                let y1 = ctx.y.to_px(data[ii]);
                if !slope && !almost_equal(y1, last_y) {
                    gfx.line_to(x - 1.0, y1);
                }
                last_y = y1;
                gfx.line_to(x, y1);
            }
        }
        gfx.close_path();
    }
    fill_gaps(ctx, el, below);
}

/// Outline points of one contiguous area run.
#[derive(Default)]
struct AreaRun {
    fore: Vec<(f64, f64)>,
    back: Vec<(f64, f64)>,
}

impl AreaRun {
    fn clear(&mut self) {
        self.fore.clear();
        self.back.clear();
    }
}

/// Fill an AREA element, or paint it as a vertical gradient when it has a second color.
pub fn paint_area(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, el: &mut Element, below: Option<&Element>) {
    let xsize = ctx.columns().min(el.processed.len());
    clamp_columns(ctx, &mut el.processed[..xsize]);

    if el.color.a != 0.0 {
        let zero = ctx.area_zero();
        let xo = ctx.layout.xorigin;
        let slope = ctx.opts.slope_mode;
        let mut run = AreaRun::default();
        let mut drawem = false;
        for ii in 0..=xsize {
            if run.fore.len() > 1 && (drawem || ii == xsize) {
                flush_area(gfx, el, &run);
                run.clear();
                drawem = false;
            }
            if drawem {
                drawem = false;
                run.clear();
            }
            if ii == xsize {
                break;
            }
            if !slope && ii == 0 {
                continue;
            }
            let v = el.processed[ii];
            if v.is_nan() {
                drawem = true;
                continue;
            }
            let mut ytop = ctx.y.to_px(v);
            let mut ybase = match below {
                Some(b) if el.stack => ctx.y.to_px(b.processed.get(ii).copied().unwrap_or(zero)),
                _ => ctx.y.to_px(zero),
            };
            if ybase == ytop {
                drawem = true;
                continue;
            }
            if ybase > ytop {
                std::mem::swap(&mut ybase, &mut ytop);
            }
            let x = ii as f64 + xo;
            if !slope {
                run.back.push((x - 1.0, ybase - 0.2));
                run.fore.push((x - 1.0, ytop + 0.2));
            }
            run.back.push((x, ybase - 0.2));
            run.fore.push((x, ytop + 0.2));
        }
    }
    fill_gaps(ctx, el, below);
}

/// Emit one run, skipping interior points on flat stretches.
fn flush_area(gfx: &mut dyn GraphicsBackend, el: &Element, run: &AreaRun) {
    let (fore, back) = (&run.fore, &run.back);
    let last = fore.len() - 1;
    let flat = |pts: &[(f64, f64)], a: usize, b: usize, c: usize| {
        almost_equal(pts[a].1, pts[b].1) && almost_equal(pts[a].1, pts[c].1)
    };

    let gradient = el.color2;
    let mut prev = (0.0, 0.0);
    let mut cnt = 1;
    while cnt < last && flat(fore, 0, cnt, cnt + 1) {
        cnt += 1;
    }
    match gradient {
        None => gfx.new_area(back[0], fore[0], fore[cnt], el.color),
        Some(_) => prev = fore[cnt],
    }
    while cnt < last {
        let from = cnt;
        cnt += 1;
        while cnt < last && flat(fore, from, cnt, cnt + 1) {
            cnt += 1;
        }
        emit_point(gfx, el, fore[0].1, fore[cnt], &mut prev);
    }
    emit_point(gfx, el, fore[0].1, back[last], &mut prev);
    let mut idx = last;
    while idx > 1 {
        let from = idx;
        idx -= 1;
        while idx > 1 && flat(back, from, idx, idx - 1) {
            idx -= 1;
        }
        emit_point(gfx, el, fore[0].1, back[idx], &mut prev);
    }
    if gradient.is_none() {
        gfx.close_path();
    }
}

/// Extend the open area, or paint the gradient slice from `prev` to `p`.
fn emit_point(gfx: &mut dyn GraphicsBackend, el: &Element, base_y: f64, p: (f64, f64), prev: &mut (f64, f64)) {
    match el.color2 {
        None => gfx.add_point(p.0, p.1),
        Some(c2) => {
            gfx.add_rect_fadey(prev.0, base_y, p.0, p.1, prev.1, el.color, c2, el.gradient_height);
            *prev = p;
        }
    }
}

/// Vertical tick per column with data; height is a fraction of the plot,
/// negative fractions hang from the top edge.
pub fn paint_tick(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, el: &Element) {
    let lay = ctx.layout;
    let n = ctx.columns().min(el.processed.len());
    for (i, v) in el.processed[..n].iter().enumerate() {
        if v.is_nan() || *v == 0.0 {
            continue;
        }
        let x = lay.xorigin + i as f64;
        if el.yrule > 0.0 {
            gfx.line(x, lay.yorigin + 1.0, x, lay.yorigin - el.yrule * lay.ysize, 1.0, el.color);
        } else if el.yrule < 0.0 {
            let top = lay.plot_top();
            gfx.line(x, top - 1.0, x, top - el.yrule * lay.ysize, 1.0, el.color);
        }
    }
}

fn rule(gfx: &mut dyn GraphicsBackend, el: &Element, from: (f64, f64), to: (f64, f64)) {
    match &el.dash {
        Some(d) => gfx.dashed_line(from.0, from.1, to.0, to.1, 1.0, el.color, d),
        None => gfx.line(from.0, from.1, to.0, to.1, 1.0, el.color),
    }
}

pub fn paint_hrule(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, el: &Element) {
    if el.yrule >= ctx.y.min && el.yrule <= ctx.y.max {
        let y = ctx.y.to_px(el.yrule);
        rule(gfx, el, (ctx.layout.plot_left(), y), (ctx.layout.plot_right(), y));
    }
}

pub fn paint_vrule(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, el: &Element) {
    if el.xrule >= ctx.x.start && el.xrule <= ctx.x.end {
        let x = ctx.x.to_px(el.xrule);
        rule(gfx, el, (x, ctx.layout.plot_bottom()), (x, ctx.layout.plot_top()));
    }
}

// ---- grid and decorations ---------------------------------------------------

/// Inputs of [`grid_paint`] computed earlier in the render.
pub struct GridInputs<'a> {
    pub time_grid: Option<&'a TimeGrid>,
    /// Horizontal gridlines; `None` means no usable value range.
    pub value_grid: Option<&'a [GridLine]>,
    pub unit_left: &'a str,
    pub unit_right: &'a str,
    pub legend: &'a LegendLayout,
}

/// Border, grids, unit legends, title, watermark and legend.
pub fn grid_paint(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, elements: &[Element], input: &GridInputs<'_>) {
    let opts = ctx.opts;
    let lay = ctx.layout;
    let font_color = ctx.color(ColorRole::Font);

    if opts.border > 0.0 {
        let i = opts.border;
        let (w, h) = (lay.ximg, lay.yimg);
        gfx.new_area((0.0, h), (i, h - i), (i, i), ctx.color(ColorRole::ShadeA));
        gfx.add_point(w - i, i);
        gfx.add_point(w, 0.0);
        gfx.add_point(0.0, 0.0);
        gfx.close_path();
        gfx.new_area((i, h - i), (w - i, h - i), (w - i, i), ctx.color(ColorRole::ShadeB));
        gfx.add_point(w, 0.0);
        gfx.add_point(w, h);
        gfx.add_point(0.0, h);
        gfx.close_path();
    }

    if opts.draw_x_grid {
        if let Some(tg) = input.time_grid {
            vertical_grid(gfx, ctx, tg);
        }
    }

    if opts.draw_y_grid {
        match input.value_grid {
            Some(lines) => horizontal_grid(gfx, ctx, lines),
            None => {
                let axis_font = &opts.fonts[FontRole::Axis];
                gfx.text(
                    (lay.ximg / 2.0).trunc(),
                    ((2.0 * lay.yorigin - lay.ysize) / 2.0).trunc(),
                    font_color,
                    axis_font,
                    opts.tab_width,
                    0.0,
                    HAlign::Center,
                    VAlign::Center,
                    "No Data found",
                );
            }
        }
    }

    let unit_font = &opts.fonts[FontRole::Unit];
    for (text, at) in [(input.unit_left, lay.unit_left), (input.unit_right, lay.unit_right)] {
        if !text.is_empty() {
            gfx.text(at.0 + 10.0, at.1, font_color, unit_font, opts.tab_width, YLEGEND_ANGLE, HAlign::Center, VAlign::Center, text);
        }
    }

    let title_font = &opts.fonts[FontRole::Title];
    for (j, line) in split_title(&opts.title).iter().enumerate() {
        let y = title_font.size * 1.3 + title_font.size * 1.6 * j as f64;
        gfx.text((lay.ximg / 2.0).trunc(), y, font_color, title_font, opts.tab_width, 0.0, HAlign::Center, VAlign::Top, line);
    }

    if !opts.watermark.is_empty() {
        gfx.text(
            (lay.ximg / 2.0).trunc(),
            lay.yimg - 6.0,
            font_color.with_alpha(0.3),
            &opts.fonts[FontRole::Watermark],
            opts.tab_width,
            0.0,
            HAlign::Center,
            VAlign::Bottom,
            &opts.watermark,
        );
    }

    legend_paint(gfx, ctx, elements, input.legend);
}

fn vertical_grid(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, tg: &TimeGrid) {
    let opts = ctx.opts;
    let dash = &opts.grid_dash;
    let (y0, y1) = (ctx.layout.plot_bottom(), ctx.layout.plot_top());
    let (grid, mgrid) = (ctx.color(ColorRole::Grid), ctx.color(ColorRole::MajorGrid));

    for &t in &tg.minor {
        let x0 = ctx.x.to_px(t);
        gfx.line(x0, y1 - 2.0, x0, y1, GRID_WIDTH, grid);
        gfx.line(x0, y0, x0, y0 + 2.0, GRID_WIDTH, grid);
        gfx.dashed_line(x0, y0 + 1.0, x0, y1 - 1.0, GRID_WIDTH, grid, dash);
    }
    for &t in &tg.major {
        let x0 = ctx.x.to_px(t);
        gfx.line(x0, y1 - 2.0, x0, y1, MGRID_WIDTH, mgrid);
        gfx.line(x0, y0, x0, y0 + 3.0, MGRID_WIDTH, mgrid);
        gfx.dashed_line(x0, y0 + 3.0, x0, y1 - 2.0, MGRID_WIDTH, mgrid, dash);
    }
    let axis_font = &opts.fonts[FontRole::Axis];
    let color = ctx.color(ColorRole::Font);
    for (t, label) in &tg.labels {
        gfx.text(ctx.x.to_px(*t), y0 + 3.0, color, axis_font, opts.tab_width, 0.0, HAlign::Center, VAlign::Top, label);
    }
}

fn horizontal_grid(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, lines: &[GridLine]) {
    let opts = ctx.opts;
    let dash = &opts.grid_dash;
    let (x0, x1) = (ctx.layout.plot_left(), ctx.layout.plot_right());
    let axis_font = &opts.fonts[FontRole::Axis];
    let font_color = ctx.color(ColorRole::Font);

    for line in lines {
        let y0 = line.y;
        if line.major {
            let mgrid = ctx.color(ColorRole::MajorGrid);
            if let Some(right) = &line.right_label {
                gfx.text(x1 + 7.0, y0, font_color, axis_font, opts.tab_width, 0.0, HAlign::Left, VAlign::Center, right);
            }
            if let Some(label) = &line.label {
                gfx.text(x0 - axis_font.size, y0, font_color, axis_font, opts.tab_width, 0.0, HAlign::Right, VAlign::Center, label);
            }
            gfx.line(x0 - 2.0, y0, x0, y0, MGRID_WIDTH, mgrid);
            gfx.line(x1, y0, x1 + 2.0, y0, MGRID_WIDTH, mgrid);
            gfx.dashed_line(x0 - 2.0, y0, x1 + 2.0, y0, MGRID_WIDTH, mgrid, dash);
        } else {
            let grid = ctx.color(ColorRole::Grid);
            gfx.line(x0 - 2.0, y0, x0, y0, GRID_WIDTH, grid);
            gfx.line(x1, y0, x1 + 2.0, y0, GRID_WIDTH, grid);
            gfx.dashed_line(x0 - 1.0, y0, x1 + 1.0, y0, GRID_WIDTH, grid, dash);
        }
    }
}

fn legend_paint(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, elements: &[Element], legend: &LegendLayout) {
    let opts = ctx.opts;
    if legend.slots.is_empty() {
        return;
    }
    let kind = |slot: usize| elements[legend.slots[slot].element].kind;
    let direction = opts.legend_direction;

    // baseline range of the block, narrowed to graph entries for BottomUp2
    let first_graph = (0..legend.slots.len()).find(|&s| kind(s) != ElementKind::Comment);
    let last_graph = (0..legend.slots.len()).rev().find(|&s| kind(s) != ElementKind::Comment);
    let mut min = legend.slots[0].y;
    let mut max = legend.slots[legend.slots.len() - 1].y;
    if direction == LegendDirection::BottomUp2 {
        if let Some(f) = first_graph {
            min = legend.slots[f].y;
        }
        if let Some(l) = last_graph {
            max = legend.slots[l].y;
        }
    }

    let font = &opts.fonts[FontRole::Legend];
    let font_color = ctx.color(ColorRole::Font);
    let origin = ctx.layout.legend;
    for (s, slot) in legend.slots.iter().enumerate() {
        let el = &elements[slot.element];
        let reverse = match direction {
            LegendDirection::TopDown => false,
            LegendDirection::BottomUp => true,
            LegendDirection::BottomUp2 => match (first_graph, last_graph) {
                (Some(f), Some(l)) => s >= f && s <= l,
                _ => false,
            },
        };
        let x0 = origin.0 + slot.x;
        let mut y0 = if reverse { origin.1 + max + min - slot.y } else { origin.1 + slot.y };
        gfx.text(x0, y0, font_color, font, opts.tab_width, 0.0, HAlign::Left, VAlign::Bottom, &slot.text);

        if !has_box(el.kind) {
            continue;
        }
        let box_w = gfx.text_width(0.0, font, opts.tab_width, "o") * 1.2;
        let box_h = box_w;
        y0 -= box_h * 0.4;

        match el.kind {
            ElementKind::HRule if opts.dynamic_labels => {
                gfx.line(x0, y0 - box_h / 2.0, x0 + box_w, y0 - box_h / 2.0, 1.0, el.color);
            }
            ElementKind::VRule if opts.dynamic_labels => {
                gfx.line(x0 + box_w / 2.0, y0, x0 + box_w / 2.0, y0 - box_h, 1.0, el.color);
            }
            ElementKind::Line if opts.dynamic_labels => {
                gfx.line(x0, y0, x0 + box_w, y0 - box_h, el.line_width, el.color);
            }
            _ => {
                for color in [ctx.color(ColorRole::Back), el.color] {
                    gfx.new_area((x0, y0 - box_h), (x0, y0), (x0 + box_w, y0), color);
                    gfx.add_point(x0 + box_w, y0 - box_h);
                    gfx.close_path();
                }
                let frame = ctx.color(ColorRole::Frame);
                match el.dash {
                    Some(_) => gfx.new_dashed_path(1.0, frame, &Dash::new([3.0], 0.0)),
                    None => gfx.new_path(1.0, frame),
                }
                let (x1, y1) = (x0 + box_w, y0 - box_h);
                gfx.move_to(x0, y0);
                gfx.line_to(x1, y0);
                gfx.line_to(x1, y1);
                gfx.line_to(x0, y1);
                gfx.close_path();
            }
        }
    }
}

/// Axis lines with direction arrows; a second axis gets its own line and arrow.
pub fn axis_paint(gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>, second_axis: bool) {
    let lay = ctx.layout;
    let axis = ctx.color(ColorRole::Axis);
    let arrow = ctx.color(ColorRole::Arrow);
    let (l, r, t, b) = (lay.plot_left(), lay.plot_right(), lay.plot_top(), lay.plot_bottom());

    gfx.line(l - 4.0, b, r + 4.0, b, MGRID_WIDTH, axis);
    gfx.line(l, b + 4.0, l, t - 4.0, MGRID_WIDTH, axis);

    gfx.new_area((r + 2.0, b - 3.0), (r + 2.0, b + 3.0), (r + 7.0, b), arrow);
    gfx.close_path();
    gfx.new_area((l - 3.0, t - 2.0), (l + 3.0, t - 2.0), (l, t - 7.0), arrow);
    gfx.close_path();

    if second_axis {
        gfx.line(r, b + 4.0, r, t - 4.0, MGRID_WIDTH, axis);
        gfx.new_area((r - 2.0, t - 2.0), (r + 3.0, t - 2.0), (r, t - 7.0), arrow);
        gfx.close_path();
    }
}

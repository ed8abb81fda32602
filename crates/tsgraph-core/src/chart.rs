// File: crates/tsgraph-core/src/chart.rs
// Summary: Chart descriptor, render options and the top-level render pipeline.

use chrono::Weekday;
use tracing::debug;

use crate::axis::{Axis, SecondAxis};
use crate::backend::{GraphicsBackend, Measurer};
use crate::error::Result;
use crate::geometry::{graph_size_location, Layout, SizeRequest};
use crate::grid::{linear_grid, log_grid, GridLine};
use crate::legend::{LegendContext, LegendLayout};
use crate::paint::{self, GridInputs, PaintContext};
use crate::print::print_calc;
use crate::resample;
use crate::scale::{TimeScale, ValueScale};
use crate::series::{Element, ElementId, ElementKind};
use crate::text::{FontRole, Fonts};
use crate::theme::Theme;
use crate::timegrid::{select_bucket, Calendar, TimeGrid, TimeGridSpec};
use crate::types::{ChartFlags, Dash, LegendDirection, LegendPosition, TimeSpan, HEIGHT, WIDTH};

/// Presentation settings for one render.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Plot area size, or the whole image with `ChartFlags::FULL_SIZE_MODE`.
    pub width: u32,
    pub height: u32,
    pub flags: ChartFlags,
    pub theme: Theme,
    pub fonts: Fonts,
    pub legend_position: LegendPosition,
    pub legend_direction: LegendDirection,
    pub title: String,
    pub watermark: String,
    pub draw_x_grid: bool,
    pub draw_y_grid: bool,
    /// Width of the 3D bevel; 0 disables it.
    pub border: f64,
    /// Legend marks shaped like the element (line, rule) instead of boxes.
    pub dynamic_labels: bool,
    pub grid_dash: Dash,
    pub tab_width: f64,
    pub zoom: f64,
    /// Interpolate between columns instead of drawing steps.
    pub slope_mode: bool,
    pub gridfit: bool,
    /// Reserve the y label gutter even without a y grid.
    pub force_left_space: bool,
    pub first_weekday: Weekday,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            flags: ChartFlags::empty(),
            theme: Theme::classic(),
            fonts: Fonts::default(),
            legend_position: LegendPosition::South,
            legend_direction: LegendDirection::TopDown,
            title: String::new(),
            watermark: String::new(),
            draw_x_grid: true,
            draw_y_grid: true,
            border: 2.0,
            dynamic_labels: false,
            grid_dash: Dash::new([1.0, 1.0], 0.0),
            tab_width: 40.0,
            zoom: 1.0,
            slope_mode: false,
            gridfit: true,
            force_left_space: false,
            first_weekday: Weekday::Mon,
        }
    }
}

/// What a render produced besides the drawing calls.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    /// PRINT results in declaration order.
    pub prints: Vec<String>,
    pub layout: Layout,
    pub legend: LegendLayout,
    /// Final value range and grid step.
    pub min: f64,
    pub max: f64,
    pub grid_step: f64,
    /// False when no value grid could be drawn.
    pub has_grid: bool,
}

/// Chart descriptor: a time span, an element arena and the axes.
#[derive(Clone, Debug)]
pub struct Chart {
    pub elements: Vec<Element>,
    pub start: i64,
    pub end: i64,
    pub y_axis: Axis,
    pub right_axis: Option<SecondAxis>,
    /// Time grid steps; picked from the span when unset.
    pub time_grid: Option<TimeGridSpec>,
}

impl Chart {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            elements: Vec::new(),
            start,
            end,
            y_axis: Axis::default(),
            right_axis: None,
            time_grid: None,
        }
    }

    /// Append an element and return its handle.
    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }

    /// Run the whole pipeline and issue every drawing call to `gfx`.
    ///
    /// Order: prints, geometry, per-pixel data and range, grid step (and
    /// gridfit), canvas, data curves, grids with decorations and legend,
    /// axes, and rules last so they sit above the data.
    pub fn render(&mut self, opts: &RenderOptions, gfx: &mut dyn GraphicsBackend) -> Result<RenderReport> {
        let flags = opts.flags;
        let utc = flags.contains(ChartFlags::FORCE_UTC_TIME);
        let span = self.span();
        let prints = print_calc(&mut self.elements, self.y_axis.base, utc)?;

        let (layout, legend) = {
            let measure = Measurer(&*gfx);
            let legend_ctx = LegendContext {
                measure: &measure,
                font: &opts.fonts[FontRole::Legend],
                tab_width: opts.tab_width,
                flags,
                value_range: (self.y_axis.min, self.y_axis.max),
                span,
            };
            let req = SizeRequest {
                width: f64::from(opts.width),
                height: f64::from(opts.height),
                flags,
                position: opts.legend_position,
                fonts: &opts.fonts,
                title: &opts.title,
                watermark: &opts.watermark,
                unit_left: &self.y_axis.label,
                unit_right: self.right_axis.as_ref().map_or("", |a| a.label.as_str()),
                second_axis: self.right_axis.is_some(),
                draw_x_grid: opts.draw_x_grid,
                draw_y_grid: opts.draw_y_grid,
                force_left_space: opts.force_left_space,
                units_length: self.y_axis.units_length as u32,
            };
            graph_size_location(&req, &self.elements, &legend_ctx)?
        };
        debug!(ximg = layout.ximg, yimg = layout.yimg, xsize = layout.xsize, ysize = layout.ysize, "geometry solved");

        let x_scale = TimeScale::new(layout.xorigin, layout.xsize, span.start, span.end);
        let xsize = layout.xsize.max(1.0) as usize;
        let axis = &mut self.y_axis;
        resample::process(&mut self.elements, axis, span, xsize)?;
        if !axis.is_log() {
            axis.apply_si_unit();
            if !axis.rigid || axis.allow_shrink {
                axis.expand_range(flags);
            }
        }
        let axis_font = opts.fonts[FontRole::Axis].size;
        let has_grid = axis.calc_horizontal_grid(layout.ysize, axis_font, flags);
        let mut y_scale = ValueScale::new(layout.yorigin, layout.ysize, axis.min, axis.max, axis.is_log());
        if opts.gridfit && has_grid {
            axis.apply_gridfit(&mut y_scale, axis_font, flags);
        }
        debug!(min = axis.min, max = axis.max, step = axis.grid.step, labfact = axis.grid.label_factor, "range solved");

        let ctx = PaintContext { opts, layout: &layout, x: &x_scale, y: &y_scale };
        paint::paint_setup(gfx, &ctx)?;
        self.paint_data(gfx, &ctx);

        if !flags.contains(ChartFlags::ONLY_GRAPH) {
            let time_grid = if opts.draw_x_grid {
                let spec = match &self.time_grid {
                    Some(s) => s.clone(),
                    None => TimeGridSpec::from(select_bucket(span.len() as f64 / layout.xsize, span.len())),
                };
                debug!(major = ?spec.major, label = ?spec.label, "time grid chosen");
                let cal = Calendar { utc, first_weekday: opts.first_weekday };
                Some(TimeGrid::compute(span, &spec, &cal, !flags.contains(ChartFlags::NO_MINOR))?)
            } else {
                None
            };
            let value_grid = self.value_grid(opts, &y_scale, has_grid);
            let inputs = GridInputs {
                time_grid: time_grid.as_ref(),
                value_grid: value_grid.as_deref(),
                unit_left: &self.y_axis.label,
                unit_right: self.right_axis.as_ref().map_or("", |a| a.label.as_str()),
                legend: &legend,
            };
            paint::grid_paint(gfx, &ctx, &self.elements, &inputs);
            paint::axis_paint(gfx, &ctx, self.right_axis.is_some());
        }

        for el in &self.elements {
            match el.kind {
                ElementKind::HRule => paint::paint_hrule(gfx, &ctx, el),
                ElementKind::VRule => paint::paint_vrule(gfx, &ctx, el),
                _ => {}
            }
        }
        gfx.finish()?;

        Ok(RenderReport {
            prints,
            layout,
            legend,
            min: self.y_axis.min,
            max: self.y_axis.max,
            grid_step: self.y_axis.grid.step,
            has_grid,
        })
    }

    /// Paint ticks, lines and areas in declaration order. Stacked elements
    /// sit on the last line or area painted before them.
    fn paint_data(&mut self, gfx: &mut dyn GraphicsBackend, ctx: &PaintContext<'_>) {
        let mut below: Option<usize> = None;
        for i in 0..self.elements.len() {
            let (done, rest) = self.elements.split_at_mut(i);
            let el = &mut rest[0];
            let prev = below.map(|b| &done[b]);
            match el.kind {
                ElementKind::Tick => paint::paint_tick(gfx, ctx, el),
                ElementKind::Line => {
                    paint::paint_line(gfx, ctx, el, prev);
                    below = Some(i);
                }
                ElementKind::Area => {
                    paint::paint_area(gfx, ctx, el, prev);
                    below = Some(i);
                }
                _ => {}
            }
        }
    }

    fn value_grid(&self, opts: &RenderOptions, y_scale: &ValueScale, has_grid: bool) -> Option<Vec<GridLine>> {
        if !has_grid {
            return None;
        }
        let second = self.right_axis.as_ref();
        if self.y_axis.is_log() {
            log_grid(&self.y_axis, second, y_scale, opts.fonts[FontRole::Legend].size, opts.flags)
        } else {
            Some(linear_grid(&self.y_axis, second, y_scale, opts.flags))
        }
    }
}

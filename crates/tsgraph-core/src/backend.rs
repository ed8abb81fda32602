// File: crates/tsgraph-core/src/backend.rs
// Summary: Abstract drawing backend consumed by the render pipeline.

use crate::error::Result;
use crate::text::TextProp;
use crate::types::{Dash, HAlign, Rgba, VAlign};

/// Text measurement, split out so layout code can run without a drawing context.
pub trait TextMeasure {
    /// Width in pixels of `text` drawn starting at `start_x`; tabs advance to
    /// the next multiple of `tab_width`.
    fn text_width(&self, start_x: f64, font: &TextProp, tab_width: f64, text: &str) -> f64;
}

/// Drawing calls issued by the pipeline, in painter's order.
///
/// A render brackets everything between `setup` and `finish`. Paths are opened
/// with `new_path`/`new_dashed_path` (stroked polyline) or `new_area` (filled
/// polygon seeded with three points), extended with `move_to`/`line_to`/
/// `add_point`, and ended with `close_path`. Closing a polyline strokes it
/// without joining the last point to the first.
pub trait GraphicsBackend: TextMeasure {
    /// Open a drawing context of `width` x `height` pixels; drawing coordinates
    /// are in unzoomed units and get multiplied by `zoom`.
    fn setup(&mut self, width: u32, height: u32, zoom: f64) -> Result<()>;
    fn finish(&mut self) -> Result<()>;

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Rgba);
    fn dashed_line(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        width: f64,
        color: Rgba,
        dash: &Dash,
    );
    /// Unfilled frame.
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: Rgba);
    /// Filled quad between the base row `y0` and the curve (`py` at `x0`,
    /// `y1` at `x1`). It fades from `color` at the curve to `color2` `height`
    /// pixels lower; zero fades all the way to the base and a negative height
    /// anchors the fade to the base instead.
    fn add_rect_fadey(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        py: f64,
        color: Rgba,
        color2: Rgba,
        height: f64,
    );

    fn new_path(&mut self, width: f64, color: Rgba);
    fn new_dashed_path(&mut self, width: f64, color: Rgba, dash: &Dash);
    fn new_area(&mut self, p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), color: Rgba);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn add_point(&mut self, x: f64, y: f64);
    fn close_path(&mut self);

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        x: f64,
        y: f64,
        color: Rgba,
        font: &TextProp,
        tab_width: f64,
        angle: f64,
        h_align: HAlign,
        v_align: VAlign,
        text: &str,
    );
}

/// Borrow a backend where only measurement is needed.
pub struct Measurer<'a>(pub &'a dyn GraphicsBackend);

impl TextMeasure for Measurer<'_> {
    fn text_width(&self, start_x: f64, font: &TextProp, tab_width: f64, text: &str) -> f64 {
        self.0.text_width(start_x, font, tab_width, text)
    }
}

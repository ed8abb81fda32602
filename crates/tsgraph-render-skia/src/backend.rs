// File: crates/tsgraph-render-skia/src/backend.rs
// Summary: Drawing backend on a Skia CPU raster surface; the PNG is encoded on finish.

use skia_safe as skia;
use tracing::debug;
use tsgraph_core::backend::{GraphicsBackend, TextMeasure};
use tsgraph_core::error::{GraphError, Result};
use tsgraph_core::text::TextProp;
use tsgraph_core::types::{Dash, HAlign, Rgba, VAlign};

use crate::shaper::TextShaper;

struct PendingPath {
    path: skia::Path,
    paint: skia::Paint,
    fill: bool,
}

pub struct SkiaBackend {
    surface: Option<skia::Surface>,
    shaper: TextShaper,
    pending: Option<PendingPath>,
    png: Option<Vec<u8>>,
}

impl Default for SkiaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SkiaBackend {
    pub fn new() -> Self {
        Self { surface: None, shaper: TextShaper::new(), pending: None, png: None }
    }

    /// PNG bytes of the last finished render.
    pub fn png(&self) -> Option<&[u8]> {
        self.png.as_deref()
    }

    pub fn take_png(&mut self) -> Option<Vec<u8>> {
        self.png.take()
    }

    fn canvas(&mut self) -> Option<&skia::Canvas> {
        self.surface.as_mut().map(|s| s.canvas())
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), paint: &skia::Paint) {
        if let Some(canvas) = self.canvas() {
            canvas.draw_line(fit(from), fit(to), paint);
        }
    }

    fn open_path(&mut self, paint: skia::Paint, fill: bool) {
        if self.pending.is_some() {
            debug!("path opened before the previous one was closed; dropping it");
        }
        self.pending = Some(PendingPath { path: skia::Path::new(), paint, fill });
    }
}

// ---- helpers ----------------------------------------------------------------

fn sk_color(c: Rgba) -> skia::Color {
    let (a, r, g, b) = c.to_argb8();
    skia::Color::from_argb(a, r, g, b)
}

/// Snap to the pixel center so thin strokes stay crisp.
fn fit(p: (f64, f64)) -> skia::Point {
    skia::Point::new((p.0.round() + 0.5) as f32, (p.1.round() + 0.5) as f32)
}

fn stroke_paint(width: f64, c: Rgba, dash: Option<&Dash>) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width as f32);
    paint.set_stroke_join(skia::paint::Join::Round);
    paint.set_color(sk_color(c));
    match dash.filter(|d| !d.intervals.is_empty()) {
        Some(d) => {
            let mut intervals: Vec<f32> = d.intervals.iter().map(|&v| v as f32).collect();
            // skia wants on/off pairs
            if intervals.len() % 2 == 1 {
                intervals.extend_from_within(..);
            }
            paint.set_stroke_cap(skia::paint::Cap::Butt);
            paint.set_path_effect(skia::PathEffect::dash(&intervals, d.offset as f32));
        }
        None => {
            paint.set_stroke_cap(skia::paint::Cap::Round);
        }
    }
    paint
}

fn fill_paint(c: Rgba) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(sk_color(c));
    paint
}

impl TextMeasure for SkiaBackend {
    fn text_width(&self, start_x: f64, font: &TextProp, tab_width: f64, text: &str) -> f64 {
        self.shaper.tab_runs(start_x, font, tab_width, text).1
    }
}

impl GraphicsBackend for SkiaBackend {
    fn setup(&mut self, width: u32, height: u32, zoom: f64) -> Result<()> {
        let dim = |v: u32| i32::try_from(v.max(1)).map_err(|_| GraphError::Backend(format!("image dimension {v} too large")));
        let mut surface = skia::surfaces::raster_n32_premul((dim(width)?, dim(height)?))
            .ok_or_else(|| GraphError::Backend(format!("failed to create {width}x{height} raster surface")))?;
        let canvas = surface.canvas();
        canvas.clear(skia::Color::TRANSPARENT);
        canvas.scale((zoom as f32, zoom as f32));
        self.surface = Some(surface);
        self.pending = None;
        self.png = None;
        debug!(width, height, zoom, "raster surface ready");
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.pending = None;
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| GraphError::Backend("finish called before setup".into()))?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| GraphError::Backend("encode PNG failed".into()))?;
        self.png = Some(data.as_bytes().to_vec());
        debug!(bytes = data.size(), "png encoded");
        Ok(())
    }

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Rgba) {
        let paint = stroke_paint(width, color, None);
        self.stroke_line((x0, y0), (x1, y1), &paint);
    }

    fn dashed_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Rgba, dash: &Dash) {
        let paint = stroke_paint(width, color, Some(dash));
        self.stroke_line((x0, y0), (x1, y1), &paint);
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        let paint = stroke_paint(line_width, color, None);
        if let Some(canvas) = self.canvas() {
            let p = fit((x, y));
            canvas.draw_rect(skia::Rect::from_xywh(p.x, p.y, width as f32, height as f32), &paint);
        }
    }

    fn add_rect_fadey(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        py: f64,
        color1: Rgba,
        color2: Rgba,
        height: f64,
    ) {
        let (base_l, top_l, top_r, base_r) = (fit((x0, y0)), fit((x0, py)), fit((x1, y1)), fit((x1, y0)));
        let mut path = skia::Path::new();
        path.move_to(base_l);
        path.line_to(top_l);
        path.line_to(top_r);
        path.line_to(base_r);
        path.close();

        let curve = ((y1 + py) / 2.0).round() + 0.5;
        let base = y0.round() + 0.5;
        let (from, to) = if height > 0.0 {
            (curve, curve + height)
        } else if height < 0.0 {
            (base + height, base)
        } else {
            (curve, base)
        };
        let mut paint = fill_paint(color1);
        let colors = [sk_color(color1), sk_color(color2)];
        let gx = base_l.x;
        if from != to {
            paint.set_shader(skia::Shader::linear_gradient(
                ((gx, from as f32), (gx, to as f32)),
                colors.as_ref(),
                None,
                skia::TileMode::Clamp,
                None,
                None,
            ));
        }
        if let Some(canvas) = self.canvas() {
            canvas.draw_path(&path, &paint);
        }
    }

    fn new_path(&mut self, width: f64, color: Rgba) {
        self.open_path(stroke_paint(width, color, None), false);
    }

    fn new_dashed_path(&mut self, width: f64, color: Rgba, dash: &Dash) {
        self.open_path(stroke_paint(width, color, Some(dash)), false);
    }

    fn new_area(&mut self, p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), color: Rgba) {
        self.open_path(fill_paint(color), true);
        if let Some(pending) = self.pending.as_mut() {
            pending.path.move_to(fit(p0));
            pending.path.line_to(fit(p1));
            pending.path.line_to(fit(p2));
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        if let Some(pending) = self.pending.as_mut() {
            pending.path.move_to(fit((x, y)));
        }
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(pending) = self.pending.as_mut() {
            pending.path.line_to(fit((x, y)));
        }
    }

    fn add_point(&mut self, x: f64, y: f64) {
        self.line_to(x, y);
    }

    fn close_path(&mut self) {
        let Some(mut pending) = self.pending.take() else { return };
        if pending.fill {
            pending.path.close();
        }
        if let Some(canvas) = self.canvas() {
            canvas.draw_path(&pending.path, &pending.paint);
        }
    }

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
    ) {
        if text.is_empty() {
            return;
        }
        let (runs, width) = self.shaper.tab_runs(0.0, font, tab_width, text);
        let paint_color = sk_color(color);
        let paragraphs: Vec<(f64, skia::textlayout::Paragraph)> = runs
            .into_iter()
            .filter(|(_, run)| !run.is_empty())
            .map(|(dx, run)| (dx, self.shaper.layout(run, font, paint_color)))
            .collect();
        let Some(height) = paragraphs.first().map(|(_, p)| f64::from(p.height())) else { return };

        let x = x.round() + 0.5;
        let left = match h_align {
            HAlign::Left => x,
            HAlign::Right => x - width,
            HAlign::Center => x - width / 2.0,
        };
        let top = match v_align {
            VAlign::Top => y,
            VAlign::Bottom => y - height,
            VAlign::Center => y - height / 2.0,
        };

        let Some(surface) = self.surface.as_mut() else { return };
        let canvas = surface.canvas();
        canvas.save();
        if angle != 0.0 {
            canvas.rotate(-angle as f32, Some(skia::Point::new(x as f32, y as f32)));
        }
        for (dx, p) in &paragraphs {
            p.paint(canvas, ((left + dx) as f32, top as f32));
        }
        canvas.restore();
    }
}

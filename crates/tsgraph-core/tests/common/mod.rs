// File: crates/tsgraph-core/tests/common/mod.rs
// Purpose: Recording backend with deterministic text metrics for pipeline tests.
#![allow(dead_code)]

use tsgraph_core::backend::{GraphicsBackend, TextMeasure};
use tsgraph_core::error::Result;
use tsgraph_core::text::TextProp;
use tsgraph_core::types::{Dash, HAlign, Rgba, VAlign};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Setup { width: u32, height: u32 },
    Finish,
    Line { from: (f64, f64), to: (f64, f64), color: Rgba, dashed: bool },
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Fade { x0: f64, x1: f64, color: Rgba, color2: Rgba, height: f64 },
    Path { color: Rgba },
    Area { color: Rgba },
    MoveTo(f64, f64),
    LineTo(f64, f64),
    AddPoint(f64, f64),
    Close,
    Text { x: f64, y: f64, text: String },
}

/// Every character is half the font size wide; tabs are ignored.
pub fn glyph_width(font: &TextProp, text: &str) -> f64 {
    text.chars().count() as f64 * font.size * 0.5
}

#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Baseline of the first text call drawing exactly `text`.
    pub fn text_y(&self, text: &str) -> Option<f64> {
        self.calls.iter().find_map(|c| match c {
            Call::Text { y, text: t, .. } if t == text => Some(*y),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn lines_with(&self, color: Rgba) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Line { color: lc, .. } if *lc == color)).count()
    }
}

pub struct Metrics;

impl TextMeasure for Metrics {
    fn text_width(&self, _start_x: f64, font: &TextProp, _tab_width: f64, text: &str) -> f64 {
        glyph_width(font, text)
    }
}

impl TextMeasure for Recorder {
    fn text_width(&self, _start_x: f64, font: &TextProp, _tab_width: f64, text: &str) -> f64 {
        glyph_width(font, text)
    }
}

impl GraphicsBackend for Recorder {
    fn setup(&mut self, width: u32, height: u32, _zoom: f64) -> Result<()> {
        self.calls.push(Call::Setup { width, height });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.calls.push(Call::Finish);
        Ok(())
    }

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, _width: f64, color: Rgba) {
        self.calls.push(Call::Line { from: (x0, y0), to: (x1, y1), color, dashed: false });
    }

    fn dashed_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, _width: f64, color: Rgba, _dash: &Dash) {
        self.calls.push(Call::Line { from: (x0, y0), to: (x1, y1), color, dashed: true });
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, _line_width: f64, _color: Rgba) {
        self.calls.push(Call::Rect { x, y, w: width, h: height });
    }

    fn add_rect_fadey(
        &mut self,
        x0: f64,
        _y0: f64,
        x1: f64,
        _y1: f64,
        _py: f64,
        color: Rgba,
        color2: Rgba,
        height: f64,
    ) {
        self.calls.push(Call::Fade { x0, x1, color, color2, height });
    }

    fn new_path(&mut self, _width: f64, color: Rgba) {
        self.calls.push(Call::Path { color });
    }

    fn new_dashed_path(&mut self, _width: f64, color: Rgba, _dash: &Dash) {
        self.calls.push(Call::Path { color });
    }

    fn new_area(&mut self, _p0: (f64, f64), _p1: (f64, f64), _p2: (f64, f64), color: Rgba) {
        self.calls.push(Call::Area { color });
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(Call::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.calls.push(Call::LineTo(x, y));
    }

    fn add_point(&mut self, x: f64, y: f64) {
        self.calls.push(Call::AddPoint(x, y));
    }

    fn close_path(&mut self) {
        self.calls.push(Call::Close);
    }

    fn text(
        &mut self,
        x: f64,
        y: f64,
        _color: Rgba,
        _font: &TextProp,
        _tab_width: f64,
        _angle: f64,
        _h_align: HAlign,
        _v_align: VAlign,
        text: &str,
    ) {
        self.calls.push(Call::Text { x, y, text: text.to_string() });
    }
}

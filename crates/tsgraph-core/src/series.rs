// File: crates/tsgraph-core/src/series.rs
// Summary: Chart element model: kinds, source data, and the per-pixel arrays filled by rendering.

use crate::format::ValueFormatter;
use crate::types::{Dash, Rgba, TextAlign};

/// Stable handle of an element inside `Chart::elements`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Print,
    GPrint,
    Comment,
    HRule,
    VRule,
    Line,
    Area,
    Tick,
    TextAlign,
    Def,
    CDef,
    VDef,
    Shift,
    XPort,
}

impl ElementKind {
    /// Kinds painted from per-pixel data.
    pub fn is_plotted(self) -> bool {
        matches!(self, ElementKind::Line | ElementKind::Area | ElementKind::Tick)
    }

    /// Kinds whose legend gets a color box.
    pub fn is_graph(self) -> bool {
        !matches!(self, ElementKind::Print | ElementKind::GPrint | ElementKind::Comment)
    }
}

/// Consolidation used when a print element summarizes a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Consolidation {
    #[default]
    Average,
    Minimum,
    Maximum,
    Last,
}

/// Fetched samples: `ds_cnt` interleaved columns per `step` seconds over `[start, end)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceData {
    pub start: i64,
    pub end: i64,
    pub step: i64,
    pub ds_cnt: usize,
    pub ds: usize,
    pub data: Vec<f64>,
}

impl SourceData {
    /// Single-column series.
    pub fn new(start: i64, step: i64, data: Vec<f64>) -> Self {
        let end = start + step * data.len() as i64;
        Self { start, end, step, ds_cnt: 1, ds: 0, data }
    }

    /// Sample covering time `t`, or NaN outside the interval.
    pub fn sample_at(&self, t: i64) -> f64 {
        if t < self.start || t >= self.end || self.step <= 0 {
            return f64::NAN;
        }
        let row = ((t - self.start) / self.step) as usize;
        self.data.get(row * self.ds_cnt + self.ds).copied().unwrap_or(f64::NAN)
    }

    /// Values of the selected column over the whole interval.
    pub fn column(&self) -> impl Iterator<Item = f64> + '_ {
        let rows = if self.step > 0 { ((self.end - self.start) / self.step) as usize } else { 0 };
        self.data.iter().skip(self.ds).step_by(self.ds_cnt.max(1)).take(rows).copied()
    }
}

/// Result of a value definition: a number and the time it was observed.
/// `when == None` means the value never happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VdefValue {
    pub value: f64,
    pub when: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct Element {
    pub kind: ElementKind,
    /// Element this one takes its values from.
    pub source: Option<ElementId>,
    pub color: Rgba,
    /// Second color turns an area into a vertical gradient.
    pub color2: Option<Rgba>,
    pub gradient_height: f64,
    pub legend: String,
    pub format: String,
    pub formatter: ValueFormatter,
    /// Print a time (strftime) instead of a value.
    pub strftime: bool,
    pub cf: Consolidation,
    pub stack: bool,
    /// Leave this element out of range tracking.
    pub skip_scale: bool,
    pub line_width: f64,
    pub dash: Option<Dash>,
    /// Alignment set by a `TextAlign` element.
    pub align: TextAlign,
    /// Constant value: rule position, fixed line value, or tick height fraction.
    pub yrule: f64,
    /// Vertical rule time.
    pub xrule: i64,
    pub data: Option<SourceData>,
    pub vdef: Option<VdefValue>,

    /// Per-column values, `xsize + 1` long once rendered.
    pub processed: Vec<f64>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            source: None,
            color: Rgba::new(0.0, 0.0, 0.0, 1.0),
            color2: None,
            gradient_height: 50.0,
            legend: String::new(),
            format: String::new(),
            formatter: ValueFormatter::Numeric,
            strftime: false,
            cf: Consolidation::Average,
            stack: false,
            skip_scale: false,
            line_width: 1.0,
            dash: None,
            align: TextAlign::Left,
            yrule: f64::NAN,
            xrule: 0,
            data: None,
            vdef: None,
            processed: Vec::new(),
        }
    }

    pub fn def(data: SourceData) -> Self {
        Self { data: Some(data), ..Self::new(ElementKind::Def) }
    }

    pub fn vdef(value: f64, when: Option<i64>) -> Self {
        Self { vdef: Some(VdefValue { value, when }), ..Self::new(ElementKind::VDef) }
    }

    pub fn line(source: ElementId, color: Rgba, width: f64, legend: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            color,
            line_width: width,
            legend: legend.into(),
            ..Self::new(ElementKind::Line)
        }
    }

    pub fn area(source: ElementId, color: Rgba, legend: impl Into<String>) -> Self {
        Self { source: Some(source), color, legend: legend.into(), ..Self::new(ElementKind::Area) }
    }

    /// Tick marks `fraction` of the plot height tall; negative hangs from the top.
    pub fn tick(source: ElementId, color: Rgba, fraction: f64, legend: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            color,
            yrule: fraction,
            legend: legend.into(),
            ..Self::new(ElementKind::Tick)
        }
    }

    pub fn hrule(value: f64, color: Rgba, legend: impl Into<String>) -> Self {
        Self { yrule: value, color, legend: legend.into(), ..Self::new(ElementKind::HRule) }
    }

    pub fn vrule(at: i64, color: Rgba, legend: impl Into<String>) -> Self {
        Self { xrule: at, color, legend: legend.into(), ..Self::new(ElementKind::VRule) }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self { legend: text.into(), ..Self::new(ElementKind::Comment) }
    }

    pub fn gprint(source: ElementId, cf: Consolidation, format: impl Into<String>) -> Self {
        Self { source: Some(source), cf, format: format.into(), ..Self::new(ElementKind::GPrint) }
    }

    pub fn print(source: ElementId, cf: Consolidation, format: impl Into<String>) -> Self {
        Self { source: Some(source), cf, format: format.into(), ..Self::new(ElementKind::Print) }
    }

    pub fn text_align(align: TextAlign) -> Self {
        Self { align, ..Self::new(ElementKind::TextAlign) }
    }

    pub fn stacked(mut self) -> Self {
        self.stack = true;
        self
    }

    pub fn dashed(mut self, dash: Dash) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn gradient(mut self, color2: Rgba, height: f64) -> Self {
        self.color2 = Some(color2);
        self.gradient_height = height;
        self
    }
}

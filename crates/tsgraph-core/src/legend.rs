// File: crates/tsgraph-core/src/legend.rs
// Summary: Legend text parsing (control codes) and line-by-line placement.

use tracing::warn;

use crate::backend::TextMeasure;
use crate::error::{GraphError, Result};
use crate::series::{Element, ElementKind};
use crate::text::TextProp;
use crate::types::{ChartFlags, TextAlign, TimeSpan};

/// Trailing `\x` code of a legend string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCode {
    /// No code: keep filling the current line.
    None,
    Left,
    Right,
    Center,
    Justify,
    /// Line break with a reduced advance.
    Space,
    /// Line break that moves back up one line.
    Up,
    /// Glue to the next entry without spacing.
    Glue,
}

impl ControlCode {
    fn breaks_line(self) -> bool {
        !matches!(self, ControlCode::None | ControlCode::Glue)
    }
}

/// Legend text with the control code split off.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedLegend {
    pub text: String,
    pub code: ControlCode,
}

/// Split the trailing control code off `raw`, turning literal `\t` into tabs.
///
/// `\n` is an alias for `\l`, `\.` is a no-op so text can end in a backslash
/// sequence, and `\g` also trims trailing spaces.
pub fn parse_legend(element: usize, raw: &str) -> Result<ParsedLegend> {
    let mut text = raw.replace("\\t", "\t");
    let mut code = ControlCode::None;

    let mut tail = text.chars().rev();
    if let (Some(c), Some('\\')) = (tail.next(), tail.next()) {
        code = match c {
            'l' | 'n' => ControlCode::Left,
            'r' => ControlCode::Right,
            'c' => ControlCode::Center,
            'j' => ControlCode::Justify,
            's' => ControlCode::Space,
            'u' => ControlCode::Up,
            'g' => ControlCode::Glue,
            '.' => ControlCode::None,
            other => return Err(GraphError::UnknownControlCode { element, code: other }),
        };
        text.truncate(text.len() - c.len_utf8() - 1);
    }
    if code == ControlCode::Glue {
        let kept = text.trim_end_matches(' ').len();
        text.truncate(kept);
    }
    Ok(ParsedLegend { text, code })
}

/// One positioned legend entry. `x`/`y` are relative to the legend block;
/// `y` is the text baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendSlot {
    pub element: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegendLayout {
    pub slots: Vec<LegendSlot>,
    /// Block width including both borders.
    pub width: f64,
    pub height: f64,
}

/// Inputs that stay fixed across placement passes.
pub struct LegendContext<'a> {
    pub measure: &'a dyn TextMeasure,
    pub font: &'a TextProp,
    pub tab_width: f64,
    pub flags: ChartFlags,
    /// Final value range, used to hide legends of rules that are off the plot.
    pub value_range: (f64, f64),
    pub span: TimeSpan,
}

impl LegendContext<'_> {
    fn width_of(&self, start_x: f64, text: &str) -> f64 {
        self.measure.text_width(start_x, self.font, self.tab_width, text)
    }

    /// Border around the block, also the gap between entries.
    pub fn border(&self) -> f64 {
        (self.font.size * 2.0).trunc()
    }

    fn hidden(&self, el: &Element) -> bool {
        if self.flags.contains(ChartFlags::FORCE_RULES_LEGEND) {
            return false;
        }
        let (lo, hi) = self.value_range;
        match el.kind {
            ElementKind::HRule => el.yrule < lo || el.yrule > hi,
            ElementKind::VRule => el.xrule < self.span.start || el.xrule > self.span.end,
            _ => false,
        }
    }
}

struct Entry {
    element: usize,
    text: String,
    code: ControlCode,
    space: f64,
}

/// Lay legend entries out in lines.
///
/// With `width == None` the pass only measures: the block grows to the widest
/// line and nothing wraps. Otherwise lines wrap inside `width` (borders
/// included), and each line is aligned by its closing control code or the
/// current `TextAlign` default.
pub fn leg_place(elements: &[Element], ctx: &LegendContext<'_>, width: Option<f64>) -> Result<LegendLayout> {
    if ctx.flags.intersects(ChartFlags::NO_LEGEND | ChartFlags::ONLY_GRAPH) {
        return Ok(LegendLayout::default());
    }
    let border = ctx.border();
    let interleg = border;
    let calc = width.is_none();
    let mut legend_width = width.map_or(0.0, |w| w - 2.0 * border);

    let mut entries = Vec::with_capacity(elements.len());
    let mut aligns = Vec::with_capacity(elements.len());
    let mut default_align = TextAlign::Justified;
    for (i, el) in elements.iter().enumerate() {
        if el.kind == ElementKind::TextAlign {
            default_align = el.align;
        }
        aligns.push(default_align);
        let mut parsed = parse_legend(i, &el.legend).map_err(|e| {
            warn!(element = i, legend = %el.legend, "unparsable legend");
            e
        })?;
        if ctx.hidden(el) {
            parsed.text.clear();
        } else if has_box(el.kind) && !parsed.text.is_empty() {
            // room for the color box
            parsed.text.insert_str(0, "  ");
        }
        let space = if parsed.text.is_empty() || parsed.code == ControlCode::Glue { 0.0 } else { interleg };
        entries.push(Entry { element: i, text: parsed.text, code: parsed.code, space });
    }

    let mut layout = LegendLayout::default();
    let mut fill = 0.0;
    let mut leg_c = 0usize;
    let mut leg_y = 0.0;
    let mut mark = 0usize;
    let mut i = 0usize;
    while i < entries.len() {
        let fill_last = fill;
        let e = &entries[i];
        if !e.text.is_empty() {
            if fill > 0.0 {
                fill += e.space;
            }
            fill += ctx.width_of(fill + border, &e.text);
            leg_c += 1;
        }

        let mut code = if e.code.breaks_line() { e.code } else { ControlCode::None };
        if code == ControlCode::None {
            if calc && fill > legend_width {
                legend_width = fill;
            }
            if i == entries.len() - 1 || fill > legend_width {
                code = match aligns[i] {
                    TextAlign::Right => ControlCode::Right,
                    TextAlign::Center => ControlCode::Center,
                    TextAlign::Justified => ControlCode::Justify,
                    TextAlign::Left => ControlCode::Left,
                };
            }
            if fill > legend_width && leg_c > 1 {
                // push the last entry to the next line
                i -= 1;
                fill = fill_last;
                leg_c -= 1;
            }
            if leg_c == 1 && code == ControlCode::Justify {
                code = ControlCode::Left;
            }
        }

        if code != ControlCode::None {
            let glue = if leg_c >= 2 && code == ControlCode::Justify {
                (legend_width - fill) / (leg_c - 1) as f64
            } else {
                0.0
            };
            let mut leg_x = match code {
                ControlCode::Center => border + (legend_width - fill) / 2.0,
                ControlCode::Right => legend_width - fill + border,
                _ => border,
            };
            for e in &entries[mark..=i] {
                if e.text.is_empty() {
                    continue;
                }
                layout.slots.push(LegendSlot { element: e.element, text: e.text.clone(), x: leg_x, y: leg_y + border });
                leg_x += ctx.width_of(leg_x, &e.text) + e.space + glue;
            }
            if leg_x > border || code == ControlCode::Space {
                leg_y += ctx.font.size * 1.8;
            }
            match code {
                ControlCode::Space => leg_y -= ctx.font.size,
                ControlCode::Up => leg_y -= ctx.font.size * 1.8,
                _ => {}
            }
            if calc && fill > legend_width {
                legend_width = fill;
            }
            fill = 0.0;
            leg_c = 0;
            mark = i + 1;
        }
        i += 1;
    }

    layout.width = legend_width + 2.0 * border;
    layout.height = leg_y + border * 0.6;
    Ok(layout)
}

/// Element kinds that get a color box next to their legend text.
pub fn has_box(kind: ElementKind) -> bool {
    kind.is_graph() && kind != ElementKind::TextAlign
}

// File: crates/tsgraph-render-skia/src/shaper.rs
// Summary: Text shaping with Skia textlayout; font family lists and tab stops come from TextProp.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};
use tsgraph_core::text::TextProp;

/// Families tried when a `TextProp` names none.
const FALLBACK_FAMILIES: [&str; 3] = ["DejaVu Sans Mono", "Courier New", "monospace"];

/// No legend or label comes close to this; paragraphs never wrap.
const UNBOUNDED_WIDTH: f32 = 10_000.0;

pub struct TextShaper {
    collection: FontCollection,
    paragraph_style: ParagraphStyle,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        Self::with_font_manager(skia::FontMgr::default())
    }

    /// Shaper resolving families through `mgr`, e.g. a manager with embedded fonts.
    pub fn with_font_manager(mgr: skia::FontMgr) -> Self {
        let mut collection = FontCollection::new();
        collection.set_default_font_manager(mgr, None);
        let mut paragraph_style = ParagraphStyle::new();
        paragraph_style.set_text_align(TextAlign::Left);
        paragraph_style.set_max_lines(1);
        Self { collection, paragraph_style }
    }

    fn text_style(font: &TextProp, color: skia::Color) -> TextStyle {
        let mut style = TextStyle::new();
        style.set_color(color);
        style.set_font_size((font.size as f32).max(1.0));
        let named: Vec<&str> = font.families().collect();
        if named.is_empty() {
            style.set_font_families(&FALLBACK_FAMILIES[..]);
        } else {
            style.set_font_families(named.as_slice());
        }
        style
    }

    /// Shaped single-line paragraph, laid out and ready to paint.
    pub fn layout(&self, text: &str, font: &TextProp, color: skia::Color) -> Paragraph {
        let mut builder = ParagraphBuilder::new(&self.paragraph_style, &self.collection);
        builder.push_style(&Self::text_style(font, color));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(UNBOUNDED_WIDTH);
        paragraph
    }

    pub fn measure_width(&self, text: &str, font: &TextProp) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        f64::from(self.layout(text, font, skia::Color::BLACK).longest_line())
    }

    /// Split `text` at tabs. Returns each run with its offset from `start_x`
    /// and the total advance; a tab moves to the next multiple of `tab_width`.
    pub fn tab_runs<'t>(
        &self,
        start_x: f64,
        font: &TextProp,
        tab_width: f64,
        text: &'t str,
    ) -> (Vec<(f64, &'t str)>, f64) {
        let mut runs = Vec::new();
        let mut x = start_x;
        for (i, run) in text.split('\t').enumerate() {
            if i > 0 && tab_width > 0.0 {
                x = ((x / tab_width).floor() + 1.0) * tab_width;
            }
            runs.push((x - start_x, run));
            x += self.measure_width(run, font);
        }
        (runs, x - start_x)
    }
}

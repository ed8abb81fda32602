// File: crates/tsgraph-core/src/text.rs
// Summary: Per-role text properties, title splitting and bounded label buffers.

use std::ops::{Index, IndexMut};

use crate::types::MAX_TITLE_LINES;

pub const DEFAULT_FONT: &str = "DejaVu Sans Mono,Bitstream Vera Sans Mono,monospace,Courier";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontRole {
    Default,
    Title,
    Axis,
    Unit,
    Legend,
    Watermark,
}

impl FontRole {
    pub const COUNT: usize = 6;
}

/// Font family list (comma separated, in preference order) and point size.
#[derive(Clone, Debug, PartialEq)]
pub struct TextProp {
    pub family: String,
    pub size: f64,
}

impl TextProp {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self { family: family.into(), size }
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.family.split(',').map(|f| f.trim().trim_matches('\'')).filter(|f| !f.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fonts {
    props: [TextProp; FontRole::COUNT],
}

impl Default for Fonts {
    fn default() -> Self {
        let p = |size| TextProp::new(DEFAULT_FONT, size);
        Self { props: [p(8.0), p(9.0), p(7.0), p(8.0), p(8.0), p(5.5)] }
    }
}

impl Fonts {
    /// Apply one family to every role, keeping sizes.
    pub fn with_family(mut self, family: &str) -> Self {
        for p in self.props.iter_mut() { p.family = family.to_string(); }
        self
    }
}

impl Index<FontRole> for Fonts {
    type Output = TextProp;
    fn index(&self, role: FontRole) -> &TextProp {
        &self.props[role as usize]
    }
}

impl IndexMut<FontRole> for Fonts {
    fn index_mut(&mut self, role: FontRole) -> &mut TextProp {
        &mut self.props[role as usize]
    }
}

/// Split a title on `\n`, a literal backslash-n, `<br>` and `<br/>`.
/// Empty pieces are dropped and at most three lines are kept.
pub fn split_title(title: &str) -> Vec<String> {
    const DELIMS: [&str; 4] = ["\n", "\\n", "<br/>", "<br>"];
    let mut lines = Vec::new();
    let mut rest = title;
    while lines.len() < MAX_TITLE_LINES {
        let hit = DELIMS
            .iter()
            .filter_map(|d| rest.find(d).map(|at| (at, d.len())))
            .min_by_key(|&(at, _)| at);
        let (piece, next) = match hit {
            Some((at, len)) => (&rest[..at], Some(&rest[at + len..])),
            None => (rest, None),
        };
        if !piece.is_empty() { lines.push(piece.to_string()); }
        match next {
            Some(n) => rest = n,
            None => break,
        }
    }
    lines
}

/// Truncate `s` so it fits a buffer of `cap` bytes including a terminator.
pub fn truncate_to(s: &mut String, cap: usize) {
    let limit = cap.saturating_sub(1);
    if s.len() <= limit { return; }
    let mut cut = limit;
    while !s.is_char_boundary(cut) { cut -= 1; }
    s.truncate(cut);
}

// File: crates/tsgraph-core/src/theme.rs
// Summary: Per-role color tables with named presets.

use std::ops::{Index, IndexMut};

use crate::types::Rgba;

/// Fixed color roles used by the draw pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorRole {
    Canvas,
    Back,
    ShadeA,
    ShadeB,
    Grid,
    MajorGrid,
    Font,
    Arrow,
    Axis,
    Frame,
}

impl ColorRole {
    pub const COUNT: usize = 10;

    pub const ALL: [ColorRole; Self::COUNT] = [
        ColorRole::Canvas,
        ColorRole::Back,
        ColorRole::ShadeA,
        ColorRole::ShadeB,
        ColorRole::Grid,
        ColorRole::MajorGrid,
        ColorRole::Font,
        ColorRole::Arrow,
        ColorRole::Axis,
        ColorRole::Frame,
    ];

    /// Lookup by the short names used on command lines ("CANVAS", "MGRID", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let role = match name.to_ascii_uppercase().as_str() {
            "CANVAS" => ColorRole::Canvas,
            "BACK" => ColorRole::Back,
            "SHADEA" => ColorRole::ShadeA,
            "SHADEB" => ColorRole::ShadeB,
            "GRID" => ColorRole::Grid,
            "MGRID" => ColorRole::MajorGrid,
            "FONT" => ColorRole::Font,
            "ARROW" => ColorRole::Arrow,
            "AXIS" => ColorRole::Axis,
            "FRAME" => ColorRole::Frame,
            _ => return None,
        };
        Some(role)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    colors: [Rgba; ColorRole::COUNT],
}

impl Theme {
    /// The classic gray-on-white palette.
    pub fn classic() -> Self {
        Self {
            name: "classic",
            colors: [
                Rgba::new(1.00, 1.00, 1.00, 1.00), // canvas
                Rgba::new(0.95, 0.95, 0.95, 1.00), // background
                Rgba::new(0.81, 0.81, 0.81, 1.00), // left/top border
                Rgba::new(0.62, 0.62, 0.62, 1.00), // right/bottom border
                Rgba::new(0.56, 0.56, 0.56, 0.75), // grid
                Rgba::new(0.87, 0.31, 0.31, 0.60), // major grid
                Rgba::new(0.00, 0.00, 0.00, 1.00), // font
                Rgba::new(0.50, 0.12, 0.12, 1.00), // arrow
                Rgba::new(0.12, 0.12, 0.12, 1.00), // axis
                Rgba::new(0.00, 0.00, 0.00, 1.00), // frame
            ],
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            colors: [
                Rgba::from_hex(0x121214ff),
                Rgba::from_hex(0x1c1c20ff),
                Rgba::from_hex(0x2e2e34ff),
                Rgba::from_hex(0x0a0a0cff),
                Rgba::from_hex(0x5a5a64bf),
                Rgba::from_hex(0xff7070a0),
                Rgba::from_hex(0xebebf5ff),
                Rgba::from_hex(0xffe646ff),
                Rgba::from_hex(0xb4b4beff),
                Rgba::from_hex(0xebebf5ff),
            ],
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            colors: [
                Rgba::from_hex(0xfdf6e3ff), // base3
                Rgba::from_hex(0xeee8d5ff), // base2
                Rgba::from_hex(0x93a1a1ff), // base1
                Rgba::from_hex(0x657b83ff), // base00
                Rgba::from_hex(0x93a1a1bf),
                Rgba::from_hex(0xcb4b1699), // orange
                Rgba::from_hex(0x002b36ff), // base03
                Rgba::from_hex(0xdc322fff), // red
                Rgba::from_hex(0x586e75ff), // base01
                Rgba::from_hex(0x002b36ff),
            ],
        }
    }

    pub fn set(&mut self, role: ColorRole, color: Rgba) {
        self.colors[role as usize] = color;
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Index<ColorRole> for Theme {
    type Output = Rgba;
    fn index(&self, role: ColorRole) -> &Rgba {
        &self.colors[role as usize]
    }
}

impl IndexMut<ColorRole> for Theme {
    fn index_mut(&mut self, role: ColorRole) -> &mut Rgba {
        &mut self.colors[role as usize]
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::classic(), Theme::dark(), Theme::solarized_light()]
}

/// Find a theme by its `name`, falling back to classic.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::classic()
}

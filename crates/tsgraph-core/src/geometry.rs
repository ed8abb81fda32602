// File: crates/tsgraph-core/src/geometry.rs
// Summary: Image geometry: splits the image between plot area, gutters, title and legend.

use crate::error::Result;
use crate::legend::{leg_place, LegendContext, LegendLayout};
use crate::series::Element;
use crate::text::{split_title, FontRole, Fonts};
use crate::types::{ChartFlags, LegendPosition};

const X_SPACING: f64 = 15.0;
const Y_SPACING: f64 = 15.0;

/// Solved pixel geometry for one render. The plot area spans
/// `xorigin..xorigin + xsize` horizontally and `yorigin - ysize..yorigin`
/// vertically (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    pub ximg: f64,
    pub yimg: f64,
    pub xorigin: f64,
    pub yorigin: f64,
    pub xsize: f64,
    pub ysize: f64,
    pub title: (f64, f64),
    pub legend: (f64, f64),
    pub unit_left: (f64, f64),
    pub unit_right: (f64, f64),
    pub legend_width: f64,
    pub legend_height: f64,
}

impl Layout {
    pub fn plot_left(&self) -> f64 { self.xorigin }
    pub fn plot_right(&self) -> f64 { self.xorigin + self.xsize }
    pub fn plot_top(&self) -> f64 { self.yorigin - self.ysize }
    pub fn plot_bottom(&self) -> f64 { self.yorigin }
}

/// Everything besides the legend entries that takes up room.
pub struct SizeRequest<'a> {
    /// Plot area size, or the whole image with `FULL_SIZE_MODE`.
    pub width: f64,
    pub height: f64,
    pub flags: ChartFlags,
    pub position: LegendPosition,
    pub fonts: &'a Fonts,
    pub title: &'a str,
    pub watermark: &'a str,
    pub unit_left: &'a str,
    pub unit_right: &'a str,
    pub second_axis: bool,
    pub draw_x_grid: bool,
    pub draw_y_grid: bool,
    pub force_left_space: bool,
    /// Digits reserved for y-axis labels.
    pub units_length: u32,
}

/// Solve the image size and anchors, placing the legend along the way.
///
/// East/west legends are measured first because their width eats into the
/// horizontal budget; north/south legends are placed once the image width
/// is known and their height goes into the vertical budget.
pub fn graph_size_location(
    req: &SizeRequest<'_>,
    elements: &[Element],
    legend: &LegendContext<'_>,
) -> Result<(Layout, LegendLayout)> {
    let mut lay = Layout::default();
    if req.flags.contains(ChartFlags::ONLY_GRAPH) {
        lay.xsize = req.width;
        lay.ysize = req.height;
        lay.ximg = req.width;
        lay.yimg = req.height;
        lay.yorigin = req.height;
        return Ok((lay, LegendLayout::default()));
    }

    let fonts = req.fonts;
    let unit_size = fonts[FontRole::Unit].size;
    let ywatermark = if req.watermark.is_empty() { 4.0 } else { (fonts[FontRole::Watermark].size * 2.0).trunc() };
    let xvertical = if req.unit_left.is_empty() { 0.0 } else { (unit_size * 2.0).trunc() };
    let xvertical2 = if req.unit_right.is_empty() { X_SPACING } else { (unit_size * 2.0).trunc() };
    let ytitle = if req.title.is_empty() {
        Y_SPACING
    } else {
        let lines = split_title(req.title).len() as f64;
        (fonts[FontRole::Title].size * (lines + 1.0) * 1.6).trunc()
    };
    let yxlabel = if req.draw_x_grid { (fonts[FontRole::Axis].size * 2.5).trunc() } else { 0.0 };
    let mut xylabel = 0.0;
    if req.draw_y_grid || req.force_left_space {
        let digit = legend.measure.text_width(0.0, &fonts[FontRole::Axis], legend.tab_width, "0");
        xylabel = (digit * req.units_length as f64).trunc();
    }
    xylabel += X_SPACING;

    let show_legend = !req.flags.contains(ChartFlags::NO_LEGEND);
    let side = show_legend && matches!(req.position, LegendPosition::West | LegendPosition::East);
    let stacked = show_legend && matches!(req.position, LegendPosition::North | LegendPosition::South);

    let mut placed = LegendLayout::default();
    if side {
        placed = leg_place(elements, legend, None)?;
    }

    let xmain;
    let ymain;
    if req.flags.contains(ChartFlags::FULL_SIZE_MODE) {
        lay.ximg = req.width;
        lay.yimg = req.height;

        let mut x = lay.ximg - xylabel;
        if side {
            x -= placed.width;
        }
        if req.second_axis {
            x -= xylabel;
        }
        x -= xvertical + xvertical2;
        xmain = x.trunc().max(1.0);

        if stacked {
            placed = leg_place(elements, legend, Some(lay.ximg))?;
        }
        let mut y = lay.yimg - yxlabel;
        if stacked {
            y = (y - placed.height).trunc();
        }
        y -= ytitle;
        if !show_legend {
            y = (y - 0.5 * Y_SPACING).trunc();
        }
        if !req.watermark.is_empty() {
            y -= ywatermark;
        }
        ymain = y.max(1.0);
    } else {
        xmain = req.width;
        ymain = req.height;

        let mut ximg = xmain + xylabel;
        if side {
            ximg = (ximg + placed.width).trunc();
        }
        if req.second_axis {
            ximg += xylabel;
        }
        ximg += xvertical + xvertical2;
        lay.ximg = ximg;

        if stacked {
            placed = leg_place(elements, legend, Some(lay.ximg))?;
        }
        let mut yimg = ymain + yxlabel;
        if stacked {
            yimg = (yimg + placed.height).trunc();
        }
        yimg += ytitle;
        if !show_legend {
            yimg = (yimg + 0.5 * Y_SPACING).trunc();
        }
        if !req.watermark.is_empty() {
            yimg += ywatermark;
        }
        lay.yimg = yimg;
    }
    lay.xsize = xmain;
    lay.ysize = ymain;

    // centered entries may have been placed against a narrower block
    if side {
        placed = leg_place(elements, legend, Some(placed.width))?;
    }
    lay.legend_width = placed.width;
    lay.legend_height = placed.height;

    let half_y = (ymain / 2.0).trunc();
    let second = if req.second_axis { xylabel } else { 0.0 };
    let right_unit_x = xvertical + xylabel + xmain + second;
    match req.position {
        LegendPosition::North => {
            lay.title = ((lay.ximg / 2.0).trunc(), 0.0);
            lay.legend = (0.0, ytitle);
            lay.unit_left = (0.0, ytitle + placed.height + half_y + yxlabel);
            lay.xorigin = xvertical + xylabel;
            lay.yorigin = ytitle + placed.height + ymain;
            lay.unit_right = (right_unit_x, ytitle + placed.height + half_y + yxlabel);
        }
        LegendPosition::West => {
            lay.title = (placed.width + (xmain / 2.0).trunc(), 0.0);
            lay.legend = (0.0, ytitle);
            lay.unit_left = (placed.width, ytitle + half_y);
            lay.xorigin = placed.width + xvertical + xylabel;
            lay.yorigin = ytitle + ymain;
            lay.unit_right = (placed.width + right_unit_x, ytitle + half_y);
        }
        LegendPosition::South => {
            lay.title = ((lay.ximg / 2.0).trunc(), 0.0);
            lay.legend = (0.0, ytitle + ymain + yxlabel);
            lay.unit_left = (0.0, ytitle + half_y);
            lay.xorigin = xvertical + xylabel;
            lay.yorigin = ytitle + ymain;
            lay.unit_right = (right_unit_x, ytitle + half_y);
        }
        LegendPosition::East => {
            lay.title = ((xmain / 2.0).trunc(), 0.0);
            lay.legend = (right_unit_x + xvertical2, ytitle);
            lay.unit_left = (0.0, ytitle + half_y);
            lay.xorigin = xvertical + xylabel;
            lay.yorigin = ytitle + ymain;
            lay.unit_right = (right_unit_x, ytitle + half_y);
        }
    }
    Ok((lay, placed))
}

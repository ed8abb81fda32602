// File: crates/tsgraph-render-skia/src/lib.rs
// Summary: Skia raster backend for tsgraph-core charts plus PNG convenience entry points.

use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;
use tsgraph_core::{Chart, RenderOptions, RenderReport};

pub mod backend;
pub mod shaper;

pub use backend::SkiaBackend;
pub use shaper::TextShaper;

/// Render `chart` on a fresh raster surface and return the encoded PNG.
pub fn render_to_png_bytes(chart: &mut Chart, opts: &RenderOptions) -> Result<(Vec<u8>, RenderReport)> {
    let mut gfx = SkiaBackend::new();
    let report = chart.render(opts, &mut gfx)?;
    let png = gfx.take_png().ok_or_else(|| anyhow!("render produced no image"))?;
    Ok((png, report))
}

pub fn render_to_png(
    chart: &mut Chart,
    opts: &RenderOptions,
    output_png_path: impl AsRef<Path>,
) -> Result<RenderReport> {
    let (png, report) = render_to_png_bytes(chart, opts)?;
    let path = output_png_path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &png)?;
    info!(path = %path.display(), bytes = png.len(), "png written");
    Ok(report)
}

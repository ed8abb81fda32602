// File: crates/tsgraph-core/src/lib.rs
// Summary: Core library entry point; exports the chart model and the render pipeline.

pub mod axis;
pub mod backend;
pub mod chart;
pub mod error;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod legend;
pub mod numeric;
pub mod paint;
pub mod print;
pub mod resample;
pub mod scale;
pub mod series;
pub mod text;
pub mod theme;
pub mod timegrid;
pub mod types;

pub use axis::{Axis, ScaleKind, SecondAxis};
pub use backend::{GraphicsBackend, TextMeasure};
pub use chart::{Chart, RenderOptions, RenderReport};
pub use error::{GraphError, Result};
pub use format::ValueFormatter;
pub use geometry::Layout;
pub use series::{Consolidation, Element, ElementId, ElementKind, SourceData};
pub use text::{FontRole, Fonts, TextProp};
pub use theme::{ColorRole, Theme};
pub use types::{ChartFlags, Dash, LegendDirection, LegendPosition, Rgba, TextAlign, TimeSpan};

//! Text watermarks for 2D drawing surfaces
//!
//! Pick a position (`lower_right`, `lower_left`, `upper_right`,
//! `upper_left`, `center`) or compose one with `at_pos`, then place the
//! resulting `Watermark` onto any `Surface`:
//!
//! ```
//! use canvas_watermark::{lower_right, Color, RecordingCanvas, WatermarkStyle};
//!
//! let style = WatermarkStyle::new()
//!     .with_font("20px sans-serif".parse().unwrap())
//!     .with_fill(Color::white())
//!     .with_background(Color::black());
//!
//! let mut canvas = RecordingCanvas::new(200, 100);
//! lower_right("© 2024", style).place(&mut canvas);
//! assert_eq!(canvas.fill_texts().count(), 1);
//! ```

mod canvas;
mod config;
mod error;
mod font;
mod font_registry;
mod placement;
mod positions;
mod raster;
mod recording;
mod types;

#[cfg(test)]
mod test_font;

pub use canvas::{
    CanvasState, DrawingContext, StateGuard, StateStack, Surface, TextAlign, TextBaseline,
    TextMetrics,
};
pub use config::{Position, WatermarkConfig};
pub use error::{WatermarkError, WatermarkResult};
pub use font::{FontSpec, FontStyle, FontWeight, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PX};
pub use font_registry::{approximate_metrics, load_font_file, FontLibrary};
pub use placement::{
    at_pos, background_rect, from_bottom, from_left, from_right, from_top, horizontal_center,
    or_override, vertical_middle, Anchor, HorizontalAnchor, PlacementInput, VerticalAnchor,
    Watermark, WatermarkStyle, XStrategy, YStrategy, BACKGROUND_PADDING,
};
pub use positions::{center, lower_left, lower_right, upper_left, upper_right, EDGE_MARGIN, UPPER_OFFSET};
pub use raster::RasterCanvas;
pub use recording::{DrawOp, RecordingCanvas};
pub use types::{Color, Rect, SurfaceSize};

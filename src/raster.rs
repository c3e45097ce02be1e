//! Raster canvas backed by a tiny-skia pixmap
//!
//! Rectangles are filled directly; text is rasterized from ttf-parser glyph
//! outlines of the font resolved through the canvas `FontLibrary`.

use log::{debug, warn};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use ttf_parser::OutlineBuilder;

use crate::canvas::{
    CanvasState, DrawingContext, StateStack, Surface, TextAlign, TextBaseline, TextMetrics,
};
use crate::error::{WatermarkError, WatermarkResult};
use crate::font::FontSpec;
use crate::font_registry::{glyph_for, measure_with_face, FontLibrary};
use crate::types::{Color, Rect, SurfaceSize};

pub struct RasterCanvas {
    pixmap: Pixmap,
    state: StateStack,
    fonts: FontLibrary,
}

impl RasterCanvas {
    /// Transparent canvas of the given size, drawing text with
    /// `FontLibrary::system_fallback()` until `with_fonts` replaces it
    pub fn new(width: u32, height: u32) -> WatermarkResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            WatermarkError::InvalidSurface(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        Ok(Self {
            pixmap,
            state: StateStack::default(),
            fonts: FontLibrary::system_fallback(),
        })
    }

    pub fn with_fonts(mut self, fonts: FontLibrary) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn state(&self) -> &CanvasState {
        self.state.current()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Fill the whole canvas, ignoring state
    pub fn clear(&mut self, color: Color) {
        if let Some(c) = to_skia_color(color, 1.0) {
            self.pixmap.fill(c);
        }
    }

    /// Demultiplied RGBA at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    fn paint(&self) -> Option<Paint<'static>> {
        let state = self.state.current();
        let color = to_skia_color(state.fill_color, state.global_alpha)?;
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        Some(paint)
    }
}

fn to_skia_color(color: Color, alpha: f64) -> Option<tiny_skia::Color> {
    let channel = |v: f64| v.clamp(0.0, 1.0) as f32;
    tiny_skia::Color::from_rgba(
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a * alpha),
    )
}

/// Maps font units to pixmap space around a glyph origin
struct GlyphOutline<'a> {
    builder: &'a mut PathBuilder,
    origin_x: f64,
    baseline_y: f64,
    scale: f64,
}

impl GlyphOutline<'_> {
    fn tx(&self, x: f32) -> f32 {
        (self.origin_x + x as f64 * self.scale) as f32
    }

    // font units grow upward, pixmap rows grow downward
    fn ty(&self, y: f32) -> f32 {
        (self.baseline_y - y as f64 * self.scale) as f32
    }
}

impl OutlineBuilder for GlyphOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.tx(x), self.ty(y));
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.tx(x), self.ty(y));
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.tx(x1), self.ty(y1), self.tx(x), self.ty(y));
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.tx(x1), self.ty(y1));
        let (x2, y2) = (self.tx(x2), self.ty(y2));
        let (x, y) = (self.tx(x), self.ty(y));
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

impl DrawingContext for RasterCanvas {
    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.state.current_mut().font = font.clone();
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if !self.state.set_global_alpha(alpha) {
            debug!("Ignoring global alpha {}", alpha);
        }
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.current_mut().text_align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.current_mut().text_baseline = baseline;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.current_mut().fill_color = color;
    }

    fn measure_text(&self, text: &str) -> TextMetrics {
        self.fonts.measure(&self.state.current().font, text)
    }

    fn fill_rect(&mut self, rect: Rect) {
        let Some(paint) = self.paint() else {
            return;
        };
        let Some(skia_rect) =
            tiny_skia::Rect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
        else {
            debug!("Skipping degenerate rect {:?}", rect);
            return;
        };
        self.pixmap.fill_rect(skia_rect, &paint, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        if text.is_empty() {
            return;
        }
        let Some(paint) = self.paint() else {
            return;
        };

        let state = self.state.current();
        let Some(face) = self.fonts.face(&state.font) else {
            warn!("No font data for '{}', text not rasterized: {:?}", state.font, text);
            return;
        };

        let metrics = measure_with_face(&face, state.font.size_px, text);
        let scale = state.font.size_px / face.units_per_em() as f64;
        let baseline_y = y + state.text_baseline.baseline_offset(&metrics);
        let mut pen_x = x + state.text_align.offset(metrics.width);

        let mut builder = PathBuilder::new();
        for ch in text.chars() {
            let glyph = glyph_for(&face, ch);
            let mut outline = GlyphOutline {
                builder: &mut builder,
                origin_x: pen_x,
                baseline_y,
                scale,
            };
            face.outline_glyph(glyph, &mut outline);
            pen_x += face.glyph_hor_advance(glyph).unwrap_or(0) as f64 * scale;
        }

        // Whitespace-only text has no outline
        if let Some(path) = builder.finish() {
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

impl Surface for RasterCanvas {
    type Context = Self;

    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.pixmap.width(), self.pixmap.height())
    }

    fn context(&mut self) -> &mut Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font;

    #[test]
    fn test_zero_sized_canvas_is_rejected() {
        assert!(matches!(RasterCanvas::new(0, 10), Err(WatermarkError::InvalidSurface(_))));
    }

    #[test]
    fn test_fill_rect_paints_only_inside() {
        let mut canvas = RasterCanvas::new(20, 20).unwrap();
        canvas.set_fill_color(Color::rgb(1.0, 0.0, 0.0));
        canvas.fill_rect(Rect::new(5.0, 5.0, 10.0, 10.0));

        assert_eq!(canvas.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(15, 15), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_global_alpha_scales_coverage() {
        let mut canvas = RasterCanvas::new(10, 10).unwrap();
        canvas.set_global_alpha(0.5);
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));

        let [_, _, _, a] = canvas.pixel(5, 5).unwrap();
        assert!((a as i32 - 128).abs() <= 1, "alpha was {}", a);

        canvas.set_global_alpha(2.0);
        assert_eq!(canvas.state().global_alpha, 0.5);
    }

    #[test]
    fn test_degenerate_rect_is_skipped() {
        let mut canvas = RasterCanvas::new(10, 10).unwrap();
        canvas.fill_rect(Rect::new(0.0, 0.0, f64::NAN, 5.0));
        canvas.fill_rect(Rect::new(0.0, 0.0, -5.0, 5.0));
        assert!(canvas.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_text_without_font_data_draws_nothing() {
        let mut canvas = RasterCanvas::new(50, 20).unwrap().with_fonts(FontLibrary::new());
        canvas.fill_text("hello", 0.0, 0.0);
        assert!(canvas.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_ignores_state_alpha() {
        let mut canvas = RasterCanvas::new(4, 4).unwrap();
        canvas.set_global_alpha(0.1);
        canvas.clear(Color::white());
        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_text_rasterized_from_glyph_outlines() {
        let mut canvas = RasterCanvas::new(120, 40).unwrap().with_fonts(test_font::box_library());
        canvas.set_font(&FontSpec::new("sans-serif", 20.0));
        canvas.set_text_baseline(TextBaseline::Top);
        canvas.fill_text("WW", 10.0, 10.0);

        // glyph boxes span x 11..21 and 23..33, y 12..26
        assert_eq!(canvas.pixel(15, 20), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(28, 20), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(22, 20).unwrap()[3], 0);
        assert_eq!(canvas.pixel(15, 8).unwrap()[3], 0);
        assert_eq!(canvas.pixel(15, 28).unwrap()[3], 0);
        assert_eq!(canvas.pixel(40, 20).unwrap()[3], 0);
    }

    #[test]
    fn test_new_canvas_uses_system_fonts() {
        let canvas = RasterCanvas::new(4, 4).unwrap();
        assert_eq!(canvas.fonts().is_empty(), FontLibrary::system_fallback().is_empty());
    }
}

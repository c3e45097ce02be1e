//! Recording canvas
//!
//! A surface that keeps a display list of everything drawn on it instead of
//! pixels. Each fill captures the state it was issued under, which makes
//! it the natural surface for checking where a watermark lands.

use serde::Serialize;

use crate::canvas::{
    CanvasState, DrawingContext, StateStack, Surface, TextAlign, TextBaseline, TextMetrics,
};
use crate::font::FontSpec;
use crate::font_registry::FontLibrary;
use crate::types::{Color, Rect, SurfaceSize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Save,
    Restore,
    FillRect {
        rect: Rect,
        color: Color,
        alpha: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Color,
        alpha: f64,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: SurfaceSize,
    state: StateStack,
    fonts: FontLibrary,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            state: StateStack::default(),
            fonts: FontLibrary::new(),
            ops: Vec::new(),
        }
    }

    pub fn with_fonts(mut self, fonts: FontLibrary) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn state(&self) -> &CanvasState {
        self.state.current()
    }

    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn fill_rects(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::FillRect { .. }))
    }

    pub fn fill_texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::FillText { .. }))
    }

    /// Box covered by a recorded text fill: advance width by ascent + descent
    pub fn text_bounds(&self, op: &DrawOp) -> Option<Rect> {
        match op {
            DrawOp::FillText { text, x, y, font, align, baseline, .. } => {
                let metrics = self.fonts.measure(font, text);
                let left = x + align.offset(metrics.width);
                let baseline_y = y + baseline.baseline_offset(&metrics);
                Some(Rect::new(
                    left,
                    baseline_y - metrics.ascent,
                    metrics.width,
                    metrics.ascent + metrics.descent,
                ))
            }
            _ => None,
        }
    }
}

impl DrawingContext for RecordingCanvas {
    fn save(&mut self) {
        self.state.save();
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if self.state.restore() {
            self.ops.push(DrawOp::Restore);
        }
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.state.current_mut().font = font.clone();
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.set_global_alpha(alpha);
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
        let state = self.state.current();
        self.ops.push(DrawOp::FillRect {
            rect,
            color: state.fill_color,
            alpha: state.global_alpha,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let state = self.state.current();
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            font: state.font.clone(),
            color: state.fill_color,
            alpha: state.global_alpha,
            align: state.text_align,
            baseline: state.text_baseline,
        });
    }
}

impl Surface for RecordingCanvas {
    type Context = Self;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn context(&mut self) -> &mut Self {
        self
    }
}

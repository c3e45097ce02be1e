//! Canvas-like drawing API
//!
//! `DrawingContext` is the small subset of a 2D canvas context that
//! watermark placement needs: a save/restore state stack, font, global
//! alpha, text alignment, fill color, text measurement, rect fill and text
//! fill. `Surface` is anything with pixel dimensions that hands out such a
//! context. Two implementations ship with the crate: `RecordingCanvas`
//! (display list) and `RasterCanvas` (tiny-skia pixmap).

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::font::FontSpec;
use crate::types::{Color, Rect, SurfaceSize};

/// Horizontal text alignment relative to the x passed to `fill_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Start,
    Left,
    Center,
    Right,
    End,
}

impl TextAlign {
    /// Offset from the anchor x to the left edge of text `width` wide (left-to-right text)
    pub fn offset(&self, width: f64) -> f64 {
        match self {
            TextAlign::Start | TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right | TextAlign::End => -width,
        }
    }
}

/// Vertical text anchor relative to the y passed to `fill_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
}

impl TextBaseline {
    /// Offset from the anchor y down to the alphabetic baseline
    pub fn baseline_offset(&self, metrics: &TextMetrics) -> f64 {
        match self {
            TextBaseline::Top | TextBaseline::Hanging => metrics.ascent,
            TextBaseline::Middle => (metrics.ascent - metrics.descent) / 2.0,
            TextBaseline::Alphabetic => 0.0,
            TextBaseline::Ideographic | TextBaseline::Bottom => -metrics.descent,
        }
    }
}

/// Result of measuring a string under the current font.
///
/// `ascent` and `descent` are both positive distances from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

/// Canvas state for save/restore
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub font: FontSpec,
    pub fill_color: Color,
    pub global_alpha: f64,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            font: FontSpec::new("sans-serif", 10.0),
            fill_color: Color::black(),
            global_alpha: 1.0,
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
        }
    }
}

/// Current state plus the stack of saved states
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: CanvasState,
    saved: Vec<CanvasState>,
}

impl StateStack {
    pub fn current(&self) -> &CanvasState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut CanvasState {
        &mut self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state. An unbalanced restore is a no-op.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    /// Apply a global alpha assignment, ignoring values a canvas would reject
    pub fn set_global_alpha(&mut self, alpha: f64) -> bool {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.current.global_alpha = alpha;
            true
        } else {
            false
        }
    }
}

pub trait DrawingContext {
    fn save(&mut self);
    fn restore(&mut self);

    fn set_font(&mut self, font: &FontSpec);
    /// Values outside 0.0-1.0 (or non-finite) are ignored.
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn set_fill_color(&mut self, color: Color);

    fn measure_text(&self, text: &str) -> TextMetrics;
    fn fill_rect(&mut self, rect: Rect);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// A drawing target with pixel dimensions and a 2D context
pub trait Surface {
    type Context: DrawingContext;

    fn size(&self) -> SurfaceSize;
    fn context(&mut self) -> &mut Self::Context;
}

/// Saves the context state on creation and restores it on drop
pub struct StateGuard<'a, C: DrawingContext + ?Sized> {
    ctx: &'a mut C,
}

impl<'a, C: DrawingContext + ?Sized> StateGuard<'a, C> {
    pub fn new(ctx: &'a mut C) -> Self {
        ctx.save();
        Self { ctx }
    }
}

impl<C: DrawingContext + ?Sized> Deref for StateGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: DrawingContext + ?Sized> DerefMut for StateGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: DrawingContext + ?Sized> Drop for StateGuard<'_, C> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}

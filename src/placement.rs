//! Watermark placement
//!
//! A `Watermark` is built from two axis strategies and a style. Each
//! strategy maps the surface size, the measured text and the font size to
//! an `Anchor`: a coordinate plus an optional alignment mode that the
//! render step applies to the context. Strategies never touch the context
//! themselves.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::canvas::{DrawingContext, StateGuard, Surface, TextAlign, TextBaseline, TextMetrics};
use crate::font::FontSpec;
use crate::types::{Color, Rect, SurfaceSize};

/// Space between the text box and the edge of its background plate
pub const BACKGROUND_PADDING: f64 = 5.0;

/// Everything a strategy may base a coordinate on
#[derive(Debug, Clone, Copy)]
pub struct PlacementInput<'a> {
    pub surface: SurfaceSize,
    pub metrics: &'a TextMetrics,
    /// Pixel size of the watermark font, if the style sets one
    pub font_size: Option<f64>,
}

impl PlacementInput<'_> {
    /// Font size, or the measured ascent + descent when the style sets no font
    pub fn text_height(&self) -> f64 {
        self.font_size
            .unwrap_or(self.metrics.ascent + self.metrics.descent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor<A> {
    pub coord: f64,
    /// Alignment to apply before drawing; `None` keeps the context's current mode
    pub align: Option<A>,
}

impl<A> Anchor<A> {
    pub fn at(coord: f64) -> Self {
        Self { coord, align: None }
    }

    pub fn aligned(coord: f64, align: A) -> Self {
        Self { coord, align: Some(align) }
    }
}

pub type HorizontalAnchor = Anchor<TextAlign>;
pub type VerticalAnchor = Anchor<TextBaseline>;

pub type XStrategy = Arc<dyn Fn(&PlacementInput<'_>) -> HorizontalAnchor + Send + Sync>;
pub type YStrategy = Arc<dyn Fn(&PlacementInput<'_>) -> VerticalAnchor + Send + Sync>;

/// Constant x, `margin` from the left edge
pub fn from_left(margin: f64) -> impl Fn(&PlacementInput<'_>) -> HorizontalAnchor + Send + Sync + 'static {
    move |_: &PlacementInput<'_>| Anchor::at(margin)
}

/// Right edge of the text `margin` from the right edge of the surface
pub fn from_right(margin: f64) -> impl Fn(&PlacementInput<'_>) -> HorizontalAnchor + Send + Sync + 'static {
    move |input: &PlacementInput<'_>| {
        Anchor::at(input.surface.width_f64() - (input.metrics.width + margin))
    }
}

/// Constant y, text top `offset` below the top edge
pub fn from_top(offset: f64) -> impl Fn(&PlacementInput<'_>) -> VerticalAnchor + Send + Sync + 'static {
    move |_: &PlacementInput<'_>| Anchor::at(offset)
}

/// Text bottom `margin` above the bottom edge
pub fn from_bottom(margin: f64) -> impl Fn(&PlacementInput<'_>) -> VerticalAnchor + Send + Sync + 'static {
    move |input: &PlacementInput<'_>| {
        Anchor::at(input.surface.height_f64() - input.text_height() - margin)
    }
}

pub fn horizontal_center() -> impl Fn(&PlacementInput<'_>) -> HorizontalAnchor + Send + Sync + 'static {
    |input: &PlacementInput<'_>| Anchor::aligned(input.surface.width_f64() / 2.0, TextAlign::Center)
}

pub fn vertical_middle() -> impl Fn(&PlacementInput<'_>) -> VerticalAnchor + Send + Sync + 'static {
    |input: &PlacementInput<'_>| Anchor::aligned(input.surface.height_f64() / 2.0, TextBaseline::Middle)
}

/// Use `y` verbatim when set, otherwise defer to `fallback`
pub fn or_override<F>(
    y: Option<f64>,
    fallback: F,
) -> impl Fn(&PlacementInput<'_>) -> VerticalAnchor + Send + Sync + 'static
where
    F: Fn(&PlacementInput<'_>) -> VerticalAnchor + Send + Sync + 'static,
{
    move |input: &PlacementInput<'_>| match y {
        Some(y) => Anchor::at(y),
        None => fallback(input),
    }
}

/// Styling shared by every position.
///
/// Unset values are `None`, so `alpha: Some(0.0)` and `y: Some(0.0)` are
/// honored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkStyle {
    pub font: Option<FontSpec>,
    pub fill_style: Color,
    /// Global opacity, 1.0 when unset
    pub alpha: Option<f64>,
    /// Color of the plate drawn behind the text
    pub background: Option<Color>,
    /// Vertical position override for the corner positions
    pub y: Option<f64>,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            font: None,
            fill_style: Color::black(),
            alpha: None,
            background: None,
            y: None,
        }
    }
}

impl WatermarkStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_style = color;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(1.0)
    }
}

/// Plate behind text anchored (top-left) at `(x, y)`
pub fn background_rect(x: f64, y: f64, metrics: &TextMetrics, font_size: f64) -> Rect {
    Rect::new(
        x - BACKGROUND_PADDING,
        y - BACKGROUND_PADDING,
        metrics.width + 2.0 * BACKGROUND_PADDING,
        font_size + 2.0 * BACKGROUND_PADDING,
    )
}

/// A positioned, styled piece of text ready to be drawn onto any surface
#[derive(Clone)]
pub struct Watermark {
    x: XStrategy,
    y: YStrategy,
    text: String,
    style: WatermarkStyle,
}

/// Build a watermark from an x strategy, a y strategy, the text and its style.
///
/// `style.y` is not consulted here; positions that honor it wrap their y
/// strategy in [`or_override`].
pub fn at_pos<X, Y>(x: X, y: Y, text: impl Into<String>, style: WatermarkStyle) -> Watermark
where
    X: Fn(&PlacementInput<'_>) -> HorizontalAnchor + Send + Sync + 'static,
    Y: Fn(&PlacementInput<'_>) -> VerticalAnchor + Send + Sync + 'static,
{
    Watermark {
        x: Arc::new(x),
        y: Arc::new(y),
        text: text.into(),
        style,
    }
}

impl Watermark {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &WatermarkStyle {
        &self.style
    }

    /// Compute both anchors for `text` measured as `metrics` on a surface of `size`
    pub fn anchors(&self, size: SurfaceSize, metrics: &TextMetrics) -> (HorizontalAnchor, VerticalAnchor) {
        let input = PlacementInput {
            surface: size,
            metrics,
            font_size: self.style.font.as_ref().map(|f| f.size_px),
        };
        ((self.x)(&input), (self.y)(&input))
    }

    /// Draw onto `target` and hand the same surface back for chaining.
    ///
    /// Context state changed here (font, alpha, alignment, fill) is restored
    /// before returning.
    pub fn place<'s, S: Surface + ?Sized>(&self, target: &'s mut S) -> &'s mut S {
        let size = target.size();
        {
            let mut ctx = StateGuard::new(target.context());

            if let Some(font) = &self.style.font {
                ctx.set_font(font);
            }
            ctx.set_global_alpha(self.style.effective_alpha());
            ctx.set_text_baseline(TextBaseline::Top);

            let metrics = ctx.measure_text(&self.text);
            let (x, y) = self.anchors(size, &metrics);
            if let Some(align) = x.align {
                ctx.set_text_align(align);
            }
            if let Some(baseline) = y.align {
                ctx.set_text_baseline(baseline);
            }
            debug!(
                "Placing watermark {:?} at ({}, {}) on {}x{}",
                self.text, x.coord, y.coord, size.width, size.height
            );

            if let (Some(background), Some(font)) = (self.style.background, &self.style.font) {
                ctx.set_fill_color(background);
                ctx.fill_rect(background_rect(x.coord, y.coord, &metrics, font.size_px));
            }

            ctx.set_fill_color(self.style.fill_style);
            ctx.fill_text(&self.text, x.coord, y.coord);
        }
        target
    }
}

impl fmt::Debug for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watermark")
            .field("text", &self.text)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

//! Named watermark positions
//!
//! The four corners keep text 10px from the side edges. Lower corners sit
//! 10px above the bottom edge (accounting for the font size), upper corners
//! put the text top at y = 20. Corners honor `style.y` as a verbatim
//! vertical override and default the font to `28px serif`.
//!
//! `center` anchors the text middle at the surface middle. It takes no
//! default font and ignores `style.y`.

use crate::font::FontSpec;
use crate::placement::{
    at_pos, from_bottom, from_left, from_right, from_top, horizontal_center, or_override,
    vertical_middle, Watermark, WatermarkStyle,
};

/// Distance between the text and the side edges, and the bottom edge
pub const EDGE_MARGIN: f64 = 10.0;
/// Top of the text for the upper corners
pub const UPPER_OFFSET: f64 = 20.0;

fn corner_style(mut style: WatermarkStyle) -> WatermarkStyle {
    if style.font.is_none() {
        style.font = Some(FontSpec::default());
    }
    style
}

pub fn lower_right(text: impl Into<String>, style: WatermarkStyle) -> Watermark {
    let style = corner_style(style);
    let y = or_override(style.y, from_bottom(EDGE_MARGIN));
    at_pos(from_right(EDGE_MARGIN), y, text, style)
}

pub fn lower_left(text: impl Into<String>, style: WatermarkStyle) -> Watermark {
    let style = corner_style(style);
    let y = or_override(style.y, from_bottom(EDGE_MARGIN));
    at_pos(from_left(EDGE_MARGIN), y, text, style)
}

pub fn upper_right(text: impl Into<String>, style: WatermarkStyle) -> Watermark {
    let style = corner_style(style);
    let y = or_override(style.y, from_top(UPPER_OFFSET));
    at_pos(from_right(EDGE_MARGIN), y, text, style)
}

pub fn upper_left(text: impl Into<String>, style: WatermarkStyle) -> Watermark {
    let style = corner_style(style);
    let y = or_override(style.y, from_top(UPPER_OFFSET));
    at_pos(from_left(EDGE_MARGIN), y, text, style)
}

pub fn center(text: impl Into<String>, style: WatermarkStyle) -> Watermark {
    at_pos(horizontal_center(), vertical_middle(), text, style)
}

//! JSON-configurable watermarks
//!
//! ```json
//! {
//!   "position": "lower_right",
//!   "text": "© 2024",
//!   "font": "20px sans-serif",
//!   "fill_style": "white",
//!   "background": "black"
//! }
//! ```
//!
//! Style keys sit next to `position` and `text`; fonts and colors use CSS
//! syntax and are validated while deserializing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{WatermarkError, WatermarkResult};
use crate::placement::{Watermark, WatermarkStyle};
use crate::positions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    LowerRight,
    LowerLeft,
    UpperRight,
    UpperLeft,
    Center,
}

impl Position {
    pub fn build(self, text: impl Into<String>, style: WatermarkStyle) -> Watermark {
        match self {
            Position::LowerRight => positions::lower_right(text, style),
            Position::LowerLeft => positions::lower_left(text, style),
            Position::UpperRight => positions::upper_right(text, style),
            Position::UpperLeft => positions::upper_left(text, style),
            Position::Center => positions::center(text, style),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::LowerRight => "lower_right",
            Position::LowerLeft => "lower_left",
            Position::UpperRight => "upper_right",
            Position::UpperLeft => "upper_left",
            Position::Center => "center",
        }
    }
}

impl FromStr for Position {
    type Err = WatermarkError;

    /// Accepts snake_case, kebab-case and camelCase names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "lowerright" => Ok(Position::LowerRight),
            "lowerleft" => Ok(Position::LowerLeft),
            "upperright" => Ok(Position::UpperRight),
            "upperleft" => Ok(Position::UpperLeft),
            "center" | "centre" => Ok(Position::Center),
            _ => Err(WatermarkError::Config(format!("Unknown position: {}", s))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializes back to the same JSON shape. Colors are written with 8 bits
/// per channel, and a font whose size is not finite fails to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    pub position: Position,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub style: WatermarkStyle,
}

impl WatermarkConfig {
    pub fn from_json(json: &str) -> WatermarkResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_value(value: serde_json::Value) -> WatermarkResult<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> WatermarkResult<()> {
        if let Some(alpha) = self.style.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(WatermarkError::Config(format!("alpha must be within 0.0-1.0, got {}", alpha)));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Watermark {
        self.position.build(self.text.clone(), self.style.clone())
    }
}

//! Structured font description
//!
//! A `FontSpec` carries the family, pixel size, style and weight of the
//! watermark font. The CSS font shorthand (`"bold 20px sans-serif"`) is only
//! a parsing/serialization adapter at the boundary: placement reads
//! `size_px` directly instead of slicing strings.

use std::fmt;
use std::str::FromStr;

use serde::{ser, Deserialize, Serialize, Serializer};

use crate::error::{WatermarkError, WatermarkResult};

/// Font-stretch and font-variant keywords; accepted and ignored
const IGNORED_KEYWORDS: [&str; 10] = [
    "small-caps",
    "ultra-condensed",
    "extra-condensed",
    "condensed",
    "semi-condensed",
    "semi-expanded",
    "expanded",
    "extra-expanded",
    "ultra-expanded",
    "normal",
];

/// Font size used by the corner positions when no font is given
pub const DEFAULT_FONT_SIZE_PX: f64 = 28.0;
pub const DEFAULT_FONT_FAMILY: &str = "serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Numeric font weight (100-900), 400 is normal and 700 bold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    pub fn is_bold(&self) -> bool {
        self.0 >= 600
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Serializes as CSS shorthand. Sizes must be finite to serialize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
    pub style: FontStyle,
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
            style: FontStyle::Normal,
            weight: FontWeight::NORMAL,
        }
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Parse CSS font shorthand:
    /// `[style] [variant] [weight] [stretch] <size>px[/line-height] <family>`.
    ///
    /// The size token is mandatory and must be given in pixels (any case).
    /// Variant and stretch keywords are accepted but not kept.
    pub fn parse(shorthand: &str) -> WatermarkResult<Self> {
        let invalid = |why: &str| WatermarkError::InvalidFont(format!("{} in '{}'", why, shorthand));

        let tokens: Vec<&str> = shorthand.split_whitespace().collect();
        let size_index = tokens
            .iter()
            .position(|t| t.to_ascii_lowercase().contains("px"))
            .ok_or_else(|| invalid("missing <number>px size"))?;

        let size_token = tokens[size_index].to_ascii_lowercase();
        let size_str = size_token
            .split('/')
            .next()
            .and_then(|s| s.strip_suffix("px"))
            .ok_or_else(|| invalid("size must be written as <number>px"))?;
        let size_px: f64 = size_str
            .parse()
            .map_err(|_| invalid("font size is not a number"))?;
        if !size_px.is_finite() || size_px < 0.0 {
            return Err(invalid("font size out of range"));
        }

        let mut spec = FontSpec::new(String::new(), size_px);
        for token in &tokens[..size_index] {
            match token.to_ascii_lowercase().as_str() {
                keyword if IGNORED_KEYWORDS.contains(&keyword) => {}
                "italic" => spec.style = FontStyle::Italic,
                "oblique" => spec.style = FontStyle::Oblique,
                "bold" | "bolder" => spec.weight = FontWeight::BOLD,
                "lighter" => spec.weight = FontWeight(300),
                other => match other.parse::<u16>() {
                    Ok(w) if (1..=1000).contains(&w) => spec.weight = FontWeight(w),
                    _ => return Err(invalid("unknown font keyword")),
                },
            }
        }

        let family = tokens[size_index + 1..].join(" ");
        let family = family.trim();
        if family.is_empty() {
            return Err(invalid("missing font family"));
        }
        spec.family = family.to_string();

        Ok(spec)
    }

    /// First family of a comma-separated family list, unquoted
    pub fn primary_family(&self) -> &str {
        self.family
            .split(',')
            .next()
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
            .unwrap_or(&self.family)
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PX)
    }
}

impl FromStr for FontSpec {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            FontStyle::Normal => {}
            FontStyle::Italic => write!(f, "italic ")?,
            FontStyle::Oblique => write!(f, "oblique ")?,
        }
        if self.weight == FontWeight::BOLD {
            write!(f, "bold ")?;
        } else if self.weight != FontWeight::NORMAL {
            write!(f, "{} ", self.weight.0)?;
        }
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

impl TryFrom<String> for FontSpec {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for FontSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.size_px.is_finite() {
            return Err(ser::Error::custom(format!(
                "font size {} of '{}' cannot be serialized",
                self.size_px, self.family
            )));
        }
        serializer.collect_str(self)
    }
}

impl From<FontSpec> for String {
    fn from(font: FontSpec) -> Self {
        font.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_shorthand() {
        let font = FontSpec::parse("20px sans-serif").unwrap();
        assert_eq!(font.family, "sans-serif");
        assert_eq!(font.size_px, 20.0);
        assert_eq!(font.style, FontStyle::Normal);
        assert_eq!(font.weight, FontWeight::NORMAL);
    }

    #[test]
    fn test_keywords_and_line_height() {
        let font: FontSpec = "italic bold 12.5px/1.2 \"Helvetica Neue\", Arial".parse().unwrap();
        assert_eq!(font.size_px, 12.5);
        assert_eq!(font.style, FontStyle::Italic);
        assert!(font.weight.is_bold());
        assert_eq!(font.primary_family(), "Helvetica Neue");

        let font = FontSpec::parse("300 10px mono").unwrap();
        assert_eq!(font.weight, FontWeight(300));
    }

    #[test]
    fn test_missing_px_is_an_error() {
        assert!(matches!(FontSpec::parse("serif"), Err(WatermarkError::InvalidFont(_))));
        assert!(FontSpec::parse("12pt serif").is_err());
        assert!(FontSpec::parse("abcpx serif").is_err());
        assert!(FontSpec::parse("20px").is_err());
        assert!(FontSpec::parse("wobbly 20px serif").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(FontSpec::default().to_string(), "28px serif");

        let font = FontSpec::new("serif", 14.0)
            .with_style(FontStyle::Oblique)
            .with_weight(FontWeight::BOLD);
        assert_eq!(font.to_string(), "oblique bold 14px serif");
        assert_eq!(font.to_string().parse::<FontSpec>().unwrap(), font);
    }

    #[test]
    fn test_serde_as_string() {
        let font: FontSpec = serde_json::from_str("\"bold 16px monospace\"").unwrap();
        assert_eq!(font.size_px, 16.0);
        assert!(serde_json::from_str::<FontSpec>("\"monospace\"").is_err());
    }

    #[test]
    fn test_stretch_variant_and_unit_case() {
        let font = FontSpec::parse("condensed bold 12PX serif").unwrap();
        assert_eq!(font.size_px, 12.0);
        assert_eq!(font.weight, FontWeight::BOLD);
        assert_eq!(font.family, "serif");

        let font = FontSpec::parse("small-caps semi-expanded 10px mono").unwrap();
        assert_eq!(font, FontSpec::new("mono", 10.0));

        let font = FontSpec::parse("Italic 9Px/2 Arial").unwrap();
        assert_eq!(font.style, FontStyle::Italic);
        assert_eq!(font.size_px, 9.0);
    }

    #[test]
    fn test_non_finite_size_does_not_serialize() {
        let json = serde_json::to_string(&FontSpec::new("serif", 16.0)).unwrap();
        assert_eq!(json, "\"16px serif\"");

        assert!(serde_json::to_string(&FontSpec::new("serif", f64::NAN)).is_err());
        assert!(serde_json::to_string(&FontSpec::new("serif", f64::INFINITY)).is_err());
    }
}

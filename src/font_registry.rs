//! Font registry for text measurement and glyph outlines
//!
//! Fonts are registered under a family name as raw TTF/OTF bytes and
//! validated with ttf-parser on the way in. Lookups fall back to the
//! default family, and when no font data is available at all measurement
//! uses fixed proportions of the font size.
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use ttf_parser::{Face, GlyphId};

use crate::canvas::TextMetrics;
use crate::error::{WatermarkError, WatermarkResult};
use crate::font::FontSpec;

/// Average glyph advance as a fraction of the font size, used without font data
pub const APPROX_CHAR_WIDTH: f64 = 0.6;
pub const APPROX_ASCENT: f64 = 0.8;
pub const APPROX_DESCENT: f64 = 0.2;

const DEJAVU_PATHS: [&str; 3] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

/// Load TTF/OTF font from file path
pub fn load_font_file(path: impl AsRef<Path>) -> WatermarkResult<Vec<u8>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let mut font_data = Vec::new();
    file.read_to_end(&mut font_data)?;

    Face::parse(&font_data, 0).map_err(|e| {
        WatermarkError::FontError(format!("Invalid font file {}: {}", path.display(), e))
    })?;

    Ok(font_data)
}

/// Metrics estimated from the font size alone
pub fn approximate_metrics(text: &str, size_px: f64) -> TextMetrics {
    TextMetrics {
        width: text.chars().count() as f64 * size_px * APPROX_CHAR_WIDTH,
        ascent: size_px * APPROX_ASCENT,
        descent: size_px * APPROX_DESCENT,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    // Lowercased family name -> font bytes
    fonts: HashMap<String, Arc<Vec<u8>>>,
    default_family: Option<String>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library holding DejaVu Sans if it is installed in a usual location
    pub fn system_fallback() -> Self {
        let mut library = Self::new();
        for path in &DEJAVU_PATHS {
            if !Path::new(path).exists() {
                continue;
            }
            match library.load_file("DejaVu Sans", path) {
                Ok(()) => break,
                Err(e) => debug!("Skipping fallback font {}: {}", path, e),
            }
        }
        library
    }

    /// Register font bytes under `family`. The first registered family becomes the default.
    pub fn register(&mut self, family: &str, data: Vec<u8>) -> WatermarkResult<()> {
        Face::parse(&data, 0)
            .map_err(|e| WatermarkError::FontError(format!("Invalid font data for {}: {}", family, e)))?;

        let key = family.trim().to_lowercase();
        if self.default_family.is_none() {
            self.default_family = Some(key.clone());
        }
        self.fonts.insert(key, Arc::new(data));
        Ok(())
    }

    pub fn load_file(&mut self, family: &str, path: impl AsRef<Path>) -> WatermarkResult<()> {
        let data = load_font_file(path)?;
        self.register(family, data)
    }

    pub fn set_default_family(&mut self, family: &str) -> WatermarkResult<()> {
        let key = family.trim().to_lowercase();
        if !self.fonts.contains_key(&key) {
            return Err(WatermarkError::FontError(format!("Font family not registered: {}", family)));
        }
        self.default_family = Some(key);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(&family.trim().to_lowercase())
    }

    /// Font bytes for `font`: every family in its list is tried, then the default family
    pub fn resolve(&self, font: &FontSpec) -> Option<&[u8]> {
        font.family
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
            .find_map(|key| self.fonts.get(&key))
            .or_else(|| {
                self.default_family
                    .as_ref()
                    .and_then(|key| self.fonts.get(key))
            })
            .map(|data| data.as_slice())
    }

    pub fn face(&self, font: &FontSpec) -> Option<Face<'_>> {
        self.resolve(font).and_then(|data| Face::parse(data, 0).ok())
    }

    /// Measure `text` with real advances when font data is available
    pub fn measure(&self, font: &FontSpec, text: &str) -> TextMetrics {
        match self.face(font) {
            Some(face) => measure_with_face(&face, font.size_px, text),
            None => approximate_metrics(text, font.size_px),
        }
    }
}

/// Glyph for `ch`, falling back to .notdef
pub fn glyph_for(face: &Face<'_>, ch: char) -> GlyphId {
    face.glyph_index(ch).unwrap_or(GlyphId(0))
}

pub fn measure_with_face(face: &Face<'_>, size_px: f64, text: &str) -> TextMetrics {
    let scale = size_px / face.units_per_em() as f64;
    let advance: f64 = text
        .chars()
        .map(|ch| face.glyph_hor_advance(glyph_for(face, ch)).unwrap_or(0) as f64)
        .sum();

    TextMetrics {
        width: advance * scale,
        ascent: face.ascender() as f64 * scale,
        descent: -(face.descender() as f64) * scale,
    }
}

//! Error types for watermark rendering
//!
//! Placement itself never fails; errors come from the boundary adapters
//! (font shorthand, color strings, font files, JSON configuration) and from
//! surface construction.

use thiserror::Error;

/// Custom error type for watermark operations
#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("Invalid font: {0}")]
    InvalidFont(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Invalid surface: {0}")]
    InvalidSurface(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for watermark operations
pub type WatermarkResult<T> = Result<T, WatermarkError>;

/// Helper to convert serde_json errors
impl From<serde_json::Error> for WatermarkError {
    fn from(err: serde_json::Error) -> Self {
        WatermarkError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = WatermarkError::InvalidFont("serif".to_string());
        assert_eq!(err.to_string(), "Invalid font: serif");

        let err = WatermarkError::InvalidColor("#12".to_string());
        assert_eq!(err.to_string(), "Invalid color: #12");
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: WatermarkError = json_err.into();
        assert!(matches!(err, WatermarkError::Config(_)));
    }
}

//! Engine configuration.
//!
//! Every default the pipeline needs lives in [`EngineConfig`] and is passed
//! explicitly to the component that needs it: viewport width, page and text
//! colors, font size, fallback metrics, the largest buffer a page may
//! render to, and the scroll margin.

use std::fs;
use std::path::{Path, PathBuf};

use gob_css::{ApproximateFontMetrics, ColorValue, DEFAULT_FONT_SIZE_PX};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or validating an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The config is not valid JSON for [`EngineConfig`].
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    /// A color field holds something other than a hex or named color.
    #[error("invalid color '{value}' for {field}")]
    InvalidColor {
        /// The config field.
        field: &'static str,
        /// The rejected text.
        value: String,
    },
    /// A numeric field is zero, negative, or not finite.
    #[error("{field} must be a positive number, got {value}")]
    InvalidNumber {
        /// The config field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A page size limit is zero.
    #[error("{field} must be at least one pixel")]
    ZeroLimit {
        /// The config field.
        field: &'static str,
    },
}

/// Settings for loading, laying out, and rendering a page.
///
/// Deserialized from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewport width used when the caller does not give one.
    pub width: u32,
    /// Page background, as a hex or named CSS color.
    pub background: String,
    /// Color of text with no `color` property, as a hex or named CSS color.
    pub text_color: String,
    /// The medium font size in pixels; `em` on the root resolves against it.
    pub font_size: f32,
    /// Glyph advance as a multiple of font size, when no font is loaded.
    pub char_width_ratio: f32,
    /// Line height as a multiple of font size, when no font is loaded.
    pub line_height_ratio: f32,
    /// Regular font file. The system fonts are searched when unset.
    pub font_path: Option<PathBuf>,
    /// Bold font file.
    pub bold_font_path: Option<PathBuf>,
    /// Widest buffer a page renders to; wider layouts are cut off on the
    /// right.
    pub max_page_width: u32,
    /// Tallest buffer a page renders to; taller content is cut off at the
    /// bottom.
    pub max_page_height: u32,
    /// Distance kept from the bottom of the page when a scroll overshoots.
    pub scroll_margin: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            background: "white".to_string(),
            text_color: "black".to_string(),
            font_size: DEFAULT_FONT_SIZE_PX,
            char_width_ratio: ApproximateFontMetrics::DEFAULT_CHAR_WIDTH_RATIO,
            line_height_ratio: ApproximateFontMetrics::DEFAULT_LINE_HEIGHT_RATIO,
            font_path: None,
            bold_font_path: None,
            max_page_width: 4096,
            max_page_height: 16384,
            scroll_margin: 10,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and the validation
    /// errors of [`EngineConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check colors and numeric fields.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.render_config()?;
        for (field, value) in [
            ("font_size", self.font_size),
            ("char_width_ratio", self.char_width_ratio),
            ("line_height_ratio", self.line_height_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidNumber { field, value });
            }
        }
        for (field, limit) in [
            ("max_page_width", self.max_page_width),
            ("max_page_height", self.max_page_height),
        ] {
            if limit == 0 {
                return Err(ConfigError::ZeroLimit { field });
            }
        }
        Ok(())
    }

    /// The resolved colors the renderer paints with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColor`] if a color does not parse.
    pub fn render_config(&self) -> Result<RenderConfig, ConfigError> {
        Ok(RenderConfig {
            background: parse_color("background", &self.background)?,
            text_color: parse_color("text_color", &self.text_color)?,
        })
    }

    /// Metrics for laying out without a font.
    #[must_use]
    pub const fn approximate_metrics(&self) -> ApproximateFontMetrics {
        ApproximateFontMetrics::new(self.char_width_ratio, self.line_height_ratio)
    }

    /// The buffer size for a layout `width` × `height` pixels: each side
    /// rounded up, then capped at its limit. Non-finite or negative extents
    /// give zero.
    #[must_use]
    pub fn page_size(&self, width: f32, height: f32) -> (u32, u32) {
        (
            cap_pixels(width, self.max_page_width),
            cap_pixels(height, self.max_page_height),
        )
    }

    /// Clamp a requested scroll offset against a page `content_height`
    /// pixels tall.
    ///
    /// Negative offsets go to the top. An offset past the end of the page
    /// lands `scroll_margin` pixels above the end.
    #[must_use]
    pub fn clamp_scroll(&self, offset: i64, content_height: u32) -> u32 {
        if offset <= 0 {
            return 0;
        }
        match u32::try_from(offset) {
            Ok(offset) if offset <= content_height => offset,
            _ => content_height.saturating_sub(self.scroll_margin),
        }
    }
}

/// Colors the renderer needs before any style applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Fill for pixels no box paints.
    pub background: ColorValue,
    /// Text color for fragments without a `color`.
    pub text_color: ColorValue,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: ColorValue::WHITE,
            text_color: ColorValue::BLACK,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn cap_pixels(extent: f32, limit: u32) -> u32 {
    if !extent.is_finite() {
        return if extent > 0.0 { limit } else { 0 };
    }
    // `limit as f32` may round up past `limit`; `min` restores it.
    (extent.ceil().clamp(0.0, limit as f32) as u32).min(limit)
}

fn parse_color(field: &'static str, value: &str) -> Result<ColorValue, ConfigError> {
    let text = value.trim();
    let color = if text.starts_with('#') {
        ColorValue::from_hex(text)
    } else {
        ColorValue::from_named(text)
    };
    color.ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = EngineConfig::from_json(r##"{ "width": 640, "background": "#eee" }"##).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.scroll_margin, 10);
        assert_eq!(
            config.render_config().unwrap().background,
            ColorValue::rgb(0xee, 0xee, 0xee)
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "text_color": "blurple" }"#),
            Err(ConfigError::InvalidColor { field: "text_color", .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "font_size": 0 }"#),
            Err(ConfigError::InvalidNumber { field: "font_size", .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "max_page_height": 0 }"#),
            Err(ConfigError::ZeroLimit { field: "max_page_height" })
        ));
        assert!(matches!(
            EngineConfig::from_json("{ width: 3 }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_page_size_is_capped() {
        let config = EngineConfig {
            max_page_width: 100,
            max_page_height: 50,
            ..EngineConfig::default()
        };
        assert_eq!(config.page_size(20.5, 19.2), (21, 20));
        assert_eq!(config.page_size(1e9, 1e30), (100, 50));
        assert_eq!(config.page_size(f32::INFINITY, f32::NAN), (100, 0));
        assert_eq!(config.page_size(-3.0, 0.0), (0, 0));
    }

    #[test]
    fn test_clamp_scroll() {
        let config = EngineConfig::default();
        assert_eq!(config.clamp_scroll(-40, 500), 0);
        assert_eq!(config.clamp_scroll(120, 500), 120);
        assert_eq!(config.clamp_scroll(500, 500), 500);
        assert_eq!(config.clamp_scroll(501, 500), 490);
        assert_eq!(config.clamp_scroll(i64::MAX, 500), 490);
        assert_eq!(config.clamp_scroll(50, 4), 0);
    }
}

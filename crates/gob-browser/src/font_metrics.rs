//! Font loading and fontdue-backed text measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use gob_common::warning::warn_once;
use gob_css::{FontMetrics, TextStyle};
use thiserror::Error;

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Errors loading a font file.
#[derive(Debug, Error)]
pub enum FontError {
    /// The file could not be read.
    #[error("failed to read font '{}': {source}", path.display())]
    Io {
        /// The font file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// fontdue rejected the font data.
    #[error("failed to parse font '{}': {message}", path.display())]
    Parse {
        /// The font file.
        path: PathBuf,
        /// fontdue's description of the problem.
        message: &'static str,
    },
}

/// The faces text is measured and drawn with: a regular face and an
/// optional bold one. Bold text uses the regular face when there is no
/// bold face.
///
/// Measurement uses `Font::metrics()` (not `Font::rasterize()`) so no bitmaps
/// are generated during layout.
pub struct FontSet {
    regular: Font,
    bold: Option<Font>,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("regular", &self.regular.name())
            .field("bold", &self.bold.as_ref().map(Font::name))
            .finish()
    }
}

impl FontSet {
    /// Build a font set from faces that are already loaded.
    #[must_use]
    pub const fn new(regular: Font, bold: Option<Font>) -> Self {
        Self { regular, bold }
    }

    /// Load the regular face from `regular` and, if given, the bold face
    /// from `bold`.
    ///
    /// # Errors
    ///
    /// Returns [`FontError`] if either file cannot be read or parsed.
    pub fn load(regular: &Path, bold: Option<&Path>) -> Result<Self, FontError> {
        let regular = load_font(regular)?;
        let bold = bold.map(load_font).transpose()?;
        Ok(Self::new(regular, bold))
    }

    /// Search the usual system locations for a regular and a bold face.
    ///
    /// Returns `None`, with a warning, if no regular face is found.
    #[must_use]
    pub fn system() -> Option<Self> {
        let Some(regular) = first_loadable(FONT_SEARCH_PATHS) else {
            warn_once(
                "Renderer",
                &format!(
                    "no system font found (searched {}); text will not be drawn",
                    FONT_SEARCH_PATHS.join(", ")
                ),
            );
            return None;
        };
        Some(Self::new(regular, first_loadable(FONT_BOLD_SEARCH_PATHS)))
    }

    /// The face for regular or bold text.
    #[must_use]
    pub fn face(&self, bold: bool) -> &Font {
        if bold {
            self.bold.as_ref().unwrap_or(&self.regular)
        } else {
            &self.regular
        }
    }

    fn advance(font: &Font, text: &str, font_size: f32) -> f32 {
        // Sum per-character advance widths, matching the cursor advancement
        // of the renderer's text drawing.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| font.metrics(ch, font_size).advance_width)
            .sum()
    }
}

impl FontMetrics for FontSet {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        Self::advance(&self.regular, text, font_size)
    }

    fn line_height(&self, font_size: f32) -> f32 {
        // [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
        //
        // "We recommend a used value for 'normal' between 1.0 and 1.2."
        font_size * 1.2
    }

    fn styled_text_width(&self, text: &str, style: &TextStyle) -> f32 {
        Self::advance(self.face(style.is_bold()), text, style.font_size)
    }
}

fn load_font(path: &Path) -> Result<Font, FontError> {
    let data = fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(data, FontSettings::default()).map_err(|message| FontError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn first_loadable(paths: &[&str]) -> Option<Font> {
    paths.iter().find_map(|path| load_font(Path::new(path)).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_file_is_io_error() {
        let err = FontSet::load(Path::new("/nonexistent/gob-test-font.ttf"), None).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
        assert!(err.to_string().contains("gob-test-font.ttf"));
    }

    #[test]
    fn test_garbage_font_data_is_parse_error() {
        let path = std::env::temp_dir().join("gob-browser-not-a-font.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        let err = FontSet::load(&path, None).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, FontError::Parse { .. }));
    }
}

//! Page pipeline and software rendering for the gob engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Page Loading** - parse HTML, collect stylesheets, run the cascade
//! - **Reflow** - lay out and paint the styled document at any width
//! - **Software Rendering** - display list to an RGBA buffer via fontdue
//! - **Configuration** - [`EngineConfig`], loaded from JSON
//!
//! ```text
//! Unparsed → Parsed → Styled → Laid-out → Rendered
//!            └── Page::load ──┘└──── Page::render ────┘
//! ```
//!
//! A width change re-enters at layout: [`Page::render`] can be called any
//! number of times and never re-parses or re-cascades.
//!
//! # Not Implemented
//!
//! - Fetching linked stylesheets and images
//! - Italic faces (italic text is drawn upright)

pub mod config;
pub mod font_metrics;
pub mod renderer;

pub use gob_css as css;
pub use gob_dom as dom;
pub use gob_html as html;

pub use config::{ConfigError, EngineConfig, RenderConfig};
pub use font_metrics::{FontError, FontSet};
pub use renderer::{RenderBuffer, Renderer};

use std::fs;
use std::path::{Path, PathBuf};

use gob_common::warning::{clear_warnings, warn_once};
use gob_css::cascade::cascade;
use gob_css::{
    CascadeReport, FontMetrics, LayoutTree, Painter, Stylesheet, extract_style_content,
    layout_with_font_size, parse_stylesheet, usable_width,
};
use gob_dom::Document;
use gob_html::{HtmlError, parse_document};
use thiserror::Error;

/// Error type for page loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The HTML ended inside a tag.
    #[error(transparent)]
    Markup(#[from] HtmlError),
    /// An input file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The engine config is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The result of rendering a page at one width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The page had content and was painted.
    Painted(RenderBuffer),
    /// The document has no elements and no visible text; nothing was laid
    /// out.
    EmptyDocument {
        /// The width the page would have been rendered at.
        width: u32,
    },
}

impl RenderOutcome {
    /// The rendered buffer; zero rows tall for an empty document.
    #[must_use]
    pub fn into_buffer(self) -> RenderBuffer {
        match self {
            Self::Painted(buffer) => buffer,
            Self::EmptyDocument { width } => RenderBuffer::empty(width),
        }
    }

    /// Whether the document was empty.
    #[must_use]
    pub const fn is_empty_document(&self) -> bool {
        matches!(self, Self::EmptyDocument { .. })
    }
}

/// A parsed and styled document, ready to be rendered at any width.
#[derive(Debug)]
pub struct Page {
    document: Document,
    stylesheets: Vec<Stylesheet>,
    report: CascadeReport,
    config: EngineConfig,
    render_config: RenderConfig,
    fonts: Option<FontSet>,
}

impl Page {
    /// Load a page from HTML text and an external stylesheet, with the
    /// default config and no fonts.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Markup`] if the HTML ends inside a tag.
    pub fn load(html: &str, css: &str) -> Result<Self, LoadError> {
        Self::load_with_config(html, css, EngineConfig::default())
    }

    /// Load a page from bytes; invalid UTF-8 becomes U+FFFD.
    ///
    /// # Errors
    ///
    /// As [`Page::load_with_config`].
    pub fn load_bytes(html: &[u8], css: &[u8], config: EngineConfig) -> Result<Self, LoadError> {
        Self::load_with_config(
            &String::from_utf8_lossy(html),
            &String::from_utf8_lossy(css),
            config,
        )
    }

    /// Read the HTML file and optional stylesheet file, then load them.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if a file cannot be read, otherwise as
    /// [`Page::load_with_config`].
    pub fn load_files(
        html_path: &Path,
        css_path: Option<&Path>,
        config: EngineConfig,
    ) -> Result<Self, LoadError> {
        let html = read_file(html_path)?;
        let css = css_path.map(read_file).transpose()?.unwrap_or_default();
        Self::load_bytes(&html, &css, config)
    }

    /// Parse `html`, collect its stylesheets, and run the cascade.
    ///
    /// `css` is the external stylesheet. The text of the document's
    /// `<style>` elements is a second author sheet after it, so embedded
    /// rules win ties.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Config`] if `config` is invalid and
    /// [`LoadError::Markup`] if the HTML ends inside a tag.
    pub fn load_with_config(
        html: &str,
        css: &str,
        config: EngineConfig,
    ) -> Result<Self, LoadError> {
        clear_warnings();
        config.validate()?;
        let render_config = config.render_config()?;

        // STEP 1: Parse the document.
        let mut document = parse_document(html)?;

        // STEP 2: External sheet first, then embedded styles in document order.
        let stylesheets = vec![
            parse_stylesheet(css),
            parse_stylesheet(&extract_style_content(&document)),
        ];

        // STEP 3: Cascade once; every later render reuses the styles.
        let sheet_refs: Vec<&Stylesheet> = stylesheets.iter().collect();
        let report = cascade(&mut document, &sheet_refs);

        Ok(Self {
            document,
            stylesheets,
            report,
            config,
            render_config,
            fonts: None,
        })
    }

    /// Measure and draw text with `fonts` instead of approximate metrics.
    #[must_use]
    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// The styled document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The author stylesheets: external, then embedded.
    #[must_use]
    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    /// What the cascade applied.
    #[must_use]
    pub const fn cascade_report(&self) -> &CascadeReport {
        &self.report
    }

    /// The config the page was loaded with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lay the page out at `width` pixels.
    #[must_use]
    pub fn layout(&self, width: f32) -> LayoutTree {
        let approximate = self.config.approximate_metrics();
        let metrics: &dyn FontMetrics = match &self.fonts {
            Some(fonts) => fonts,
            None => &approximate,
        };
        layout_with_font_size(&self.document, width, metrics, self.config.font_size)
    }

    /// Lay out, paint and render the page at `width` pixels.
    ///
    /// Widths below one pixel are raised to one and widths above the
    /// config's `max_page_width` are lowered to it. The buffer is the
    /// layout width wide and the content height, rounded up, tall; content
    /// below `max_page_height` is cut off.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&self, width: i32) -> RenderOutcome {
        let requested = usable_width(width as f32);
        let limit = self.config.max_page_width as f32;
        if requested > limit {
            warn_once(
                "Renderer",
                &format!(
                    "width {requested} px exceeds the {limit} px limit; laid out at the limit"
                ),
            );
        }
        let width = requested.min(limit);

        if self.document.is_empty() {
            let (width, _) = self.config.page_size(width, 0.0);
            return RenderOutcome::EmptyDocument { width };
        }

        let tree = self.layout(width);
        let (buffer_width, buffer_height) = self.config.page_size(tree.width, tree.content_height);
        if tree.content_height.ceil() > buffer_height as f32 {
            warn_once(
                "Renderer",
                &format!(
                    "page is {} px tall, over the {buffer_height} px limit; clipped",
                    tree.content_height.ceil()
                ),
            );
        }

        let display_list = Painter::new().paint(&tree);
        let renderer = Renderer::new(self.render_config, self.fonts.as_ref());
        RenderOutcome::Painted(renderer.render(&display_list, buffer_width, buffer_height))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn assert_send<T: Send>() {}

    #[test]
    fn test_page_is_send() {
        assert_send::<Page>();
        assert_send::<RenderOutcome>();
    }

    #[test]
    fn test_embedded_styles_follow_external_sheet() {
        let page = Page::load(
            "<style>p { color: blue }</style><p>text</p>",
            "p { color: red } div { color: green }",
        )
        .unwrap();
        let p = page.document().find_first("p").unwrap();
        assert_eq!(p.style.get("color"), Some("blue"));
        assert_eq!(page.stylesheets().len(), 2);
        assert!(page.cascade_report().applied_any());
    }

    #[test]
    fn test_invalid_config_fails_load() {
        let config = EngineConfig {
            background: "nope".to_string(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            Page::load_with_config("<p>x</p>", "", config),
            Err(LoadError::Config(ConfigError::InvalidColor { .. }))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Page::load_files(
            Path::new("/nonexistent/gob/page.html"),
            None,
            EngineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("page.html"));
    }
}

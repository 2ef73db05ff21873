//! Software renderer.
//!
//! Executes a `DisplayList` to a pixel buffer using fontdue for text rasterization.
//!
//! # Architecture
//!
//! The renderer is the final stage in the pipeline:
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓        ↓
//!              DisplayList → Pixels
//! ```
//!
//! The renderer knows nothing about CSS, layout, or the DOM. It simply executes
//! drawing commands from the display list.

use std::path::Path;

use anyhow::{Context, Result};
use fontdue::Font;
use gob_common::warning::warn_once;
use gob_css::{ColorValue, DisplayCommand, DisplayList, Rect};
use image::{ImageBuffer, Rgba, RgbaImage, imageops};

use crate::config::RenderConfig;
use crate::font_metrics::FontSet;

/// A rendered page: an RGBA image as wide as the layout and as tall as its
/// content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBuffer {
    image: RgbaImage,
}

impl RenderBuffer {
    /// A buffer filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: ColorValue) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, to_rgba(background)),
        }
    }

    /// A buffer with no rows.
    #[must_use]
    pub fn empty(width: u32) -> Self {
        Self::new(width, 0, ColorValue::TRANSPARENT)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The pixel at (`x`, `y`), or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<ColorValue> {
        self.image.get_pixel_checked(x, y).map(|&Rgba([r, g, b, a])| ColorValue { r, g, b, a })
    }

    /// The rows a window `height` pixels tall shows when scrolled to
    /// `offset`. Rows past the end of the page are cut off, so the result may
    /// be shorter than `height`.
    #[must_use]
    pub fn viewport(&self, offset: u32, height: u32) -> Self {
        let top = offset.min(self.height());
        let rows = height.min(self.height() - top);
        Self {
            image: imageops::crop_imm(&self.image, 0, top, self.width(), rows).to_image(),
        }
    }

    /// The underlying image.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the buffer, returning the image.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Save the buffer to a file; the format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written, which
    /// includes buffers with no rows.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image
            .save(path)
            .with_context(|| format!("failed to save image to '{}'", path.display()))
    }
}

/// Software renderer that executes a display list to a pixel buffer.
///
/// The renderer is stateless with respect to CSS - it only knows how to
/// fill rectangles and draw text.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'f> {
    config: RenderConfig,
    fonts: Option<&'f FontSet>,
}

impl<'f> Renderer<'f> {
    /// A renderer painting with `config`, drawing text with `fonts` if given.
    #[must_use]
    pub const fn new(config: RenderConfig, fonts: Option<&'f FontSet>) -> Self {
        Self { config, fonts }
    }

    /// Execute a display list into a fresh `width` × `height` buffer.
    ///
    /// Commands are executed in order (back to front), which is the correct
    /// painting order established by the Painter. Anything drawn outside
    /// the buffer is clipped.
    #[must_use]
    pub fn render(&self, display_list: &DisplayList, width: u32, height: u32) -> RenderBuffer {
        let mut buffer = RenderBuffer::new(width, height, self.config.background);
        for command in display_list {
            self.execute_command(&mut buffer.image, command);
        }
        buffer
    }

    /// Execute a single display command.
    fn execute_command(&self, image: &mut RgbaImage, command: &DisplayCommand) {
        match command {
            DisplayCommand::Fill { area, color } => fill_rect(image, *area, *color),
            DisplayCommand::Text { slot, text, style } => {
                let Some(fonts) = self.fonts else {
                    warn_once("Renderer", "no font loaded; text is not drawn");
                    return;
                };
                let font = fonts.face(style.is_bold());
                let color = style.color.unwrap_or(self.config.text_color);
                draw_text(image, font, text, *slot, style.font_size, color);
            }
        }
    }
}

/// Fill a rectangle with the given color, blending if it is translucent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn fill_rect(image: &mut RgbaImage, area: Rect, color: ColorValue) {
    if color.is_transparent() {
        return;
    }
    // Clamp in float space before casting so huge or non-finite geometry
    // never produces a long loop. `as` maps NaN to zero.
    let clamp = |value: f32, max: u32| value.round().clamp(0.0, max as f32) as u32;
    let (x0, x1) = (clamp(area.x, image.width()), clamp(area.x + area.width, image.width()));
    let (y0, y1) = (clamp(area.y, image.height()), clamp(area.y + area.height, image.height()));

    let rgba = to_rgba(color);
    for py in y0..y1 {
        for px in x0..x1 {
            if color.a == 255 {
                image.put_pixel(px, py, rgba);
            } else {
                let bg = *image.get_pixel(px, py);
                image.put_pixel(px, py, alpha_blend(rgba, bg, color.a));
            }
        }
    }
}

/// Draw one text fragment in its line-height tall `slot`.
///
/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "Half the leading is added above A and the other half below D", so the
/// baseline sits half the leading plus the ascent below the line's top.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
fn draw_text(
    image: &mut RgbaImage,
    font: &Font,
    text: &str,
    slot: Rect,
    font_size: f32,
    color: ColorValue,
) {
    if !font_size.is_finite() || font_size <= 0.0 {
        return;
    }
    let baseline = font.horizontal_line_metrics(font_size).map_or(
        slot.y + font_size,
        |metrics| {
            let content_height = metrics.ascent - metrics.descent;
            slot.y + (slot.height - content_height) / 2.0 + metrics.ascent
        },
    );

    let (width, height) = (image.width() as i64, image.height() as i64);
    let rgba = to_rgba(color);
    let mut cursor_x = slot.x;

    for ch in text.chars().filter(|ch| !ch.is_control()) {
        let (metrics, bitmap) = font.rasterize(ch, font_size);

        // fontdue places the bitmap relative to the pen position on the
        // baseline; `ymin` is the offset of the bitmap's bottom edge.
        let glyph_x = cursor_x as i64 + i64::from(metrics.xmin);
        let glyph_y = baseline as i64 - i64::from(metrics.ymin) - metrics.height as i64;

        for (index, &alpha) in bitmap.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let px = glyph_x + (index % metrics.width) as i64;
            let py = glyph_y + (index / metrics.width) as i64;
            if (0..width).contains(&px) && (0..height).contains(&py) {
                let (px, py) = (px as u32, py as u32);
                let bg = *image.get_pixel(px, py);
                let coverage = (u16::from(alpha) * u16::from(color.a) / 255) as u8;
                image.put_pixel(px, py, alpha_blend(rgba, bg, coverage));
            }
        }

        cursor_x += metrics.advance_width;
    }
}

const fn to_rgba(color: ColorValue) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// Alpha blend a foreground color onto a background color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        bg[3].max(alpha),
    ])
}

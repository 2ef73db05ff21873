//! CSS Layout Engine
//!
//! This module implements the normal-flow part of the CSS Visual Formatting
//! Model: block boxes stacked vertically, inline content broken into lines.
//!
//! # Relevant Specifications
//!
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Box dimensions, rectangles, and edge sizes
//! - [`layout_box`] - Layout box types and the block layout algorithm
//! - [`inline`] - Inline formatting context with line box model
//!
//! # Not Implemented
//!
//! - Margin collapsing
//! - Floats, positioning, tables, flex and grid
//! - Padding and margins of inline elements
//! - `text-align`, `vertical-align`

pub mod box_model;
pub mod inline;
pub mod layout_box;

pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use inline::{
    ApproximateFontMetrics, FontMetrics, InlineItem, InlineLayout, LineBox, LineFragment,
    TextStyle,
};
pub use layout_box::{BoxType, LayoutBox};

use gob_dom::Document;
use serde::Serialize;

use crate::style::{DEFAULT_FONT_SIZE_PX, DisplayValue, UsedStyle};
use layout_box::BlockLayout;

/// Smallest width layout runs at. Zero, negative and non-finite widths are
/// raised to this.
pub const MIN_LAYOUT_WIDTH: f32 = 1.0;

/// The result of laying out a document at one width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutTree {
    /// The root element's box.
    pub root: LayoutBox,
    /// The width layout ran at.
    pub width: f32,
    /// Height of the laid-out content, the root's margin box.
    pub content_height: f32,
}

impl LayoutTree {
    /// Every line box, in document order.
    #[must_use]
    pub fn line_boxes(&self) -> Vec<&LineBox> {
        self.root.line_boxes()
    }

    /// The text of each line, words joined by single spaces.
    #[must_use]
    pub fn line_texts(&self) -> Vec<String> {
        self.line_boxes().into_iter().map(LineBox::text).collect()
    }

    /// Whether the tree has no line boxes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_boxes().is_empty()
    }
}

/// [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
///
/// Lay out a styled document in a viewport of `available_width` pixels.
///
/// The document must have been through the cascade; elements with an empty
/// style lay out as inline content. Each call starts from scratch, so
/// calls at different widths are independent.
#[must_use]
pub fn layout(document: &Document, available_width: f32, metrics: &dyn FontMetrics) -> LayoutTree {
    layout_with_font_size(document, available_width, metrics, DEFAULT_FONT_SIZE_PX)
}

/// Like [`layout`], with `font_size` as the medium font size the root
/// element inherits from.
#[must_use]
pub fn layout_with_font_size(
    document: &Document,
    available_width: f32,
    metrics: &dyn FontMetrics,
    font_size: f32,
) -> LayoutTree {
    let width = usable_width(available_width);
    let root_element = document.root();
    let initial = UsedStyle {
        font_size: if font_size.is_finite() && font_size > 0.0 {
            font_size
        } else {
            DEFAULT_FONT_SIZE_PX
        },
        ..UsedStyle::initial()
    };
    let mut style = UsedStyle::compute(&root_element.style, &initial);

    // [§ 2.7 Automatic Box Type Transformations](https://www.w3.org/TR/css-display-3/#transformations)
    //
    // "The root element's display type is always blockified."
    let root = if style.display == DisplayValue::None {
        LayoutBox::empty()
    } else {
        style.display = DisplayValue::Block;
        let engine = BlockLayout { metrics };
        engine.layout_block(
            root_element,
            &style,
            Rect {
                x: 0.0,
                y: 0.0,
                width,
                height: 0.0,
            },
        )
    };

    let content_height = root.dimensions.margin_box().height.max(0.0);
    LayoutTree {
        root,
        width,
        content_height,
    }
}

/// Clamp a requested width to something layout can work with.
#[must_use]
pub fn usable_width(available_width: f32) -> f32 {
    if available_width.is_finite() && available_width >= MIN_LAYOUT_WIDTH {
        available_width
    } else {
        MIN_LAYOUT_WIDTH
    }
}

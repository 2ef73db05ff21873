//! Rectangles and the areas of a laid-out box.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::Serialize;

/// An axis-aligned rectangle in page pixels, origin at the top left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// The y coordinate just below the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The x coordinate just right of the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// This rectangle grown outward by `edges` on each side.
    #[must_use]
    pub fn outset(self, edges: EdgeSizes) -> Self {
        Self {
            x: self.x - edges.left,
            y: self.y - edges.top,
            width: self.width + edges.horizontal(),
            height: self.height + edges.top + edges.bottom,
        }
    }
}

/// Per-side thickness of padding or margin. Margins may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeSizes {
    /// Top side.
    pub top: f32,
    /// Right side.
    pub right: f32,
    /// Bottom side.
    pub bottom: f32,
    /// Left side.
    pub left: f32,
}

impl EdgeSizes {
    /// Left plus right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// Where layout put a box: its content rectangle plus the padding and
/// margin around it. Borders are never drawn, so the border edge is the
/// padding edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxDimensions {
    /// The content rectangle in absolute coordinates.
    pub content: Rect,
    /// Padding around the content.
    pub padding: EdgeSizes,
    /// Margin around the padding.
    pub margin: EdgeSizes,
}

impl BoxDimensions {
    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings): the area
    /// a background covers.
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content.outset(self.padding)
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins): the space
    /// the box takes up in its parent's flow.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.padding_box().outset(self.margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even(size: f32) -> EdgeSizes {
        EdgeSizes {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    #[test]
    fn test_boxes_expand_outward() {
        let dims = BoxDimensions {
            content: Rect {
                x: 15.0,
                y: 20.0,
                width: 100.0,
                height: 50.0,
            },
            padding: even(5.0),
            margin: EdgeSizes {
                right: 0.0,
                ..even(10.0)
            },
        };
        let padding = dims.padding_box();
        assert_eq!(
            (padding.x, padding.y, padding.width, padding.height),
            (10.0, 15.0, 110.0, 60.0)
        );
        let margin = dims.margin_box();
        assert_eq!((margin.x, margin.y, margin.width, margin.height), (0.0, 5.0, 120.0, 80.0));
        assert_eq!(margin.bottom(), 85.0);
    }

    #[test]
    fn test_negative_margin_shrinks_margin_box() {
        let dims = BoxDimensions {
            content: Rect {
                height: 40.0,
                ..Rect::default()
            },
            margin: EdgeSizes {
                bottom: -10.0,
                ..EdgeSizes::default()
            },
            ..BoxDimensions::default()
        };
        assert_eq!(dims.margin_box().height, 30.0);
    }
}

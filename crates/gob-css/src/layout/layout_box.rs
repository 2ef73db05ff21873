//! Layout boxes and the block layout algorithm.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! Boxes are generated and laid out in one recursive pass over the styled
//! document: each block-level element becomes a [`LayoutBox`] whose position
//! is known as soon as it is created, and whose height is known once its
//! children are done.

use gob_dom::{Element, Node};
use serde::Serialize;

use super::box_model::{BoxDimensions, EdgeSizes, Rect};
use super::inline::{FontMetrics, InlineItem, InlineLayout, LineBox, TextStyle, total_height};
use crate::style::{AutoLength, ColorValue, DisplayValue, LengthValue, UsedStyle};

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// "The following sections describe the types of boxes that may be generated
/// in CSS 2.1. A box's type affects, in part, its behavior in the visual
/// formatting model."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxType {
    /// [§ 9.2 Principal box](https://www.w3.org/TR/css-display-3/#principal-box)
    ///
    /// "Most elements generate a single principal box."
    Block {
        /// Tag name of the generating element.
        tag_name: String,
    },

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "In a document like this: `<div>`Some text`<p>`More text`</p></div>`
    /// ...the 'Some text' part generates an anonymous block box."
    AnonymousBlock,
}

/// A node in the layout tree.
///
/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// A block container holds either block-level children or line boxes, never
/// both: inline content next to blocks is wrapped in anonymous blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    /// The type of box (principal or anonymous block)
    pub box_type: BoxType,

    /// The used dimensions of this box, in page coordinates.
    pub dimensions: BoxDimensions,

    /// [§ 3.2 background-color](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    pub background_color: ColorValue,

    /// Block-level child boxes.
    pub children: Vec<LayoutBox>,

    /// Line boxes of an inline formatting context.
    pub lines: Vec<LineBox>,
}

impl LayoutBox {
    /// A zero-sized anonymous box with no content.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            box_type: BoxType::AnonymousBlock,
            dimensions: BoxDimensions {
                content: Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 0.0,
                    height: 0.0,
                },
                padding: EdgeSizes {
                    top: 0.0,
                    right: 0.0,
                    bottom: 0.0,
                    left: 0.0,
                },
                margin: EdgeSizes {
                    top: 0.0,
                    right: 0.0,
                    bottom: 0.0,
                    left: 0.0,
                },
            },
            background_color: ColorValue::TRANSPARENT,
            children: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Tag name of the generating element, `None` for anonymous boxes.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match &self.box_type {
            BoxType::Block { tag_name } => Some(tag_name),
            BoxType::AnonymousBlock => None,
        }
    }

    /// This box and all its descendants, in pre-order.
    #[must_use]
    pub fn boxes(&self) -> Vec<&Self> {
        let mut boxes = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            boxes.push(current);
            stack.extend(current.children.iter().rev());
        }
        boxes
    }

    /// Every line box in this subtree, in document order.
    #[must_use]
    pub fn line_boxes(&self) -> Vec<&LineBox> {
        self.boxes()
            .into_iter()
            .flat_map(|layout_box| &layout_box.lines)
            .collect()
    }
}

/// Lays out styled elements with a given font.
pub(crate) struct BlockLayout<'m> {
    pub(crate) metrics: &'m dyn FontMetrics,
}

/// A child node sorted by how it participates in its parent's layout.
enum Child<'d> {
    Block(&'d Element, UsedStyle),
    InlineElement(&'d Element, UsedStyle),
    Text(&'d str),
}

impl BlockLayout<'_> {
    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// Lay out a block-level element whose margin box starts at the top-left
    /// corner of `containing`, spanning its width.
    pub(crate) fn layout_block(
        &self,
        element: &Element,
        style: &UsedStyle,
        containing: Rect,
    ) -> LayoutBox {
        let font_size = style.font_size;
        let cb_width = containing.width;

        // STEP 1: Resolve paddings and vertical margins.
        // [§ 8.3](https://www.w3.org/TR/CSS2/box.html#margin-properties)
        // "The percentage is calculated with respect to the width of the
        // generated box's containing block. Note that this is true for
        // 'margin-top' and 'margin-bottom' as well."
        let padding = EdgeSizes {
            top: style.padding.top.to_px(font_size, cb_width).max(0.0),
            right: style.padding.right.to_px(font_size, cb_width).max(0.0),
            bottom: style.padding.bottom.to_px(font_size, cb_width).max(0.0),
            left: style.padding.left.to_px(font_size, cb_width).max(0.0),
        };
        let margin_top = style.margin.top.to_px(font_size, cb_width).unwrap_or(0.0);
        let margin_bottom = style.margin.bottom.to_px(font_size, cb_width).unwrap_or(0.0);

        // STEP 2: Width and horizontal margins.
        let (width, margin_left, margin_right) =
            Self::block_width(style, cb_width, padding.horizontal());

        // STEP 3: Position the content box below the containing cursor.
        let mut content = Rect {
            x: containing.x + margin_left + padding.left,
            y: containing.y + margin_top + padding.top,
            width,
            height: 0.0,
        };

        // STEP 4: Lay out the contents.
        let (children, lines, content_height) = self.layout_contents(element, style, content);

        // STEP 5: Height.
        // [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
        //
        // "If 'height' is 'auto', the height depends on whether the element has
        // any block-level children..." A percentage height against an
        // auto-height containing block computes to 'auto'.
        content.height = match style.height {
            AutoLength::Length(LengthValue::Percent(_)) | AutoLength::Auto => content_height,
            AutoLength::Length(length) => length.to_px(font_size, 0.0).max(0.0),
        };

        LayoutBox {
            box_type: BoxType::Block {
                tag_name: element.tag_name.clone(),
            },
            dimensions: BoxDimensions {
                content,
                padding,
                margin: EdgeSizes {
                    top: margin_top,
                    right: margin_right,
                    bottom: margin_bottom,
                    left: margin_left,
                },
            },
            background_color: style.background_color,
            children,
            lines,
        }
    }

    /// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "The following constraints must hold among the used values of the
    /// other properties:
    ///
    ///   'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    ///   'padding-right' + 'border-right-width' + 'margin-right'
    ///   = width of containing block"
    ///
    /// An explicit width never exceeds the room left by the non-auto margins
    /// and the paddings. Returns `(width, margin_left, margin_right)`.
    fn block_width(style: &UsedStyle, cb_width: f32, padding: f32) -> (f32, f32, f32) {
        let font_size = style.font_size;
        let margin_left = style.margin.left.to_px(font_size, cb_width);
        let margin_right = style.margin.right.to_px(font_size, cb_width);
        let available = (cb_width
            - margin_left.unwrap_or(0.0)
            - margin_right.unwrap_or(0.0)
            - padding)
            .max(0.0);

        // RULE A: "If 'width' is set to 'auto', any other 'auto' values become
        //         '0' and 'width' follows from the resulting equality."
        let Some(width) = style.width.to_px(font_size, cb_width) else {
            return (
                available,
                margin_left.unwrap_or(0.0),
                margin_right.unwrap_or(0.0),
            );
        };
        let width = width.clamp(0.0, available);
        let remaining = cb_width - width - padding;

        match (margin_left, margin_right) {
            // RULE B: "If both 'margin-left' and 'margin-right' are 'auto', their
            //         used values are equal. This horizontally centers the element
            //         with respect to the edges of the containing block."
            (None, None) => {
                let half = (remaining / 2.0).max(0.0);
                (width, half, half)
            }
            // RULE C: "If there is exactly one value specified as 'auto', its used
            //         value follows from the equality."
            (None, Some(right)) => (width, (remaining - right).max(0.0), right),
            // RULE D: Over-constrained, or only 'margin-right' is auto: "the
            //         specified value of 'margin-right' is ignored and the value
            //         is calculated so as to make the equality true."
            (Some(left), _) => (width, left, remaining - left),
        }
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "In a block formatting context, boxes are laid out one after the
    /// other, vertically, beginning at the top of a containing block."
    ///
    /// Returns the child boxes, the line boxes, and the content height.
    fn layout_contents(
        &self,
        element: &Element,
        style: &UsedStyle,
        content: Rect,
    ) -> (Vec<LayoutBox>, Vec<LineBox>, f32) {
        let children = Self::classify_children(element, style);

        // STEP 1: Only inline-level children: one inline formatting context.
        if !children.iter().any(|child| matches!(child, Child::Block(..))) {
            let mut items = Vec::new();
            for child in &children {
                self.collect_child(child, style, ColorValue::TRANSPARENT, &mut items);
            }
            let lines = self.layout_lines(&items, content);
            let height = total_height(&lines);
            return (Vec::new(), lines, height);
        }

        // STEP 2: Mixed content. "If a block container box has a block-level
        // box inside it, then we force it to have only block-level boxes
        // inside it." Inline runs are wrapped in anonymous blocks; runs that
        // are only collapsible white space generate nothing.
        let mut boxes = Vec::new();
        let mut cursor = content.y;
        let mut run: Vec<InlineItem> = Vec::new();

        for child in &children {
            if let Child::Block(child_element, child_style) = child {
                self.flush_anonymous(&mut run, content, &mut cursor, &mut boxes);
                let child_box = self.layout_block(
                    child_element,
                    child_style,
                    Rect {
                        y: cursor,
                        height: 0.0,
                        ..content
                    },
                );
                cursor += child_box.dimensions.margin_box().height;
                boxes.push(child_box);
            } else {
                self.collect_child(child, style, ColorValue::TRANSPARENT, &mut run);
            }
        }
        self.flush_anonymous(&mut run, content, &mut cursor, &mut boxes);

        (boxes, Vec::new(), cursor - content.y)
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    fn flush_anonymous(
        &self,
        run: &mut Vec<InlineItem>,
        content: Rect,
        cursor: &mut f32,
        boxes: &mut Vec<LayoutBox>,
    ) {
        let items = std::mem::take(run);
        if items.iter().all(InlineItem::is_collapsible) {
            return;
        }
        let area = Rect {
            y: *cursor,
            height: 0.0,
            ..content
        };
        let lines = self.layout_lines(&items, area);
        let height = total_height(&lines);
        *cursor += height;
        boxes.push(LayoutBox {
            box_type: BoxType::AnonymousBlock,
            dimensions: BoxDimensions {
                content: Rect { height, ..area },
                ..BoxDimensions::default()
            },
            background_color: ColorValue::TRANSPARENT,
            children: Vec::new(),
            lines,
        });
    }

    fn layout_lines(&self, items: &[InlineItem], area: Rect) -> Vec<LineBox> {
        if items.iter().all(InlineItem::is_collapsible) {
            return Vec::new();
        }
        InlineLayout::new(self.metrics, area.x, area.y, area.width).run(items)
    }

    /// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
    ///
    /// Compute each child element's style and sort the children into block-
    /// and inline-level. "display: none" children generate nothing.
    fn classify_children<'d>(element: &'d Element, style: &UsedStyle) -> Vec<Child<'d>> {
        element
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(Child::Text(text)),
                Node::Element(child) => {
                    let child_style = UsedStyle::compute(&child.style, style);
                    match child_style.display {
                        DisplayValue::None => None,
                        DisplayValue::Block => Some(Child::Block(child, child_style)),
                        DisplayValue::Inline => Some(Child::InlineElement(child, child_style)),
                    }
                }
            })
            .collect()
    }

    /// Flatten one inline-level child into `items`.
    ///
    /// `parent_style` is the style text directly inside the child inherits.
    fn collect_child(
        &self,
        child: &Child<'_>,
        parent_style: &UsedStyle,
        background: ColorValue,
        items: &mut Vec<InlineItem>,
    ) {
        match child {
            Child::Text(text) => items.push(InlineItem::Text {
                text: (*text).to_string(),
                style: TextStyle::from_used(parent_style),
                white_space: parent_style.white_space,
                line_height: self.line_height(parent_style),
                background,
            }),
            Child::InlineElement(element, style) => {
                self.collect_inline_element(element, style, background, items);
            }
            Child::Block(element, style) => {
                // A block inside inline content: its contents go on their own
                // lines.
                items.push(InlineItem::BlockBoundary);
                self.collect_inline_element(element, style, background, items);
                items.push(InlineItem::BlockBoundary);
            }
        }
    }

    /// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    fn collect_inline_element(
        &self,
        element: &Element,
        style: &UsedStyle,
        background: ColorValue,
        items: &mut Vec<InlineItem>,
    ) {
        if element.tag_name == "br" {
            items.push(InlineItem::LineBreak {
                line_height: self.line_height(style),
            });
            return;
        }
        let background = if style.background_color.is_transparent() {
            background
        } else {
            style.background_color
        };
        for child in Self::classify_children(element, style) {
            self.collect_child(&child, style, background, items);
        }
    }

    fn line_height(&self, style: &UsedStyle) -> f32 {
        style
            .line_height_px(self.metrics.line_height(style.font_size))
            .max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ApproximateFontMetrics;
    use gob_dom::ComputedStyle;

    fn styled(pairs: &[(&str, &str)]) -> UsedStyle {
        let mut computed = ComputedStyle::new();
        computed.set("display", "block");
        for (property, value) in pairs {
            computed.set(property, value);
        }
        UsedStyle::compute(&computed, &UsedStyle::initial())
    }

    fn widths(pairs: &[(&str, &str)], cb_width: f32) -> (f32, f32, f32) {
        BlockLayout::block_width(&styled(pairs), cb_width, 0.0)
    }

    #[test]
    fn test_auto_width_fills_containing_block() {
        assert_eq!(widths(&[("margin-left", "10px")], 100.0), (90.0, 10.0, 0.0));
        assert_eq!(widths(&[("margin-left", "150px")], 100.0), (0.0, 150.0, 0.0));
    }

    #[test]
    fn test_auto_margins_center_explicit_width() {
        assert_eq!(
            widths(
                &[("width", "50px"), ("margin-left", "auto"), ("margin-right", "auto")],
                100.0
            ),
            (50.0, 25.0, 25.0)
        );
        assert_eq!(
            widths(&[("width", "50px"), ("margin-left", "auto")], 100.0),
            (50.0, 50.0, 0.0)
        );
    }

    #[test]
    fn test_explicit_width_is_capped() {
        assert_eq!(widths(&[("width", "500px")], 100.0), (100.0, 0.0, 0.0));
        assert_eq!(widths(&[("width", "50%")], 300.0), (150.0, 0.0, 150.0));
    }

    #[test]
    fn test_block_padding_and_explicit_height() {
        let metrics = ApproximateFontMetrics::default();
        let engine = BlockLayout { metrics: &metrics };
        let element = Element::new("div");
        let style = styled(&[
            ("padding-top", "5px"),
            ("padding-right", "5px"),
            ("padding-bottom", "5px"),
            ("padding-left", "5px"),
            ("height", "40px"),
            ("margin-top", "3px"),
        ]);
        let laid_out = engine.layout_block(
            &element,
            &style,
            Rect {
                x: 0.0,
                y: 10.0,
                width: 200.0,
                height: 0.0,
            },
        );
        let content = laid_out.dimensions.content;
        assert_eq!((content.x, content.y, content.width, content.height), (5.0, 18.0, 190.0, 40.0));
        assert_eq!(laid_out.dimensions.margin_box().height, 53.0);
        assert_eq!(laid_out.tag_name(), Some("div"));
    }
}

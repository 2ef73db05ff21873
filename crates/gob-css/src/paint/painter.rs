//! Painter - generates display list from layout tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! The painter walks the layout tree and generates drawing commands in the
//! correct painting order (back to front).

use crate::layout::{LayoutBox, LayoutTree, LineBox};

use super::{DisplayCommand, DisplayList};

/// Painter that generates a display list from a layout tree.
///
/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Everything is in normal flow with no positioning, so painting order is
/// document order: a box's background, then its line contents, then its
/// block children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Painter;

impl Painter {
    /// Create a painter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Paint a layout tree and return the display list.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    #[must_use]
    pub fn paint(&self, tree: &LayoutTree) -> DisplayList {
        let mut display_list = DisplayList::new();
        self.paint_box(&tree.root, &mut display_list);
        display_list
    }

    /// Paint a single layout box and its descendants.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// For each box, the following layers are painted in order:
    /// 1. Background color
    /// 2. Inline content: inline backgrounds, then text
    /// 3. Descendants (in tree order for non-positioned, non-floated elements)
    fn paint_box(&self, layout_box: &LayoutBox, display_list: &mut DisplayList) {
        // [CSS 2.1 Appendix E.2 Step 2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
        // "the background color of the element"
        //
        // [CSS Backgrounds § 3.7](https://www.w3.org/TR/css-backgrounds-3/#background-painting-area)
        // Without borders the border box is the padding box.
        if !layout_box.background_color.is_transparent() {
            display_list.push(DisplayCommand::Fill {
                area: layout_box.dimensions.padding_box(),
                color: layout_box.background_color,
            });
        }

        // [CSS 2.1 Appendix E.2 Step 7](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
        // "the element's text"
        for line in &layout_box.lines {
            Self::paint_line(line, display_list);
        }

        // [CSS 2.1 Appendix E.2 Step 4](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
        // "the in-flow, non-inline-level, non-positioned descendants"
        for child in &layout_box.children {
            self.paint_box(child, display_list);
        }
    }

    /// [CSS 2.1 Appendix E.2 Step 7.2.1](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// "For each inline-level element: background color, then text." All
    /// backgrounds of the line go first so a neighbour's background never
    /// covers text.
    fn paint_line(line: &LineBox, display_list: &mut DisplayList) {
        let backgrounds = line
            .fragments
            .iter()
            .filter(|fragment| !fragment.background.is_transparent())
            .map(|fragment| DisplayCommand::Fill {
                area: fragment.bounds,
                color: fragment.background,
            });
        let texts = line.fragments.iter().map(|fragment| DisplayCommand::Text {
            slot: fragment.bounds,
            text: fragment.text.clone(),
            style: fragment.style.clone(),
        });
        for command in backgrounds.chain(texts) {
            display_list.push(command);
        }
    }
}

//! CSS tokenizer, parser, selector matching, cascade, layout, and painting for the gob engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - Ident, function, at-keyword, hash, string, number, dimension and percentage tokens
//!   - Comment handling
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules; at-rules are consumed and dropped
//!   - Declaration lists with `!important`
//!   - Error recovery: a bad declaration is skipped, its rule is kept
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute selectors
//!   - Compound selectors and selector lists
//!   - Specificity calculation
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - User-agent and author origins, `!important`
//!   - Style attributes
//!   - Shorthand expansion (margin, padding, background)
//!
//! - **Layout** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block boxes, anonymous block boxes, line boxes
//!   - Greedy line breaking with `white-space`
//!
//! - **Painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Backgrounds and text in document order
//!
//! # Not Implemented
//!
//! - Combinators and pseudo-classes (rules using them are dropped)
//! - Media queries and `@import`
//! - Borders, floats, positioning, tables, flex and grid
//! - Margin collapsing

/// CSS cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box model and normal-flow layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Property values and the used style layout reads.
pub mod style;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

// Re-exports for convenience
pub use cascade::{
    CascadeReport, ElementMatches, MatchedRule, Origin, apply_matches, cascade, collect_matches,
};
pub use layout::{
    ApproximateFontMetrics, BoxDimensions, BoxType, EdgeSizes, FontMetrics, LayoutBox,
    LayoutTree, LineBox, LineFragment, Rect, TextStyle, layout, layout_with_font_size,
    usable_width,
};
pub use paint::{DisplayCommand, DisplayList, Painter};
pub use parser::{ComponentValue, Declaration, StyleRule, Stylesheet};
pub use selector::{Selector, Specificity, parse_selector};
pub use style::{
    AutoLength, ColorValue, DEFAULT_FONT_SIZE_PX, DisplayValue, FontStyle, LengthValue,
    UsedStyle, WhiteSpace,
};
pub use tokenizer::{Token, Tokenizer};
pub use ua_stylesheet::ua_stylesheet;

use gob_dom::{Document, Element, Node};

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// Tokenize and parse stylesheet text. Parsing never fails; anything that
/// cannot be understood is dropped with a warning.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    Stylesheet::parse(css)
}

/// [§ 3.2 Input Byte Stream](https://www.w3.org/TR/css-syntax-3/#input-byte-stream)
///
/// Parse stylesheet bytes as UTF-8; invalid sequences become U+FFFD.
#[must_use]
pub fn parse_stylesheet_bytes(bytes: &[u8]) -> Stylesheet {
    parse_stylesheet(&String::from_utf8_lossy(bytes))
}

/// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
///
/// Parse the contents of a `style` attribute. Invalid declarations are
/// skipped.
#[must_use]
pub fn parse_declaration_block(css: &str) -> Vec<Declaration> {
    parser::parse_declarations(&parser::parse_component_values(css))
}

/// [HTML Standard § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Extract CSS text from all `<style>` elements in the document, in
/// document order.
#[must_use]
pub fn extract_style_content(document: &Document) -> String {
    let mut css = String::new();
    for element in document
        .elements()
        .filter(|element| element.tag_name.eq_ignore_ascii_case("style"))
    {
        collect_text(element, &mut css);
    }
    css
}

fn collect_text(style: &Element, css: &mut String) {
    for child in &style.children {
        if let Node::Text(text) = child {
            css.push_str(text);
            css.push('\n');
        }
    }
}

//! Turns a layout tree into a [`DisplayList`].
//!
//! Painting order follows [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//! for the cases gob produces: a block's background, then its lines, then
//! its block children, in tree order. Nothing is positioned or floated, so
//! there are no stacking contexts.

mod display_list;
mod painter;

pub use display_list::{DisplayCommand, DisplayList};
pub use painter::Painter;

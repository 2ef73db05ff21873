//! CSS parser module.

/// Rule and declaration parsing per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod css_parser;

pub use css_parser::{
    ComponentValue, Declaration, StyleRule, Stylesheet, parse_component_values,
    parse_declarations, parse_rules,
};

//! Keyword-valued properties: `display`, `white-space` and `font-style`.

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
///
/// "The display property defines an element's display type, which consists of
/// the two basic qualities of how an element generates boxes."
///
/// Only the outer display type matters here: every block-level keyword
/// establishes a block container and every inline-level keyword flows its
/// content into the parent's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DisplayValue {
    /// [§ 2.1](https://www.w3.org/TR/css-display-3/#valdef-display-block)
    /// "The element generates a box that is block-level when placed in flow layout."
    #[strum(to_string = "block", serialize = "list-item", serialize = "flow-root")]
    Block,
    /// [§ 2.1](https://www.w3.org/TR/css-display-3/#valdef-display-inline)
    /// "The element generates a box that is inline-level when placed in flow layout."
    ///
    /// [Initial value](https://www.w3.org/TR/css-display-3/#the-display-properties): inline
    #[default]
    #[strum(to_string = "inline", serialize = "inline-block")]
    Inline,
    /// [§ 2.7 Box Suppression](https://www.w3.org/TR/css-display-3/#box-suppress)
    /// "The element and its descendants generate no boxes or text sequences."
    None,
}

/// [§ 3 White Space and Wrapping: the white-space property](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WhiteSpace {
    /// "This value directs user agents to collapse sequences of white space
    /// into a single character. Lines may wrap at allowed soft wrap opportunities."
    #[default]
    Normal,
    /// "This value prevents user agents from collapsing sequences of white
    /// space. Lines are only broken at preserved newline characters."
    Pre,
    /// "Like normal, this value collapses white space; but like pre, it does
    /// not allow wrapping."
    Nowrap,
}

impl WhiteSpace {
    /// Whether runs of spaces and newlines collapse to a single space.
    #[must_use]
    pub const fn collapses(self) -> bool {
        !matches!(self, Self::Pre)
    }

    /// Whether lines may break at soft wrap opportunities.
    #[must_use]
    pub const fn wraps(self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// [§ 3.3 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// "Matches against a face that is classified as a normal face"
    #[default]
    Normal,
    /// "Matches against a font that is labeled as an italic face, or an
    /// oblique face if one is lacking." Oblique is treated the same way.
    #[strum(to_string = "italic", serialize = "oblique")]
    Italic,
}

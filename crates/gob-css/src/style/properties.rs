//! Supported properties, value validation, and shorthand expansion.
//!
//! [CSS Cascading § 1.2 Shorthand Properties](https://www.w3.org/TR/css-cascade-4/#shorthand)
//!
//! "Some properties are shorthand properties, meaning that they allow authors
//! to specify the values of several properties with a single property."
//!
//! A declaration is checked here once, when it is parsed. The cascade expands
//! it again when folding, which cannot fail for a declaration that passed.

use thiserror::Error;

use super::display::{DisplayValue, FontStyle, WhiteSpace};
use super::values::{
    AutoLength, DEFAULT_FONT_SIZE_PX, LineHeight, parse_font_size, parse_font_weight,
    parse_single_auto_length, parse_single_color, parse_single_length, significant,
};
use crate::parser::{ComponentValue, parse_component_values};
use crate::tokenizer::Token;

/// Why a declaration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// The property is not one the engine knows.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    /// The value does not match the property's grammar.
    #[error("invalid value '{value}' for '{property}'")]
    InvalidValue {
        /// Property name.
        property: String,
        /// Offending value text.
        value: String,
    },
}

/// The grammar a longhand property accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Display,
    Color,
    FontSize,
    FontWeight,
    FontStyle,
    LineHeight,
    WhiteSpace,
    /// `<length-percentage> | auto`, negative allowed
    Margin,
    /// `<length-percentage [0,∞]>`
    Padding,
    /// `<length-percentage [0,∞]> | auto`
    Size,
}

/// Longhand properties with their grammar and whether they inherit.
///
/// [CSS Cascading § 7.2 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
const LONGHANDS: &[(&str, ValueKind, bool)] = &[
    ("display", ValueKind::Display, false),
    ("color", ValueKind::Color, true),
    ("background-color", ValueKind::Color, false),
    ("font-size", ValueKind::FontSize, true),
    ("font-weight", ValueKind::FontWeight, true),
    ("font-style", ValueKind::FontStyle, true),
    ("line-height", ValueKind::LineHeight, true),
    ("white-space", ValueKind::WhiteSpace, true),
    ("margin-top", ValueKind::Margin, false),
    ("margin-right", ValueKind::Margin, false),
    ("margin-bottom", ValueKind::Margin, false),
    ("margin-left", ValueKind::Margin, false),
    ("padding-top", ValueKind::Padding, false),
    ("padding-right", ValueKind::Padding, false),
    ("padding-bottom", ValueKind::Padding, false),
    ("padding-left", ValueKind::Padding, false),
    ("width", ValueKind::Size, false),
    ("height", ValueKind::Size, false),
];

/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
const MARGIN_SIDES: [&str; 4] = ["margin-top", "margin-right", "margin-bottom", "margin-left"];
/// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
const PADDING_SIDES: [&str; 4] = ["padding-top", "padding-right", "padding-bottom", "padding-left"];

/// [CSS Cascading § 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
const CSS_WIDE_KEYWORDS: [&str; 3] = ["inherit", "initial", "unset"];

/// Whether the property inherits by default.
#[must_use]
pub fn is_inherited(property: &str) -> bool {
    LONGHANDS
        .iter()
        .any(|&(name, _, inherited)| name == property && inherited)
}

/// Whether the engine supports the property, as a longhand or a shorthand.
#[must_use]
pub fn is_supported(property: &str) -> bool {
    matches!(property, "margin" | "padding" | "background")
        || LONGHANDS.iter().any(|&(name, _, _)| name == property)
}

/// Check a declaration without expanding it.
///
/// # Errors
///
/// Returns [`DeclarationError`] for an unknown property or a value the
/// property does not accept.
pub fn validate_declaration(property: &str, value: &str) -> Result<(), DeclarationError> {
    expand_declaration(property, value).map(|_| ())
}

/// Expand a declaration into `(longhand, value)` pairs.
///
/// Longhands expand to themselves. `margin` and `padding` follow the
/// one-to-four value rule; `background` sets `background-color`.
///
/// # Errors
///
/// Returns [`DeclarationError`] for an unknown property or a value the
/// property does not accept.
pub fn expand_declaration(
    property: &str,
    value: &str,
) -> Result<Vec<(&'static str, String)>, DeclarationError> {
    let invalid = || DeclarationError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
    };

    let values = parse_component_values(value);
    let parts = significant(&values);

    // STEP 1: A CSS-wide keyword stands alone and applies to every longhand.
    if let [ComponentValue::Token(Token::Ident(keyword))] = parts.as_slice()
        && CSS_WIDE_KEYWORDS
            .iter()
            .any(|k| k.eq_ignore_ascii_case(keyword))
    {
        let keyword = keyword.to_ascii_lowercase();
        return longhands_of(property)
            .map(|names| names.iter().map(|&name| (name, keyword.clone())).collect())
            .ok_or_else(|| DeclarationError::UnknownProperty(property.to_string()));
    }

    match property {
        // STEP 2: Box shorthands.
        "margin" => {
            expand_box_shorthand(&MARGIN_SIDES, ValueKind::Margin, &parts).ok_or_else(invalid)
        }
        "padding" => {
            expand_box_shorthand(&PADDING_SIDES, ValueKind::Padding, &parts).ok_or_else(invalid)
        }

        // [§ 3.10 background](https://www.w3.org/TR/css-backgrounds-3/#background)
        //
        // "Value: <bg-layer>#, <final-bg-layer>"
        //
        // Only the color is kept. An omitted color resets to the initial
        // value, transparent. Image, position and repeat components are
        // accepted and ignored.
        "background" => {
            let mut colors = parts.iter().filter_map(|v| parse_single_color(v));
            let color = colors.next();
            if colors.next().is_some() {
                return Err(invalid());
            }
            let color = color.map_or_else(|| "transparent".to_string(), |c| c.to_hex_string());
            Ok(vec![("background-color", color)])
        }

        // STEP 3: Longhands.
        _ => {
            let &(name, kind, _) = LONGHANDS
                .iter()
                .find(|&&(name, _, _)| name == property)
                .ok_or_else(|| DeclarationError::UnknownProperty(property.to_string()))?;
            match parts.as_slice() {
                [single] if accepts(kind, single) => Ok(vec![(name, value.to_string())]),
                _ => Err(invalid()),
            }
        }
    }
}

/// The longhands a property sets.
fn longhands_of(property: &str) -> Option<Vec<&'static str>> {
    match property {
        "margin" => Some(MARGIN_SIDES.to_vec()),
        "padding" => Some(PADDING_SIDES.to_vec()),
        "background" => Some(vec!["background-color"]),
        _ => LONGHANDS
            .iter()
            .find(|&&(name, _, _)| name == property)
            .map(|&(name, _, _)| vec![name]),
    }
}

/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
///
/// "If there is only one component value, it applies to all sides.
/// If there are two values, the top and bottom margins are set to the
/// first value and the right and left margins are set to the second.
/// If there are three values, the top is set to the first value, the
/// left and right are set to the second, and the bottom is set to the
/// third. If there are four values, they apply to the top, right,
/// bottom, and left, respectively."
fn expand_box_shorthand(
    sides: &[&'static str; 4],
    kind: ValueKind,
    parts: &[&ComponentValue],
) -> Option<Vec<(&'static str, String)>> {
    if !parts.iter().all(|v| accepts(kind, v)) {
        return None;
    }
    let text: Vec<String> = parts.iter().map(ToString::to_string).collect();
    // Indices into `text` for top, right, bottom, left.
    let order: [usize; 4] = match text.len() {
        1 => [0, 0, 0, 0],
        2 => [0, 1, 0, 1],
        3 => [0, 1, 2, 1],
        4 => [0, 1, 2, 3],
        _ => return None,
    };
    Some(
        sides
            .iter()
            .zip(order)
            .map(|(&side, i)| (side, text[i].clone()))
            .collect(),
    )
}

/// Whether a single component value is valid for the grammar.
fn accepts(kind: ValueKind, v: &ComponentValue) -> bool {
    let keyword = |parse: fn(&str) -> bool| match v {
        ComponentValue::Token(Token::Ident(ident)) => parse(ident),
        _ => false,
    };
    match kind {
        ValueKind::Display => keyword(|s| s.parse::<DisplayValue>().is_ok()),
        ValueKind::WhiteSpace => keyword(|s| s.parse::<WhiteSpace>().is_ok()),
        ValueKind::FontStyle => keyword(|s| s.parse::<FontStyle>().is_ok()),
        ValueKind::Color => parse_single_color(v).is_some(),
        ValueKind::FontSize => parse_font_size(v, DEFAULT_FONT_SIZE_PX).is_some(),
        ValueKind::FontWeight => parse_font_weight(v, 400).is_some(),
        ValueKind::LineHeight => LineHeight::parse(v, DEFAULT_FONT_SIZE_PX).is_some(),
        ValueKind::Margin => parse_single_auto_length(v).is_some(),
        ValueKind::Padding => parse_single_length(v).is_some_and(|len| !len.is_negative()),
        ValueKind::Size => parse_single_auto_length(v).is_some_and(|len| match len {
            AutoLength::Auto => true,
            AutoLength::Length(len) => !len.is_negative(),
        }),
    }
}

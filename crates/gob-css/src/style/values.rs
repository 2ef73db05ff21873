//! CSS Value types and parsing
//!
//! This module contains CSS value types for lengths and colors, along with
//! their parsing functions.
//!
//! - [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

use crate::parser::ComponentValue;
use crate::tokenizer::Token;

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
/// "Initial: medium" - medium is 16px per common browser convention.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

// ─────────────────────────────────────────────────────────────────────────────
// Length Values
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
/// "Lengths refer to distance measurements and are denoted by <length> in the
/// property definitions."
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthValue {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// "1px = 1/96th of 1in"
    Px(f32),
    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    /// "Equal to the computed value of the font-size property of the element"
    Em(f32),
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    /// Resolved against the containing block's width.
    Percent(f32),
}

impl LengthValue {
    /// Zero length.
    pub const ZERO: Self = Self::Px(0.0);

    /// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
    ///
    /// Resolve to pixels. `em` is relative to `font_size`, percentages to
    /// `percent_base`.
    #[must_use]
    pub fn to_px(self, font_size: f32, percent_base: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Em(em) => em * font_size,
            Self::Percent(pct) => pct * percent_base / 100.0,
        }
    }

    /// Whether the length is below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        match self {
            Self::Px(v) | Self::Em(v) | Self::Percent(v) => v < 0.0,
        }
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AutoLength {
    /// The value is 'auto' and will be resolved during layout.
    Auto,
    /// A specific length value.
    Length(LengthValue),
}

impl AutoLength {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Get the length value in pixels, or `None` if 'auto'.
    #[must_use]
    pub fn to_px(self, font_size: f32, percent_base: f32) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Length(len) => Some(len.to_px(font_size, percent_base)),
        }
    }
}

/// The four physical sides of a box, as written in `margin`/`padding`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Copy> Sides<T> {
    /// The same value on all four sides.
    pub const fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color Values
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
///
/// The basic sixteen HTML colors plus a few common extended keywords.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("white", (255, 255, 255)),
    ("maroon", (128, 0, 0)),
    ("red", (255, 0, 0)),
    ("purple", (128, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("olive", (128, 128, 0)),
    ("yellow", (255, 255, 0)),
    ("navy", (0, 0, 128)),
    ("blue", (0, 0, 255)),
    ("teal", (0, 128, 128)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
    ("gold", (255, 215, 0)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("whitesmoke", (245, 245, 245)),
    ("steelblue", (70, 130, 180)),
    ("crimson", (220, 20, 60)),
    ("coral", (255, 127, 80)),
    ("indigo", (75, 0, 130)),
];

impl ColorValue {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// [§ 6.2 transparent](https://www.w3.org/TR/css-color-4/#transparent-color)
    /// "fully transparent black"
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Whether painting this color has no visible effect.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize, len: usize| -> Option<u8> {
            let digits = hex.get(i * len..(i + 1) * len)?;
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            let digits = if len == 1 { digits.repeat(2) } else { digits.to_string() };
            u8::from_str_radix(&digits, 16).ok()
        };
        match hex.len() {
            3 => Some(Self::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            4 => Some(Self {
                r: channel(0, 1)?,
                g: channel(1, 1)?,
                b: channel(2, 1)?,
                a: channel(3, 1)?,
            }),
            6 => Some(Self::rgb(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
            8 => Some(Self {
                r: channel(0, 2)?,
                g: channel(1, 2)?,
                b: channel(2, 2)?,
                a: channel(3, 2)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    /// "CSS defines a large set of named colors..."
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(named, _)| named.eq_ignore_ascii_case(name))
            .map(|&(_, (r, g, b))| Self::rgb(r, g, b))
    }

    /// Convert to hex string notation (#RRGGBB or #RRGGBBAA if alpha != 255)
    #[must_use]
    pub fn to_hex_string(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing Functions
// ─────────────────────────────────────────────────────────────────────────────

/// The component values of a declaration with whitespace dropped.
#[must_use]
pub fn significant(values: &[ComponentValue]) -> Vec<&ComponentValue> {
    values.iter().filter(|v| !v.is_whitespace()).collect()
}

/// Parse a single component value as a color.
#[must_use]
pub fn parse_single_color(v: &ComponentValue) -> Option<ColorValue> {
    match v {
        ComponentValue::Token(Token::Hash(name)) => ColorValue::from_hex(name),
        ComponentValue::Token(Token::Ident(name)) => ColorValue::from_named(name),
        // [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#funcdef-rgb)
        ComponentValue::Function { name, args }
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            parse_rgb_function(args)
        }
        _ => None,
    }
}

/// [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#funcdef-rgb)
///
/// "rgb() = rgb( <percentage>{3} [ / <alpha-value> ]? ) |
///          rgb( <number>{3} [ / <alpha-value> ]? )"
///
/// The legacy comma-separated form is accepted as well.
fn parse_rgb_function(args: &[ComponentValue]) -> Option<ColorValue> {
    // STEP 1: Collect the numeric arguments, ignoring separators.
    let numbers: Vec<&Token> = args
        .iter()
        .filter_map(|v| match v {
            ComponentValue::Token(token @ (Token::Number(_) | Token::Percentage(_))) => Some(token),
            _ => None,
        })
        .collect();
    if !(3..=4).contains(&numbers.len()) {
        return None;
    }

    // STEP 2: "Values outside these ranges are not invalid, but are clamped
    // to the ranges defined here at parsed-value time."
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let to_channel = |token: &Token, scale: f64| -> u8 {
        let value = match token {
            Token::Number(value) => *value * scale,
            Token::Percentage(value) => *value * 2.55,
            _ => 0.0,
        };
        value.round().clamp(0.0, 255.0) as u8
    };

    Some(ColorValue {
        r: to_channel(numbers[0], 1.0),
        g: to_channel(numbers[1], 1.0),
        b: to_channel(numbers[2], 1.0),
        // "<alpha-value> = <number> | <percentage>", numbers in [0, 1]
        a: numbers.get(3).map_or(255, |token| to_channel(token, 255.0)),
    })
}

/// Parse a single component value as a length.
///
/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
/// "for zero lengths the unit identifier is optional"
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_single_length(v: &ComponentValue) -> Option<LengthValue> {
    match v {
        ComponentValue::Token(Token::Dimension { value, unit }) => {
            let value = *value as f32;
            match unit.to_ascii_lowercase().as_str() {
                "px" => Some(LengthValue::Px(value)),
                "em" => Some(LengthValue::Em(value)),
                // [§ 5.1.1](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
                // "Equal to the computed value of font-size on the root element."
                // The root font size is not configurable, so rem resolves here.
                "rem" => Some(LengthValue::Px(value * DEFAULT_FONT_SIZE_PX)),
                // [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
                "pt" => Some(LengthValue::Px(value * 96.0 / 72.0)),
                "in" => Some(LengthValue::Px(value * 96.0)),
                "cm" => Some(LengthValue::Px(value * 96.0 / 2.54)),
                "mm" => Some(LengthValue::Px(value * 96.0 / 25.4)),
                _ => None,
            }
        }
        ComponentValue::Token(Token::Percentage(value)) => {
            Some(LengthValue::Percent(*value as f32))
        }
        ComponentValue::Token(Token::Number(value)) if *value == 0.0 => {
            Some(LengthValue::ZERO)
        }
        _ => None,
    }
}

/// Parse a single component value as `<length> | <percentage> | auto`.
#[must_use]
pub fn parse_single_auto_length(v: &ComponentValue) -> Option<AutoLength> {
    match v {
        ComponentValue::Token(Token::Ident(ident)) if ident.eq_ignore_ascii_case("auto") => {
            Some(AutoLength::Auto)
        }
        _ => parse_single_length(v).map(AutoLength::Length),
    }
}

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// "Value: <font-weight-absolute> | bolder | lighter"
///
/// Relative keywords are resolved against the parent weight using the
/// table in [§ 3.2.1](https://www.w3.org/TR/css-fonts-4/#relative-weights).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_font_weight(v: &ComponentValue, parent_weight: u16) -> Option<u16> {
    match v {
        ComponentValue::Token(Token::Ident(ident)) => {
            match ident.to_ascii_lowercase().as_str() {
                "normal" => Some(400),
                "bold" => Some(700),
                "bolder" => Some(match parent_weight {
                    0..350 => 400,
                    350..550 => 700,
                    _ => 900,
                }),
                "lighter" => Some(match parent_weight {
                    0..550 => 100,
                    550..750 => 400,
                    _ => 700,
                }),
                _ => None,
            }
        }
        // "Only values greater than or equal to 1, and less than or equal to
        // 1000, are valid"
        ComponentValue::Token(Token::Number(value)) if (1.0..=1000.0).contains(value) => {
            Some(value.round() as u16)
        }
        _ => None,
    }
}

/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// "<absolute-size> | <relative-size> | <length-percentage [0,∞]>"
///
/// Returns pixels; `em` and percentages resolve against the parent size.
#[must_use]
pub fn parse_font_size(v: &ComponentValue, parent_size: f32) -> Option<f32> {
    if let ComponentValue::Token(Token::Ident(ident)) = v {
        // [§ 3.5.1 absolute-size](https://www.w3.org/TR/css-fonts-4/#absolute-size-mapping)
        return match ident.to_ascii_lowercase().as_str() {
            "xx-small" => Some(9.0),
            "x-small" => Some(10.0),
            "small" => Some(13.0),
            "medium" => Some(DEFAULT_FONT_SIZE_PX),
            "large" => Some(18.0),
            "x-large" => Some(24.0),
            "xx-large" => Some(32.0),
            "xxx-large" => Some(48.0),
            // <relative-size>
            "smaller" => Some(parent_size / 1.2),
            "larger" => Some(parent_size * 1.2),
            _ => None,
        };
    }
    let length = parse_single_length(v)?;
    if length.is_negative() {
        return None;
    }
    Some(length.to_px(parent_size, parent_size))
}

/// [§ 10.8 line-height](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
///
/// "Value: normal | <number> | <length> | <percentage>"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LineHeight {
    /// "Tells user agents to set the used value to a 'reasonable' value based
    /// on the font of the element."
    Normal,
    /// "The used value of the property is this number multiplied by the
    /// element's font size." The number, not the product, is inherited.
    Factor(f32),
    /// "The specified length is used in the calculation of the line box height."
    Px(f32),
}

impl LineHeight {
    /// Parse a `line-height` value. `em` and percentages resolve against
    /// the element's own font size.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse(v: &ComponentValue, font_size: f32) -> Option<Self> {
        match v {
            ComponentValue::Token(Token::Ident(ident)) if ident.eq_ignore_ascii_case("normal") => {
                Some(Self::Normal)
            }
            ComponentValue::Token(Token::Number(value)) if *value >= 0.0 => {
                Some(Self::Factor(*value as f32))
            }
            _ => {
                let length = parse_single_length(v)?;
                if length.is_negative() {
                    return None;
                }
                Some(Self::Px(length.to_px(font_size, font_size)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_component_values;

    fn one(text: &str) -> ComponentValue {
        parse_component_values(text)
            .into_iter()
            .next()
            .expect("one component value")
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(ColorValue::from_hex("#f00"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(ColorValue::from_hex("00ff0080").map(|c| c.a), Some(0x80));
        assert_eq!(ColorValue::from_hex("#12"), None);
        assert_eq!(ColorValue::from_hex("#ggg"), None);
    }

    #[test]
    fn test_named_and_function_colors() {
        assert_eq!(parse_single_color(&one("Navy")), Some(ColorValue::rgb(0, 0, 128)));
        assert_eq!(parse_single_color(&one("transparent")), Some(ColorValue::TRANSPARENT));
        assert_eq!(
            parse_single_color(&one("rgb(10, 300, 50%)")),
            Some(ColorValue::rgb(10, 255, 128))
        );
        assert_eq!(parse_single_color(&one("rgba(0 0 0 / 0.5)")).map(|c| c.a), Some(128));
        assert_eq!(parse_single_color(&one("nocolor")), None);
    }

    #[test]
    fn test_lengths() {
        assert_eq!(parse_single_length(&one("12px")), Some(LengthValue::Px(12.0)));
        assert_eq!(parse_single_length(&one("0")), Some(LengthValue::ZERO));
        assert_eq!(parse_single_length(&one("5")), None);
        assert_eq!(LengthValue::Em(2.0).to_px(10.0, 0.0), 20.0);
        assert_eq!(LengthValue::Percent(50.0).to_px(10.0, 300.0), 150.0);
        assert_eq!(parse_single_auto_length(&one("AUTO")), Some(AutoLength::Auto));
    }

    #[test]
    fn test_font_weight_and_size() {
        assert_eq!(parse_font_weight(&one("bold"), 400), Some(700));
        assert_eq!(parse_font_weight(&one("bolder"), 700), Some(900));
        assert_eq!(parse_font_weight(&one("0"), 400), None);
        assert_eq!(parse_font_size(&one("2em"), 16.0), Some(32.0));
        assert_eq!(parse_font_size(&one("150%"), 10.0), Some(15.0));
        assert_eq!(parse_font_size(&one("-1px"), 16.0), None);
    }

    #[test]
    fn test_line_height() {
        assert_eq!(LineHeight::parse(&one("1.5"), 10.0), Some(LineHeight::Factor(1.5)));
        assert_eq!(LineHeight::parse(&one("2em"), 10.0), Some(LineHeight::Px(20.0)));
        assert_eq!(LineHeight::parse(&one("normal"), 10.0), Some(LineHeight::Normal));
    }
}

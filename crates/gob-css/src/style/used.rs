//! Typed, inheritance-resolved styles.
//!
//! [CSS Cascading § 4 Value Processing](https://www.w3.org/TR/css-cascade-4/#value-stages)
//!
//! The cascade leaves each element with a map of winning declarations as
//! text. [`UsedStyle::compute`] turns that map into typed values, filling
//! the gaps by inheritance or with initial values.

use std::str::FromStr;

use gob_dom::ComputedStyle;
use serde::Serialize;

use super::display::{DisplayValue, FontStyle, WhiteSpace};
use super::properties::is_inherited;
use super::values::{
    AutoLength, ColorValue, DEFAULT_FONT_SIZE_PX, LengthValue, LineHeight, Sides,
    parse_font_size, parse_font_weight, parse_single_auto_length, parse_single_color,
    parse_single_length, significant,
};
use crate::parser::{ComponentValue, parse_component_values};
use crate::tokenizer::Token;

/// Font weight at or above which the bold face is used.
const BOLD_THRESHOLD: u16 = 600;

/// The style values layout and painting read for one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsedStyle {
    /// [§ 2 display](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: DisplayValue,
    /// [§ 3.1 color](https://www.w3.org/TR/css-color-4/#the-color-property)
    ///
    /// `None` until some ancestor sets a color; the renderer then uses its
    /// configured default text color.
    pub color: Option<ColorValue>,
    /// [§ 3.2 background-color](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    /// "Initial: transparent"
    pub background_color: ColorValue,
    /// Font size in pixels.
    pub font_size: f32,
    /// Numeric font weight, 400 is normal and 700 bold.
    pub font_weight: u16,
    /// Normal or italic.
    pub font_style: FontStyle,
    /// Line height as specified; see [`UsedStyle::line_height_px`].
    pub line_height: LineHeight,
    /// White space collapsing and wrapping mode.
    pub white_space: WhiteSpace,
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    pub margin: Sides<AutoLength>,
    /// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    pub padding: Sides<LengthValue>,
    /// [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: AutoLength,
    /// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: AutoLength,
}

impl Default for UsedStyle {
    fn default() -> Self {
        Self::initial()
    }
}

impl UsedStyle {
    /// Every property at its initial value, the style of the root's parent.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            display: DisplayValue::Inline,
            color: None,
            background_color: ColorValue::TRANSPARENT,
            font_size: DEFAULT_FONT_SIZE_PX,
            font_weight: 400,
            font_style: FontStyle::Normal,
            line_height: LineHeight::Normal,
            white_space: WhiteSpace::Normal,
            margin: Sides::all(AutoLength::Length(LengthValue::ZERO)),
            padding: Sides::all(LengthValue::ZERO),
            width: AutoLength::Auto,
            height: AutoLength::Auto,
        }
    }

    /// Resolve an element's computed style against its parent's used style.
    ///
    /// Values that fail to parse fall back as if the property were absent.
    #[must_use]
    pub fn compute(style: &ComputedStyle, parent: &Self) -> Self {
        let initial = Self::initial();
        let resolver = Resolver {
            style,
            parent,
            initial: &initial,
        };

        // STEP 1: font-size first, since em lengths elsewhere depend on it.
        let font_size = resolver.resolve("font-size", |s| s.font_size, |v| {
            parse_font_size(v, parent.font_size)
        });

        let margin_side = |property: &str, side: fn(&Sides<AutoLength>) -> AutoLength| {
            resolver.resolve(property, |s| side(&s.margin), parse_single_auto_length)
        };
        let padding_side = |property: &str, side: fn(&Sides<LengthValue>) -> LengthValue| {
            resolver.resolve(property, |s| side(&s.padding), |v| {
                parse_single_length(v).filter(|len| !len.is_negative())
            })
        };

        // STEP 2: Everything else.
        Self {
            display: resolver.resolve("display", |s| s.display, keyword),
            color: resolver.resolve("color", |s| s.color, |v| parse_single_color(v).map(Some)),
            background_color: resolver.resolve(
                "background-color",
                |s| s.background_color,
                parse_single_color,
            ),
            font_size,
            font_weight: resolver.resolve("font-weight", |s| s.font_weight, |v| {
                parse_font_weight(v, parent.font_weight)
            }),
            font_style: resolver.resolve("font-style", |s| s.font_style, keyword),
            line_height: resolver.resolve("line-height", |s| s.line_height, |v| {
                LineHeight::parse(v, font_size)
            }),
            white_space: resolver.resolve("white-space", |s| s.white_space, keyword),
            margin: Sides {
                top: margin_side("margin-top", |s| s.top),
                right: margin_side("margin-right", |s| s.right),
                bottom: margin_side("margin-bottom", |s| s.bottom),
                left: margin_side("margin-left", |s| s.left),
            },
            padding: Sides {
                top: padding_side("padding-top", |s| s.top),
                right: padding_side("padding-right", |s| s.right),
                bottom: padding_side("padding-bottom", |s| s.bottom),
                left: padding_side("padding-left", |s| s.left),
            },
            width: resolver.resolve("width", |s| s.width, parse_single_auto_length),
            height: resolver.resolve("height", |s| s.height, parse_single_auto_length),
        }
    }

    /// [§ 10.8 line-height](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
    ///
    /// Line height in pixels. `normal_height` is the font's own line height,
    /// used for `normal`.
    #[must_use]
    pub fn line_height_px(&self, normal_height: f32) -> f32 {
        match self.line_height {
            LineHeight::Normal => normal_height,
            LineHeight::Factor(factor) => factor * self.font_size,
            LineHeight::Px(px) => px,
        }
    }

    /// Whether text should use a bold face.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.font_weight >= BOLD_THRESHOLD
    }
}

/// Reads one property out of a computed style.
struct Resolver<'a> {
    style: &'a ComputedStyle,
    parent: &'a UsedStyle,
    initial: &'a UsedStyle,
}

impl Resolver<'_> {
    /// [CSS Cascading § 7 Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting)
    ///
    /// "When the cascade does not result in a value, the specified value must
    /// be found some other way. Inherited properties draw their defaults from
    /// their parent element through inheritance; all other properties take
    /// their initial value."
    fn resolve<T>(
        &self,
        property: &str,
        field: impl Fn(&UsedStyle) -> T,
        parse: impl Fn(&ComponentValue) -> Option<T>,
    ) -> T {
        let inherited = is_inherited(property);
        let fallback = || {
            if inherited {
                field(self.parent)
            } else {
                field(self.initial)
            }
        };

        let Some(text) = self.style.get(property) else {
            return fallback();
        };
        match text.trim().to_ascii_lowercase().as_str() {
            "inherit" => return field(self.parent),
            "initial" => return field(self.initial),
            "unset" => return fallback(),
            _ => {}
        }

        let values = parse_component_values(text);
        match significant(&values).as_slice() {
            [single] => parse(single).unwrap_or_else(fallback),
            _ => fallback(),
        }
    }
}

/// Parse an identifier as a strum keyword enum.
fn keyword<T: FromStr>(v: &ComponentValue) -> Option<T> {
    match v {
        ComponentValue::Token(Token::Ident(ident)) => ident.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(pairs: &[(&str, &str)]) -> ComputedStyle {
        let mut style = ComputedStyle::new();
        for (property, value) in pairs {
            style.set(property, value);
        }
        style
    }

    #[test]
    fn test_empty_style_is_initial_for_root() {
        let used = UsedStyle::compute(&ComputedStyle::new(), &UsedStyle::initial());
        assert_eq!(used, UsedStyle::initial());
    }

    #[test]
    fn test_inherited_properties_flow_from_parent() {
        let parent = UsedStyle::compute(
            &style(&[
                ("color", "red"),
                ("font-size", "20px"),
                ("background-color", "blue"),
                ("padding-top", "5px"),
            ]),
            &UsedStyle::initial(),
        );
        let child = UsedStyle::compute(&ComputedStyle::new(), &parent);
        assert_eq!(child.color, Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(child.font_size, 20.0);
        assert_eq!(child.background_color, ColorValue::TRANSPARENT);
        assert_eq!(child.padding.top, LengthValue::ZERO);
    }

    #[test]
    fn test_em_font_size_uses_parent_size() {
        let parent = UsedStyle::compute(&style(&[("font-size", "10px")]), &UsedStyle::initial());
        let child = UsedStyle::compute(&style(&[("font-size", "2em")]), &parent);
        assert_eq!(child.font_size, 20.0);
    }

    #[test]
    fn test_explicit_defaulting_keywords() {
        let parent = UsedStyle::compute(
            &style(&[("color", "red"), ("width", "100px")]),
            &UsedStyle::initial(),
        );
        let child = UsedStyle::compute(
            &style(&[("color", "initial"), ("width", "inherit")]),
            &parent,
        );
        assert_eq!(child.color, None);
        assert_eq!(child.width, AutoLength::Length(LengthValue::Px(100.0)));
    }

    #[test]
    fn test_line_height_resolution() {
        let used = UsedStyle::compute(
            &style(&[("font-size", "10px"), ("line-height", "1.5")]),
            &UsedStyle::initial(),
        );
        assert_eq!(used.line_height_px(12.0), 15.0);
        assert_eq!(UsedStyle::initial().line_height_px(12.0), 12.0);
    }

    #[test]
    fn test_bold_threshold() {
        let used = UsedStyle::compute(&style(&[("font-weight", "bold")]), &UsedStyle::initial());
        assert!(used.is_bold());
        assert!(!UsedStyle::initial().is_bold());
    }
}

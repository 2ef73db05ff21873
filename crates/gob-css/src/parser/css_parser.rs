//! Stylesheet and declaration parsing.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
//!
//! Parsing runs in two passes. Tokens are first grouped into
//! [`ComponentValue`]s, so brackets and functions nest and every later step
//! can split on a top-level `;` or `,` without tracking depth. The grouped
//! values are then read as rules and declarations:
//!
//! ```text
//! tokens → component values → rule (prelude + {block})
//!                                    │          └→ declarations → validated
//!                                    └→ selector list → compound selectors
//! ```
//!
//! Nothing here fails. At-rules are dropped, a rule with no supported
//! selector is dropped, and a declaration that does not validate is dropped
//! on its own.

use std::fmt;

use gob_common::warning::warn_once;

use crate::selector::{Selector, parse_selector};
use crate::style::properties::validate_declaration;
use crate::tokenizer::{Bracket, Token, Tokenizer};

/// Brackets nested deeper than this are kept as plain tokens.
const MAX_NESTING: usize = 64;

/// A validated declaration such as `color: red`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name, ASCII-lowercased.
    pub name: String,
    /// The value, with whitespace runs collapsed and `!important` removed.
    pub value: String,
    /// Whether the declaration was marked `!important`.
    pub important: bool,
}

impl Declaration {
    /// Create a declaration from already-normalized parts.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, important: bool) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            value: value.into(),
            important,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
///
/// A token, or a bracketed group of component values.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// Any token that does not open a group.
    Token(Token),
    /// `name( args )`
    Function {
        /// The function name.
        name: String,
        /// Everything between the parentheses.
        args: Vec<ComponentValue>,
    },
    /// `( )`, `[ ]` or `{ }` and what is inside.
    Block {
        /// Which bracket pair.
        bracket: Bracket,
        /// Everything between the brackets.
        contents: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    /// Whether this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Token(Token::Whitespace))
    }

    /// Whether this is exactly `token`.
    #[must_use]
    pub fn is_token(&self, token: &Token) -> bool {
        matches!(self, Self::Token(own) if own == token)
    }

    /// Whether this is the identifier `name`, ignoring ASCII case.
    #[must_use]
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Self::Token(token) if token.is_ident(name))
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => write!(f, "{token}"),
            Self::Function { name, args } => {
                write!(f, "{name}(")?;
                args.iter().try_for_each(|arg| write!(f, "{arg}"))?;
                f.write_str(")")
            }
            Self::Block { bracket, contents } => {
                write!(f, "{}", bracket.open())?;
                contents.iter().try_for_each(|value| write!(f, "{value}"))?;
                write!(f, "{}", bracket.close())
            }
        }
    }
}

/// A style rule: the supported part of a selector list, and its
/// declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// The supported selectors of the rule's selector list. Never empty.
    pub selectors: Vec<Selector>,
    /// The valid declarations of the rule's block, in source order.
    pub declarations: Vec<Declaration>,
}

/// A parsed stylesheet. Rule order is the cascade's final tie-break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    /// The style rules, in source order.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    #[must_use]
    pub fn parse(css: &str) -> Self {
        Self {
            rules: parse_rules(parse_component_values(css)),
        }
    }

    /// Number of rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the stylesheet has no rules.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Tokenize `text` and group it into component values.
///
/// Used on stylesheet text, on `style` attributes, and on the normalized
/// value text a computed style stores.
#[must_use]
pub fn parse_component_values(text: &str) -> Vec<ComponentValue> {
    group(&mut Tokenizer::new(text), None, 0)
}

/// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
///
/// Collect values until the bracket that closes `closing`, or the end of
/// input, which closes every open group.
fn group(
    tokens: &mut impl Iterator<Item = Token>,
    closing: Option<Bracket>,
    depth: usize,
) -> Vec<ComponentValue> {
    let mut values = Vec::new();
    while let Some(token) = tokens.next() {
        let value = match token {
            Token::Close(bracket) if Some(bracket) == closing => return values,
            Token::Open(bracket) if depth < MAX_NESTING => ComponentValue::Block {
                bracket,
                contents: group(tokens, Some(bracket), depth + 1),
            },
            Token::Function(name) if depth < MAX_NESTING => ComponentValue::Function {
                name,
                args: group(tokens, Some(Bracket::Round), depth + 1),
            },
            token => ComponentValue::Token(token),
        };
        values.push(value);
    }
    values
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// Every `{}` block at the top level ends a rule; the values before it are
/// the rule's prelude. An at-rule runs to its `;` or through its block. A
/// prelude left open at the end of input is dropped.
#[must_use]
pub fn parse_rules(values: Vec<ComponentValue>) -> Vec<StyleRule> {
    let mut rules = Vec::new();
    let mut prelude: Vec<ComponentValue> = Vec::new();
    let mut values = values.into_iter();

    while let Some(value) = values.next() {
        match value {
            ComponentValue::Token(Token::Whitespace) if prelude.is_empty() => {}
            ComponentValue::Token(Token::AtKeyword(name)) if prelude.is_empty() => {
                warn_once("CSS Parser", &format!("at-rule '@{name}' is not supported; skipped"));
                let _ = values.by_ref().find(|value| {
                    value.is_token(&Token::Semicolon)
                        || matches!(
                            value,
                            ComponentValue::Block {
                                bracket: Bracket::Curly,
                                ..
                            }
                        )
                });
            }
            ComponentValue::Block {
                bracket: Bracket::Curly,
                contents,
            } => {
                if let Some(rule) = style_rule(&prelude, &contents) {
                    rules.push(rule);
                }
                prelude.clear();
            }
            value => prelude.push(value),
        }
    }
    rules
}

/// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
///
/// The body of a rule or a `style` attribute: declarations separated by
/// top-level `;`.
#[must_use]
pub fn parse_declarations(values: &[ComponentValue]) -> Vec<Declaration> {
    values
        .split(|value| value.is_token(&Token::Semicolon))
        .filter_map(declaration)
        .collect()
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
fn style_rule(prelude: &[ComponentValue], block: &[ComponentValue]) -> Option<StyleRule> {
    let selectors = selector_list(prelude);
    if selectors.is_empty() {
        warn_once(
            "CSS Parser",
            &format!("rule '{}' has no supported selector; skipped", to_text(prelude)),
        );
        return None;
    }
    Some(StyleRule {
        selectors,
        declarations: parse_declarations(block),
    })
}

/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// Members that are not supported compound selectors are dropped with a
/// warning; the rest of the list is kept.
fn selector_list(prelude: &[ComponentValue]) -> Vec<Selector> {
    prelude
        .split(|value| value.is_token(&Token::Comma))
        .map(to_text)
        .filter(|text| !text.is_empty())
        .filter_map(|text| {
            let selector = parse_selector(&text);
            if selector.is_none() {
                warn_once("Selector", &format!("unsupported selector '{text}' skipped"));
            }
            selector
        })
        .collect()
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// `name : value [!important]`, where the value must pass the property's
/// validation.
fn declaration(values: &[ComponentValue]) -> Option<Declaration> {
    let (name, rest) = match trim(values) {
        [] => return None,
        [ComponentValue::Token(Token::Ident(name)), rest @ ..] => {
            (name.to_ascii_lowercase(), trim(rest))
        }
        [ComponentValue::Token(Token::AtKeyword(name)), ..] => {
            warn_once("CSS Parser", &format!("at-rule '@{name}' is not supported; skipped"));
            return None;
        }
        junk => {
            warn_once(
                "CSS Parser",
                &format!("malformed declaration '{}' skipped", normalize(junk)),
            );
            return None;
        }
    };

    let [ComponentValue::Token(Token::Colon), value @ ..] = rest else {
        warn_once("CSS Parser", &format!("declaration '{name}' has no ':'; skipped"));
        return None;
    };

    let (value, important) = strip_important(value);
    let value = normalize(value);
    if value.is_empty() {
        warn_once("CSS Parser", &format!("declaration '{name}' has an empty value; skipped"));
        return None;
    }
    if let Err(err) = validate_declaration(&name, &value) {
        warn_once("CSS Parser", &format!("{err}; declaration skipped"));
        return None;
    }

    Some(Declaration {
        name,
        value,
        important,
    })
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation", the
/// last two non-whitespace values being `!` and `important` in any case.
fn strip_important(value: &[ComponentValue]) -> (&[ComponentValue], bool) {
    let value = trim(value);
    let [rest @ .., last] = value else {
        return (value, false);
    };
    if !last.is_ident("important") {
        return (value, false);
    }
    match trim(rest) {
        [before @ .., bang] if bang.is_token(&Token::Delim('!')) => (trim(before), true),
        _ => (value, false),
    }
}

fn trim(values: &[ComponentValue]) -> &[ComponentValue] {
    let start = values.iter().take_while(|v| v.is_whitespace()).count();
    let values = &values[start..];
    let end = values.len() - values.iter().rev().take_while(|v| v.is_whitespace()).count();
    &values[..end]
}

/// Serialized values, trimmed.
fn to_text(values: &[ComponentValue]) -> String {
    let text: String = values.iter().map(ToString::to_string).collect();
    text.trim().to_string()
}

/// Serialized values with every whitespace run collapsed to one space.
fn normalize(values: &[ComponentValue]) -> String {
    to_text(values).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_important_is_detected_and_trimmed() {
        let sheet = Stylesheet::parse("p { color: red ! IMPORTANT ; }");
        let decl = &sheet.rules[0].declarations[0];
        assert!(decl.important);
        assert_eq!(decl.value, "red");
    }

    #[test]
    fn test_lone_important_is_not_a_value() {
        let declarations = parse_declarations(&parse_component_values("color: !important"));
        assert!(declarations.is_empty());
    }

    #[test]
    fn test_value_whitespace_is_collapsed() {
        let sheet = Stylesheet::parse("p { margin:\n  1px\t\t2px   3px ; }");
        assert_eq!(sheet.rules[0].declarations[0].value, "1px 2px 3px");
    }

    #[test]
    fn test_function_values_are_serialized() {
        let sheet = Stylesheet::parse("p { color: rgb( 1 , 2 , 3 ) }");
        assert_eq!(sheet.rules[0].declarations[0].value, "rgb( 1 , 2 , 3 )");
    }

    #[test]
    fn test_semicolons_inside_groups_do_not_split() {
        let values = parse_component_values("a: f(x;y); b: 1");
        assert_eq!(values.split(|v| v.is_token(&Token::Semicolon)).count(), 2);
    }

    #[test]
    fn test_at_rules_are_skipped_with_their_block() {
        let sheet = Stylesheet::parse(
            "@import 'x.css'; @media screen { p { color: red } } div { color: blue }",
        );
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].value, "blue");
    }

    #[test]
    fn test_unclosed_block_ends_at_end_of_input() {
        let sheet = Stylesheet::parse("p { color: red; b { color: blue }");
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.rules[0].declarations.len(), 1);

        assert!(Stylesheet::parse("p, div").is_empty());
    }

    #[test]
    fn test_attribute_selector_survives_grouping() {
        let sheet = Stylesheet::parse("a[href^=\"http\"], .x { color: red }");
        assert_eq!(sheet.rules[0].selectors.len(), 2);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let css = format!("p {{ color: {} }}", "(".repeat(10_000));
        let sheet = Stylesheet::parse(&css);
        assert!(sheet.rules.is_empty() || sheet.rules[0].declarations.is_empty());
    }
}

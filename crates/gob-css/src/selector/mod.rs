//! Compound selectors.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//!
//! A gob selector is one compound selector: an optional type or `*`
//! followed by any number of `.class`, `#id` and `[attr...]` conditions.
//! Combinators and pseudo-classes make the selector unparseable, and the
//! stylesheet parser then drops it from its rule.

use std::fmt;
use std::iter::Sum;

use gob_dom::Element;

use crate::parser::StyleRule;

/// One condition on a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// A lowercased tag name, compared case-insensitively.
    Type(String),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[attr]` or `[attr op value]`
    Attribute(AttributeSelector),
}

impl SimpleSelector {
    /// Whether the element satisfies this condition.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Universal => true,
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::Attribute(attribute) => attribute.matches(element),
        }
    }

    /// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    const fn specificity(&self) -> Specificity {
        match self {
            Self::Universal => Specificity(0, 0, 0),
            Self::Id(_) => Specificity(1, 0, 0),
            Self::Class(_) | Self::Attribute(_) => Specificity(0, 1, 0),
            Self::Type(_) => Specificity(0, 0, 1),
        }
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Lowercased attribute name.
    pub name: String,
    /// The comparison to make, or `None` for a presence test.
    pub test: Option<(AttributeOperator, String)>,
}

impl AttributeSelector {
    /// Whether the element has the attribute and its value passes the test.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        let Some(actual) = element.attr(&self.name) else {
            return false;
        };
        self.test
            .as_ref()
            .is_none_or(|(operator, expected)| operator.accepts(actual, expected))
    }
}

/// How an attribute value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `=`
    Equals,
    /// `~=`: one of the whitespace-separated words.
    Includes,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl AttributeOperator {
    /// The operator whose first character is `c`, for the two-character forms.
    const fn from_lead(c: char) -> Option<Self> {
        match c {
            '~' => Some(Self::Includes),
            '^' => Some(Self::Prefix),
            '$' => Some(Self::Suffix),
            '*' => Some(Self::Substring),
            _ => None,
        }
    }

    /// Compare. The prefix, suffix and substring forms never match an
    /// empty expected value.
    fn accepts(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Equals => actual == expected,
            Self::Includes => actual.split_ascii_whitespace().any(|word| word == expected),
            Self::Prefix => !expected.is_empty() && actual.starts_with(expected),
            Self::Suffix => !expected.is_empty() && actual.ends_with(expected),
            Self::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

/// `(ids, classes and attributes, types)`, compared left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl Sum for Specificity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |total, part| {
            Self(total.0 + part.0, total.1 + part.1, total.2 + part.2)
        })
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Conditions that must all hold.
    pub compound: Vec<SimpleSelector>,
    /// Precomputed from `compound`.
    pub specificity: Specificity,
}

impl Selector {
    /// Whether the element satisfies every condition.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        self.compound.iter().all(|simple| simple.matches(element))
    }
}

/// Whether any selector in the rule's selector list matches the element.
#[must_use]
pub fn matches(element: &Element, rule: &StyleRule) -> bool {
    rule.selectors.iter().any(|selector| selector.matches(element))
}

/// The specificity a rule applies with: that of its most specific selector
/// matching the element, or `None` when nothing matches.
#[must_use]
pub fn matching_specificity(element: &Element, rule: &StyleRule) -> Option<Specificity> {
    rule.selectors
        .iter()
        .filter(|selector| selector.matches(element))
        .map(|selector| selector.specificity)
        .max()
}

/// Parse one compound selector such as `div.note#main[lang^=en]`.
///
/// Returns `None` for combinators, pseudo-classes, pseudo-elements and
/// syntax errors.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<Selector> {
    let mut rest = raw.trim();
    if rest.is_empty() {
        return None;
    }

    let mut compound = Vec::new();
    if let Some(after) = rest.strip_prefix('*') {
        compound.push(SimpleSelector::Universal);
        rest = after;
    } else if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        let name = take_name(&mut rest);
        if !name.is_empty() {
            compound.push(SimpleSelector::Type(name.to_ascii_lowercase()));
        }
    }

    while let Some(lead) = rest.chars().next() {
        rest = &rest[lead.len_utf8()..];
        let simple = match lead {
            '.' => SimpleSelector::Class(non_empty(take_name(&mut rest))?),
            '#' => SimpleSelector::Id(non_empty(take_name(&mut rest))?),
            '[' => SimpleSelector::Attribute(attribute_selector(&mut rest)?),
            _ => return None,
        };
        compound.push(simple);
    }

    let specificity = compound.iter().map(SimpleSelector::specificity).sum();
    Some(Selector {
        compound,
        specificity,
    })
}

/// [ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_') || !c.is_ascii()
}

/// Splits the leading run of name characters off `rest`.
fn take_name<'a>(rest: &mut &'a str) -> &'a str {
    let text = *rest;
    let end = text.find(|c: char| !is_name_char(c)).unwrap_or(text.len());
    let (name, tail) = text.split_at(end);
    *rest = tail;
    name
}

fn non_empty(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_owned())
}

fn skip_space(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_whitespace())
}

/// The inside of `[...]`, with the `[` already consumed.
fn attribute_selector(rest: &mut &str) -> Option<AttributeSelector> {
    *rest = skip_space(*rest);
    let name = non_empty(take_name(rest))?.to_ascii_lowercase();

    let mut chars = skip_space(*rest).chars();
    let operator = match chars.next()? {
        ']' => {
            *rest = chars.as_str();
            return Some(AttributeSelector { name, test: None });
        }
        '=' => AttributeOperator::Equals,
        lead => {
            let operator = AttributeOperator::from_lead(lead)?;
            (chars.next()? == '=').then_some(operator)?
        }
    };

    *rest = skip_space(chars.as_str());
    let value = attribute_value(rest)?;
    *rest = skip_space(*rest).strip_prefix(']')?;
    Some(AttributeSelector {
        name,
        test: Some((operator, value)),
    })
}

/// A quoted string (backslash escapes the next character) or a bare run of
/// name characters and dots.
fn attribute_value(rest: &mut &str) -> Option<String> {
    let text = *rest;
    let mut chars = text.chars();
    let quote = chars.next()?;
    if !matches!(quote, '"' | '\'') {
        let end = text
            .find(|c: char| !is_name_char(c) && c != '.')
            .unwrap_or(text.len());
        let (value, tail) = text.split_at(end);
        *rest = tail;
        return non_empty(value);
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?),
            c if c == quote => {
                *rest = chars.as_str();
                return Some(value);
            }
            c => value.push(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(name: &str, operator: AttributeOperator, value: &str) -> AttributeSelector {
        AttributeSelector {
            name: name.into(),
            test: Some((operator, value.into())),
        }
    }

    #[test]
    fn test_parse_compound_selector() {
        let selector = parse_selector("p.intro.lead#first").expect("parses");
        assert_eq!(
            selector.compound,
            vec![
                SimpleSelector::Type("p".into()),
                SimpleSelector::Class("intro".into()),
                SimpleSelector::Class("lead".into()),
                SimpleSelector::Id("first".into()),
            ]
        );
        assert_eq!(selector.specificity, Specificity::new(1, 2, 1));
    }

    #[test]
    fn test_parse_attribute_operators() {
        use AttributeOperator::{Equals, Includes, Prefix, Substring, Suffix};
        let presence = AttributeSelector {
            name: "href".into(),
            test: None,
        };
        let cases = [
            ("[HREF]", presence),
            ("[type=text]", compare("type", Equals, "text")),
            ("[class~=\"a\"]", compare("class", Includes, "a")),
            ("[href^='https']", compare("href", Prefix, "https")),
            ("[src$=\".png\"]", compare("src", Suffix, ".png")),
            ("[ data-theme *= dark ]", compare("data-theme", Substring, "dark")),
            (r#"[title="say \"hi\""]"#, compare("title", Equals, "say \"hi\"")),
        ];
        for (text, expected) in cases {
            let selector = parse_selector(text).expect(text);
            assert_eq!(selector.compound, vec![SimpleSelector::Attribute(expected)]);
            assert_eq!(selector.specificity, Specificity::new(0, 1, 0));
        }
    }

    #[test]
    fn test_unsupported_selectors_do_not_parse() {
        let rejected = [
            "div p", "ul > li", "h1 + p", "h1 ~ p", "a:hover", "p::before", "p.", "#", "[a|=b]",
            "[a=b", "p*", "[]", "[a=]", "1p",
        ];
        for text in rejected {
            assert!(parse_selector(text).is_none(), "{text} should be rejected");
        }
    }

    #[test]
    fn test_universal_has_zero_specificity() {
        let selector = parse_selector("*").expect("parses");
        assert_eq!(selector.specificity, Specificity::default());
        assert!(selector.matches(&Element::new("anything")));
        let qualified = parse_selector("*.a[b]").expect("parses");
        assert_eq!(qualified.specificity, Specificity::new(0, 2, 0));
    }

    #[test]
    fn test_matching_respects_every_part() {
        let element = Element::new("P")
            .with_attr("id", "x")
            .with_attr("class", "a  b")
            .with_attr("lang", "en-US");
        assert!(parse_selector("p").expect("p").matches(&element));
        assert!(parse_selector("P.b#x").expect("compound").matches(&element));
        assert!(parse_selector("[lang^=en]").expect("attr").matches(&element));
        assert!(!parse_selector("p.c").expect("class").matches(&element));
        assert!(!parse_selector("div#x").expect("type").matches(&element));
        assert!(!parse_selector("[lang^='']").expect("empty").matches(&element));
    }

    #[test]
    fn test_specificity_order_is_lexicographic() {
        assert!(Specificity::new(1, 0, 0) > Specificity::new(0, 9, 9));
        assert!(Specificity::new(0, 1, 0) > Specificity::new(0, 0, 9));
        assert_eq!(Specificity::new(0, 1, 2).to_string(), "(0,1,2)");
    }
}

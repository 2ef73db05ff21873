//! CSS Cascading
//!
//! This module implements the cascade per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).
//!
//! The cascade runs in two passes. [`collect_matches`] walks the document
//! read-only and records which rules match each element. [`apply_matches`]
//! then sorts each element's declarations by precedence and writes the
//! winners into the element's [`ComputedStyle`](gob_dom::ComputedStyle).
//! [`cascade`] runs both.

use std::collections::HashMap;

use gob_common::warning::warn_once;
use gob_dom::{Document, Element};
use strum_macros::Display;

use crate::parse_declaration_block;
use crate::parser::{Declaration, StyleRule, Stylesheet};
use crate::selector::{Specificity, matching_specificity};
use crate::style::expand_declaration;
use crate::ua_stylesheet::ua_stylesheet;

/// [§ 6.2 Cascading Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
///
/// "Each style rule has a cascade origin, which determines where it enters
/// the cascade."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Origin {
    /// "These are the style sheets provided by the user agent."
    UserAgent,
    /// "The author specifies style sheets for a source document according
    /// to the conventions of the document language."
    Author,
}

/// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// "Declarations from origins earlier in this list win over declarations
/// from later origins:
/// 1. Transition declarations
/// 2. Important user agent declarations
/// 3. Important user declarations
/// 4. Important author declarations
/// 5. Animation declarations
/// 6. Normal author declarations
/// 7. Normal user declarations
/// 8. Normal user agent declarations"
///
/// Listed here weakest first, so the derived order is the application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CascadeLevel {
    UserAgentNormal,
    AuthorNormal,
    AuthorImportant,
    UserAgentImportant,
}

impl CascadeLevel {
    const fn of(origin: Origin, important: bool) -> Self {
        match (origin, important) {
            (Origin::UserAgent, false) => Self::UserAgentNormal,
            (Origin::Author, false) => Self::AuthorNormal,
            (Origin::Author, true) => Self::AuthorImportant,
            (Origin::UserAgent, true) => Self::UserAgentImportant,
        }
    }
}

/// A rule that matched an element, with what the cascade needs to order it.
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule<'a> {
    /// The matching rule.
    pub rule: &'a StyleRule,
    /// Specificity of the rule's most specific selector matching the element.
    pub specificity: Specificity,
    /// Where the rule came from.
    pub origin: Origin,
    /// Position of the rule's stylesheet among those of its origin.
    pub sheet_index: usize,
    /// Position of the rule within its stylesheet.
    pub rule_index: usize,
}

/// Everything that applies to one element.
#[derive(Debug, Clone)]
pub struct ElementMatches<'a> {
    /// The element's pre-order index, as reported by [`Document::elements`].
    pub element_index: usize,
    /// Matching rules in stylesheet order.
    pub rules: Vec<MatchedRule<'a>>,
    /// Declarations from the element's `style` attribute.
    pub inline: Vec<Declaration>,
}

impl ElementMatches<'_> {
    /// Whether nothing applies to the element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.inline.is_empty()
    }
}

/// What a cascade pass applied.
///
/// A document with no author styles is a normal outcome, reported here
/// rather than as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Number of (element, author rule) matches.
    pub rules_matched: usize,
    /// Author declarations applied, `style` attributes included.
    pub author_declarations: usize,
    /// User-agent declarations applied.
    pub ua_declarations: usize,
}

impl CascadeReport {
    /// Whether any author declaration was applied.
    #[must_use]
    pub const fn applied_any(&self) -> bool {
        self.author_declarations > 0
    }
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Style every element of the document: the user-agent stylesheet first,
/// then `stylesheets` in order as author sheets.
pub fn cascade(document: &mut Document, stylesheets: &[&Stylesheet]) -> CascadeReport {
    let matches = collect_matches(document, stylesheets);
    apply_matches(document, &matches)
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Find the rules matching each element, in pre-order. The user-agent
/// stylesheet is matched first; `stylesheets` are author sheets.
///
/// The document is not modified.
#[must_use]
pub fn collect_matches<'a>(
    document: &Document,
    stylesheets: &[&'a Stylesheet],
) -> Vec<ElementMatches<'a>> {
    let ua: &'a Stylesheet = ua_stylesheet();
    let sheets: Vec<(Origin, usize, &'a Stylesheet)> = std::iter::once((Origin::UserAgent, 0, ua))
        .chain(
            stylesheets
                .iter()
                .enumerate()
                .map(|(index, &sheet)| (Origin::Author, index, sheet)),
        )
        .collect();

    document
        .elements()
        .enumerate()
        .map(|(element_index, element)| ElementMatches {
            element_index,
            rules: matching_rules(element, &sheets),
            inline: inline_declarations(element),
        })
        .collect()
}

/// Every rule of every sheet that matches the element.
fn matching_rules<'a>(
    element: &Element,
    sheets: &[(Origin, usize, &'a Stylesheet)],
) -> Vec<MatchedRule<'a>> {
    sheets
        .iter()
        .flat_map(|&(origin, sheet_index, sheet)| {
            sheet
                .rules
                .iter()
                .enumerate()
                .filter_map(move |(rule_index, rule)| {
                    matching_specificity(element, rule).map(|specificity| MatchedRule {
                        rule,
                        specificity,
                        origin,
                        sheet_index,
                        rule_index,
                    })
                })
        })
        .collect()
}

/// [CSS Style Attributes § 3](https://www.w3.org/TR/css-style-attr/#interpret)
///
/// "The declarations in a style attribute apply only to the element on which
/// the attribute appears."
fn inline_declarations(element: &Element) -> Vec<Declaration> {
    element
        .attr("style")
        .map(parse_declaration_block)
        .unwrap_or_default()
}

/// Sort key for one declaration. Fields compare in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Precedence {
    level: CascadeLevel,
    /// [§ 6.4.4 Element-Attached Styles](https://www.w3.org/TR/css-cascade-4/#style-attr)
    /// "Declarations that do not belong to a style rule (such as the contents
    /// of a style attribute) are considered to have a specificity higher than
    /// any selector."
    inline: bool,
    specificity: Specificity,
    sheet_index: usize,
    rule_index: usize,
    declaration_index: usize,
}

/// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Write the cascaded value of every property into each element's style.
/// Styles are cleared first, so applying twice gives the same result.
pub fn apply_matches(document: &mut Document, matches: &[ElementMatches<'_>]) -> CascadeReport {
    let by_index: HashMap<usize, &ElementMatches<'_>> =
        matches.iter().map(|m| (m.element_index, m)).collect();
    let mut report = CascadeReport::default();

    document.for_each_element_mut(|index, element| {
        element.style.clear();
        if let Some(matched) = by_index.get(&index) {
            apply_to_element(element, matched, &mut report);
        }
    });

    report
}

fn apply_to_element(
    element: &mut Element,
    matched: &ElementMatches<'_>,
    report: &mut CascadeReport,
) {
    // STEP 1: Gather every declaration with its precedence.
    let from_rules = matched.rules.iter().flat_map(|m| {
        m.rule
            .declarations
            .iter()
            .enumerate()
            .map(move |(declaration_index, declaration)| {
                let precedence = Precedence {
                    level: CascadeLevel::of(m.origin, declaration.important),
                    inline: false,
                    specificity: m.specificity,
                    sheet_index: m.sheet_index,
                    rule_index: m.rule_index,
                    declaration_index,
                };
                (precedence, m.origin, declaration)
            })
    });
    let from_attribute = matched
        .inline
        .iter()
        .enumerate()
        .map(|(declaration_index, declaration)| {
            let precedence = Precedence {
                level: CascadeLevel::of(Origin::Author, declaration.important),
                inline: true,
                specificity: Specificity::default(),
                sheet_index: 0,
                rule_index: 0,
                declaration_index,
            };
            (precedence, Origin::Author, declaration)
        });
    let mut declarations: Vec<_> = from_rules.chain(from_attribute).collect();

    // STEP 2: "The declaration with the highest precedence wins." Applying in
    // ascending order lets each later declaration overwrite earlier ones.
    declarations.sort_by_key(|&(precedence, _, _)| precedence);

    // STEP 3: Expand shorthands and store the longhands.
    for (_, origin, declaration) in declarations {
        match expand_declaration(&declaration.name, &declaration.value) {
            Ok(longhands) => {
                for (property, value) in longhands {
                    element.style.set(property, &value);
                }
                match origin {
                    Origin::UserAgent => report.ua_declarations += 1,
                    Origin::Author => report.author_declarations += 1,
                }
            }
            Err(err) => warn_once("Cascade", &format!("{err}; declaration ignored")),
        }
    }

    report.rules_matched += matched
        .rules
        .iter()
        .filter(|m| m.origin == Origin::Author)
        .count();
}

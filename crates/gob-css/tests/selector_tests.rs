//! Integration tests for selector parsing, matching, and specificity.

use gob_css::selector::{Specificity, matches, matching_specificity, parse_selector};
use gob_css::{Stylesheet, parse_stylesheet};
use gob_dom::Element;
use quickcheck_macros::quickcheck;

fn rule_sheet(css: &str) -> Stylesheet {
    let sheet = parse_stylesheet(css);
    assert_eq!(sheet.rules.len(), 1, "expected one rule from {css:?}");
    sheet
}

#[test]
fn test_selector_list_matches_any_member() {
    let sheet = rule_sheet("h1, .intro, #main { color: red }");
    let rule = &sheet.rules[0];
    assert!(matches(&Element::new("h1"), rule));
    assert!(matches(&Element::new("p").with_attr("class", "lead intro"), rule));
    assert!(matches(&Element::new("div").with_attr("id", "main"), rule));
    assert!(!matches(&Element::new("p").with_attr("class", "introduction"), rule));
}

#[test]
fn test_list_specificity_is_best_matching_member() {
    let sheet = rule_sheet("p, p.note, #x { color: red }");
    let rule = &sheet.rules[0];
    let plain = Element::new("p");
    let note = Element::new("p").with_attr("class", "note");
    let both = Element::new("p").with_attr("class", "note").with_attr("id", "x");
    assert_eq!(matching_specificity(&plain, rule), Some(Specificity::new(0, 0, 1)));
    assert_eq!(matching_specificity(&note, rule), Some(Specificity::new(0, 1, 1)));
    assert_eq!(matching_specificity(&both, rule), Some(Specificity::new(1, 0, 0)));
    assert_eq!(matching_specificity(&Element::new("div"), rule), None);
}

#[test]
fn test_tag_names_compare_case_insensitively() {
    let selector = parse_selector("DIV.box").unwrap();
    assert!(selector.matches(&Element::new("div").with_attr("class", "box")));
    assert!(!selector.matches(&Element::new("div").with_attr("class", "Box")));
}

#[test]
fn test_attribute_operators() {
    let link = Element::new("a")
        .with_attr("href", "https://example.com/logo.png")
        .with_attr("rel", "nofollow external");
    for (raw, expected) in [
        ("[href]", true),
        ("[title]", false),
        ("[rel~=external]", true),
        ("[rel~=extern]", false),
        ("[href^=https]", true),
        (r#"[href$=".png"]"#, true),
        ("[href*=example]", true),
        ("[rel=nofollow]", false),
    ] {
        let selector = parse_selector(raw).unwrap();
        assert_eq!(selector.matches(&link), expected, "{raw}");
    }
}

#[test]
fn test_rules_with_only_unsupported_selectors_are_dropped() {
    let sheet = parse_stylesheet(
        "a:hover { color: red } ul li { color: blue } p ~ p {} em { color: green }",
    );
    assert_eq!(sheet.rules.len(), 1);
    assert!(matches(&Element::new("em"), &sheet.rules[0]));
}

/// Matching is a pure function of element and rule.
#[quickcheck]
fn prop_matching_is_deterministic(tag: u8, id: Option<u8>, classes: Vec<u8>, pick: u8) -> bool {
    const SELECTORS: &[&str] = &[
        "*", "p", "div", ".a", ".b", "#x", "p.a", "div#x.b", "[id]", "[class~=c]",
        "[id^=y]", ".a.b.c", "p, .b, #z",
    ];
    let name = |n: u8| ["a", "b", "c", "x", "y", "z"][usize::from(n % 6)];

    let mut element = Element::new(["p", "div", "span"][usize::from(tag % 3)]);
    if let Some(id) = id {
        element = element.with_attr("id", name(id));
    }
    let class_list: Vec<&str> = classes.iter().map(|&c| name(c)).collect();
    element = element.with_attr("class", &class_list.join(" "));

    let css = format!("{} {{ color: red }}", SELECTORS[usize::from(pick) % SELECTORS.len()]);
    let sheet = parse_stylesheet(&css);
    let rule = &sheet.rules[0];
    let before = element.clone();

    let first = (matches(&element, rule), matching_specificity(&element, rule));
    let second = (matches(&element, rule), matching_specificity(&element, rule));
    first == second && element == before && first.0 == first.1.is_some()
}

//! Integration tests for the cascade: origins, specificity, order, and
//! style attributes, run against parsed HTML documents.

use gob_css::cascade::cascade;
use gob_css::{ColorValue, UsedStyle, parse_stylesheet};
use gob_dom::{ComputedStyle, Document};
use gob_html::parse_document;

fn styled(html: &str, css: &str) -> Document {
    let mut document = parse_document(html).unwrap();
    let sheet = parse_stylesheet(css);
    let _ = cascade(&mut document, &[&sheet]);
    document
}

fn style_of<'a>(document: &'a Document, tag: &str) -> &'a ComputedStyle {
    &document.find_first(tag).unwrap().style
}

#[test]
fn test_later_rule_wins_at_equal_specificity() {
    let document = styled(
        "<p>one</p><div><p>two</p></div>",
        "p { color: red; } p { color: blue; }",
    );
    for p in document.find_all("p") {
        assert_eq!(p.style.get("color"), Some("blue"));
    }
}

#[test]
fn test_id_beats_later_type_rule() {
    let document = styled(
        r#"<p id="x">styled</p>"#,
        "#x { color: red; } p { color: blue; }",
    );
    assert_eq!(style_of(&document, "p").get("color"), Some("red"));
}

#[test]
fn test_specificity_law_holds_in_either_order() {
    for css in [
        "#x { color: red; } p { color: blue; }",
        "p { color: blue; } #x { color: red; }",
    ] {
        let document = styled(r#"<p id="x">a</p>"#, css);
        assert_eq!(style_of(&document, "p").get("color"), Some("red"), "{css}");
    }
}

#[test]
fn test_class_beats_type_and_loses_to_id() {
    let document = styled(
        r#"<p class="note" id="main">a</p>"#,
        "#main { color: green } .note { color: red; background-color: gray } p { color: blue; background-color: white }",
    );
    let style = style_of(&document, "p");
    assert_eq!(style.get("color"), Some("green"));
    assert_eq!(style.get("background-color"), Some("gray"));
}

#[test]
fn test_important_beats_specificity() {
    let document = styled(
        r#"<p id="x">a</p>"#,
        "p { color: blue !important; } #x { color: red; }",
    );
    assert_eq!(style_of(&document, "p").get("color"), Some("blue"));
}

#[test]
fn test_style_attribute_beats_id_rule() {
    let document = styled(
        r#"<p id="x" style="color: orange">a</p>"#,
        "#x { color: red; }",
    );
    assert_eq!(style_of(&document, "p").get("color"), Some("orange"));
}

#[test]
fn test_important_rule_beats_style_attribute() {
    let document = styled(
        r#"<p style="color: orange">a</p>"#,
        "p { color: red !important; }",
    );
    assert_eq!(style_of(&document, "p").get("color"), Some("red"));
}

#[test]
fn test_malformed_declaration_is_skipped_alone() {
    let document = styled(
        "<p>a</p>",
        "p { color: red; width: ; margin-left: blue; frobnicate: 3; background-color: yellow; }",
    );
    let style = style_of(&document, "p");
    assert_eq!(style.get("color"), Some("red"));
    assert_eq!(style.get("background-color"), Some("yellow"));
    assert_eq!(style.get("width"), None);
    assert_eq!(style.get("margin-left"), None);
}

#[test]
fn test_unsupported_selector_drops_only_its_rule() {
    let document = styled(
        "<div><p>a</p></div>",
        "div > p { color: red; } p { color: blue; }",
    );
    assert_eq!(style_of(&document, "p").get("color"), Some("blue"));
}

#[test]
fn test_shorthands_expand_to_longhands() {
    let document = styled("<p>a</p>", "p { margin: 1px 2px; padding: 3px; background: teal; }");
    let style = style_of(&document, "p");
    assert_eq!(style.get("margin-top"), Some("1px"));
    assert_eq!(style.get("margin-right"), Some("2px"));
    assert_eq!(style.get("margin-bottom"), Some("1px"));
    assert_eq!(style.get("margin-left"), Some("2px"));
    assert_eq!(style.get("padding-left"), Some("3px"));
    assert_eq!(style.get("background-color"), Some("teal"));
    assert_eq!(style.get("margin"), None);
}

#[test]
fn test_user_agent_display_defaults() {
    let document = styled(
        "<head><title>t</title></head><body><p>a <b>b</b> <span>c</span></p><ul><li>d</li></ul></body>",
        "",
    );
    assert_eq!(style_of(&document, "html").get("display"), Some("block"));
    assert_eq!(style_of(&document, "head").get("display"), Some("none"));
    assert_eq!(style_of(&document, "p").get("display"), Some("block"));
    assert_eq!(style_of(&document, "li").get("display"), Some("list-item"));
    assert_eq!(style_of(&document, "span").get("display"), None);
    assert_eq!(style_of(&document, "b").get("font-weight"), Some("bolder"));
    assert!(style_of(&document, "p").get("margin-top").is_none());
}

#[test]
fn test_author_rule_overrides_user_agent_display() {
    let document = styled(
        "<p>a</p><span>b</span>",
        "p { display: inline } span { display: block }",
    );
    assert_eq!(style_of(&document, "p").get("display"), Some("inline"));
    assert_eq!(style_of(&document, "span").get("display"), Some("block"));
}

#[test]
fn test_used_style_inherits_color_but_not_margins() {
    let document = styled(
        "<div><p>text</p></div>",
        "div { color: #ff0000; margin-left: 10px; font-size: 20px } p { font-size: 2em }",
    );
    let div = UsedStyle::compute(style_of(&document, "div"), &UsedStyle::initial());
    let p = UsedStyle::compute(style_of(&document, "p"), &div);
    assert_eq!(div.margin.left.to_px(20.0, 0.0), Some(10.0));
    assert_eq!(p.color, Some(ColorValue::rgb(255, 0, 0)));
    assert_eq!(p.font_size, 40.0);
    assert_eq!(p.margin.left.to_px(40.0, 0.0), Some(0.0));
}

#[test]
fn test_report_counts_author_declarations() {
    let mut document = parse_document("<p>a</p><p>b</p>").unwrap();
    let sheet = parse_stylesheet("p { color: red; margin: 0 }");
    let report = cascade(&mut document, &[&sheet]);
    assert_eq!(report.rules_matched, 2);
    assert_eq!(report.author_declarations, 4);
    assert!(report.applied_any());

    let report = cascade(&mut document, &[]);
    assert!(!report.applied_any());
    assert!(report.ua_declarations > 0);
}

#[test]
fn test_later_stylesheet_wins_ties() {
    let mut document = parse_document("<p>a</p>").unwrap();
    let first = parse_stylesheet("p { color: red }");
    let second = parse_stylesheet("p { color: blue }");
    let _ = cascade(&mut document, &[&first, &second]);
    assert_eq!(style_of(&document, "p").get("color"), Some("blue"));
}

#[test]
fn test_cascade_is_deterministic() {
    let html = r#"<div class="a" id="b"><p style="color: red">x</p><em>y</em></div>"#;
    let css = ".a { padding: 1px 2px 3px } em { color: navy !important } p, em { font-size: 12px }";
    let mut document = parse_document(html).unwrap();
    let sheet = parse_stylesheet(css);

    let _ = cascade(&mut document, &[&sheet]);
    let first = document.clone();
    let _ = cascade(&mut document, &[&sheet]);
    assert_eq!(document, first);
}

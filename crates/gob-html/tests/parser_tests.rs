//! Integration tests for the HTML tree builder.

use gob_dom::{Document, Element, Node};
use gob_html::{HtmlError, IssueKind, parse_bytes, parse_document, parse_with_issues, serialize};
use quickcheck_macros::quickcheck;

/// Helper to parse HTML that is expected to be well formed enough
fn parse(html: &str) -> Document {
    parse_document(html).expect("html should parse")
}

/// Helper to list the tag names of an element's element children
fn child_tags(element: &Element) -> Vec<&str> {
    element
        .child_elements()
        .map(|child| child.tag_name.as_str())
        .collect()
}

#[test]
fn test_document_structure() {
    let doc = parse("<!DOCTYPE html><html lang=en><head></head><body></body></html>");
    let root = doc.root();
    assert_eq!(root.tag_name, "html");
    assert_eq!(root.attr("lang"), Some("en"));
    assert_eq!(child_tags(root), vec!["head", "body"]);
}

#[test]
fn test_fragment_gets_synthesized_root() {
    let doc = parse("<p>Hello world</p>");
    assert_eq!(doc.root().tag_name, "html");
    assert_eq!(child_tags(doc.root()), vec!["p"]);
    assert_eq!(doc.text_content(), "Hello world");
}

#[test]
fn test_empty_input_is_empty_document() {
    let doc = parse("");
    assert!(doc.is_empty());
    assert_eq!(doc.element_count(), 1);
}

#[test]
fn test_comments_and_doctype_are_dropped() {
    let doc = parse("<!doctype html><!-- c --><p>a<!-- d -->b</p>");
    let p = doc.find_first("p").expect("p");
    assert_eq!(p.children, vec![Node::Text("ab".to_string())]);
}

#[test]
fn test_unclosed_paragraph_closed_by_block() {
    let doc = parse("<body><p>one<div>two</div></body>");
    let body = doc.find_first("body").expect("body");
    assert_eq!(child_tags(body), vec!["p", "div"]);
    assert_eq!(doc.find_first("p").expect("p").text_content(), "one");
}

#[test]
fn test_paragraph_closes_paragraph() {
    let doc = parse("<p>one<p>two<p>three");
    assert_eq!(child_tags(doc.root()), vec!["p", "p", "p"]);
    assert_eq!(doc.text_runs(), vec!["one", "two", "three"]);
}

#[test]
fn test_inline_does_not_close_paragraph() {
    let doc = parse("<p>one <b>two</b> three</p>");
    let p = doc.find_first("p").expect("p");
    assert_eq!(child_tags(p), vec!["b"]);
    assert_eq!(p.text_content(), "one two three");
}

#[test]
fn test_list_items_close_each_other() {
    let doc = parse("<ul><li>a<li>b<ul><li>c</ul><li>d</ul>");
    let ul = doc.find_first("ul").expect("ul");
    assert_eq!(child_tags(ul), vec!["li", "li", "li"]);
    let nested = doc.find_all("ul")[1];
    assert_eq!(child_tags(nested), vec!["li"]);
    assert_eq!(nested.text_content(), "c");
}

#[test]
fn test_definition_terms_close_each_other() {
    let doc = parse("<dl><dt>t<dd>d<dt>u</dl>");
    let dl = doc.find_first("dl").expect("dl");
    assert_eq!(child_tags(dl), vec!["dt", "dd", "dt"]);
}

#[test]
fn test_table_cells_close_each_other() {
    let doc = parse("<table><tr><td>1<td>2<tr><td>3</table>");
    let table = doc.find_first("table").expect("table");
    assert_eq!(child_tags(table), vec!["tr", "tr"]);
    assert_eq!(doc.find_all("td").len(), 3);
    assert_eq!(child_tags(table.child_elements().next().expect("tr")), vec!["td", "td"]);
}

#[test]
fn test_heading_closes_open_heading() {
    let doc = parse("<h1>a<h2>b");
    assert_eq!(child_tags(doc.root()), vec!["h1", "h2"]);
}

#[test]
fn test_void_elements_take_no_children() {
    let doc = parse("<p>line<br>next<img src=x.png>after</p>");
    let p = doc.find_first("p").expect("p");
    assert_eq!(child_tags(p), vec!["br", "img"]);
    assert_eq!(p.children.len(), 5);
}

#[test]
fn test_br_end_tag_is_a_line_break() {
    let doc = parse("<p>a</br>b</p>");
    assert_eq!(child_tags(doc.find_first("p").expect("p")), vec!["br"]);
}

#[test]
fn test_unknown_tags_are_kept() {
    let doc = parse("<x-card><blink>hi</blink></x-card>");
    let card = doc.find_first("x-card").expect("custom element kept");
    assert_eq!(child_tags(card), vec!["blink"]);
}

#[test]
fn test_stray_end_tag_is_ignored_and_reported() {
    let (doc, issues) = parse_with_issues("<div>a</span>b</div>").expect("parses");
    assert_eq!(doc.find_first("div").expect("div").text_content(), "ab");
    assert!(issues.iter().any(|i| i.kind == IssueKind::StrayEndTag));
}

#[test]
fn test_misnested_end_tag_closes_through() {
    let (doc, issues) = parse_with_issues("<div><span>a</div>b").expect("parses");
    let div = doc.find_first("div").expect("div");
    assert_eq!(div.text_content(), "a");
    assert_eq!(doc.root().children.last(), Some(&Node::Text("b".to_string())));
    assert!(issues.iter().any(|i| i.kind == IssueKind::MisnestedEndTag));
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let (doc, issues) = parse_with_issues(r#"<p class="a" class="b">x</p>"#).expect("parses");
    assert_eq!(doc.find_first("p").expect("p").attr("class"), Some("a"));
    assert!(issues.iter().any(|i| i.kind == IssueKind::DuplicateAttribute));
}

#[test]
fn test_style_element_keeps_raw_text() {
    let doc = parse("<head><style>p > a { color: red }</style></head><p>x</p>");
    let style = doc.find_first("style").expect("style");
    assert_eq!(style.text_content(), "p > a { color: red }");
}

#[test]
fn test_unclosed_elements_closed_at_eof() {
    let doc = parse("<div><section><p>deep");
    assert_eq!(doc.find_first("p").expect("p").text_content(), "deep");
    assert_eq!(doc.element_count(), 4);
}

#[test]
fn test_eof_mid_tag_is_malformed_markup() {
    let err = parse_document("<p>Hello</p><p cla").expect_err("must fail");
    assert!(matches!(err, HtmlError::MalformedMarkup { .. }));
    assert!(err.to_string().contains("malformed markup"));
}

#[test]
fn test_bytes_are_decoded_lossily() {
    let doc = parse_bytes(b"<p>caf\xC3\xA9 \xFF</p>").expect("parses");
    assert_eq!(doc.text_content(), "caf\u{e9} \u{FFFD}");
}

#[test]
fn test_serialize_reparses_to_same_tree() {
    let doc = parse(r#"<div class="a"><p title="x &quot;y&quot;">1 &lt; 2 &amp; 3<br>z</p></div>"#);
    let html = serialize(&doc);
    assert_eq!(parse(&html), doc);
}

/// Text without markup delimiters survives parsing unchanged, in order.
#[quickcheck]
fn prop_plain_text_round_trips(text: String) -> bool {
    let text: String = text.chars().filter(|c| *c != '<' && *c != '&').collect();
    let doc = parse(&text);
    doc.text_content() == text
}

/// Text runs separated by elements keep their order.
#[quickcheck]
fn prop_text_runs_keep_order(runs: Vec<String>) -> bool {
    let runs: Vec<String> = runs
        .into_iter()
        .map(|run| run.chars().filter(|c| *c != '<' && *c != '&').collect::<String>())
        .filter(|run| !run.is_empty())
        .collect();
    let html: String = runs.iter().map(|run| format!("<span>{run}</span>")).collect();
    let doc = parse(&html);
    doc.text_runs() == runs.iter().map(String::as_str).collect::<Vec<_>>()
}

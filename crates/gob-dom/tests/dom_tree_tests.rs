//! Tests for document traversal and element helpers.

use gob_dom::{ComputedStyle, Document, Element, Node};

/// `<html><body><div id="a"><p class="x y">one</p>two</div><p>three</p></body></html>`
fn sample() -> Document {
    let div = Element::new("div")
        .with_attr("id", "a")
        .with_child(Element::new("p").with_attr("class", "x  y").with_text("one"))
        .with_text("two");
    let body = Element::new("body")
        .with_child(div)
        .with_child(Element::new("P").with_text("three"));
    Document::new(Element::new("html").with_child(body))
}

#[test]
fn test_elements_are_visited_in_pre_order() {
    let doc = sample();
    let tags: Vec<&str> = doc.elements().map(|e| e.tag_name.as_str()).collect();
    assert_eq!(tags, vec!["html", "body", "div", "p", "p"]);
    assert_eq!(doc.element_count(), 5);
}

#[test]
fn test_mutable_visit_uses_same_indices() {
    let mut doc = sample();
    let mut seen = Vec::new();
    doc.for_each_element_mut(|index, element| {
        seen.push((index, element.tag_name.clone()));
        element.style.set("order", &index.to_string());
    });
    let expected: Vec<(usize, String)> = doc
        .elements()
        .enumerate()
        .map(|(i, e)| (i, e.tag_name.clone()))
        .collect();
    assert_eq!(seen, expected);

    for (index, element) in doc.elements().enumerate() {
        assert_eq!(element.style.get("order"), Some(index.to_string().as_str()));
    }
}

#[test]
fn test_text_runs_in_document_order() {
    let doc = sample();
    assert_eq!(doc.text_runs(), vec!["one", "two", "three"]);
    assert_eq!(doc.text_content(), "onetwothree");
}

#[test]
fn test_classes_split_on_any_whitespace() {
    let doc = sample();
    let p = doc.find_first("p").expect("p exists");
    assert_eq!(p.classes().collect::<Vec<_>>(), vec!["x", "y"]);
    assert!(p.has_class("y"));
    assert!(!p.has_class("x y"));
}

#[test]
fn test_find_by_id() {
    let doc = sample();
    let div = doc.find_by_id("a").expect("div#a exists");
    assert_eq!(div.tag_name, "div");
    assert!(doc.find_by_id("missing").is_none());
}

#[test]
fn test_tag_names_are_lowercased() {
    let doc = sample();
    assert_eq!(doc.find_all("p").len(), 2);
}

#[test]
fn test_append_text_merges_adjacent_text() {
    let mut element = Element::new("p");
    element.append_text("Hello");
    element.append_text(" world");
    element.append_text("");
    assert_eq!(element.children, vec![Node::Text("Hello world".to_string())]);
}

#[test]
fn test_empty_document() {
    assert!(Document::default().is_empty());

    let whitespace_only = Document::new(Element::new("html").with_text("  \n\t"));
    assert!(whitespace_only.is_empty());

    let with_element = Document::new(Element::new("html").with_child(Element::new("div")));
    assert!(!with_element.is_empty());
}

#[test]
fn test_computed_style_replaces_values() {
    let mut style = ComputedStyle::new();
    assert!(style.is_empty());
    style.set("color", "red");
    style.set("COLOR", "blue");
    assert_eq!(style.get("color"), Some("blue"));
    assert_eq!(style.len(), 1);
}

#[test]
fn test_start_tag_display() {
    let element = Element::new("a").with_attr("href", "/x").with_attr("class", "c");
    assert_eq!(element.to_string(), "<a class=\"c\" href=\"/x\">");
}

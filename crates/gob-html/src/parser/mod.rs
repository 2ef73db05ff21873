//! HTML parser module for tree construction.

use std::fmt::Write;

use gob_dom::{Document, Element, Node};

/// HTML tree builder implementation.
pub mod tree_builder;

pub use tree_builder::{HTMLParser, IssueKind, ParseIssue};

/// Elements serialized without escaping their text content.
const RAW_TEXT_PARENTS: &[&str] = &["style", "script", "title", "textarea", "xmp", "noscript"];

/// Print a document tree to stdout for debugging.
pub fn print_tree(document: &Document) {
    print!("{}", format_tree(document));
}

/// Render a document tree as an indented outline, one node per line.
///
/// ```text
/// <html>
///   <body>
///     <p class="intro">
///       "Hello"
/// ```
#[must_use]
pub fn format_tree(document: &Document) -> String {
    let mut out = String::new();
    format_element(document.root(), 0, &mut out);
    out
}

fn format_element(element: &Element, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{element}");
    for child in &element.children {
        match child {
            Node::Element(child) => format_element(child, depth + 1, out),
            Node::Text(text) => {
                let _ = writeln!(out, "{indent}  {text:?}");
            }
        }
    }
}

/// [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// Serializes the document back to markup. Parsing the output again yields
/// an equal tree.
#[must_use]
pub fn serialize(document: &Document) -> String {
    let mut out = String::new();
    serialize_element(document.root(), &mut out);
    out
}

fn serialize_element(element: &Element, out: &mut String) {
    let _ = write!(out, "<{}", element.tag_name);
    let mut attrs: Vec<_> = element.attrs.iter().collect();
    attrs.sort();
    for (name, value) in attrs {
        let _ = write!(out, " {name}=\"");
        for c in value.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '"' => out.push_str("&quot;"),
                '\u{00A0}' => out.push_str("&nbsp;"),
                c => out.push(c),
            }
        }
        out.push('"');
    }
    out.push('>');
    if is_void(&element.tag_name) {
        return;
    }
    let raw = RAW_TEXT_PARENTS.contains(&element.tag_name.as_str());
    for child in &element.children {
        match child {
            Node::Element(child) => serialize_element(child, out),
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => escape_text(text, out),
        }
    }
    let _ = write!(out, "</{}>", element.tag_name);
}

/// "Escaping a string ... Replace any occurrence of the "&" character by the
/// string "&amp;". Replace any occurrences of the U+00A0 NO-BREAK SPACE
/// character by the string "&nbsp;". ... replace any occurrences of the "<"
/// character by the string "&lt;", and any occurrences of the ">" character
/// by the string "&gt;"."
fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn is_void(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

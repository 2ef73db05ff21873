//! Document tree for the gob engine.
//!
//! This crate provides an owned DOM tree following the shape of the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), reduced to the two
//! node kinds the pipeline renders: elements and text.
//!
//! # Design
//!
//! Every child is owned exclusively by its parent element, so the tree is
//! acyclic by construction and there are no back references. Traversal is
//! always top-down: the cascade visits elements in pre-order and identifies
//! them by their pre-order index (see [`Document::elements`] and
//! [`Document::for_each_element_mut`]).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// Comments, doctypes and processing instructions are dropped by the parser,
/// so only elements and text survive into the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(Element),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
}

impl Node {
    /// Returns the element if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Returns the element mutably if this node is one.
    #[must_use]
    pub const fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Returns the character data if this node is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Per-element mapping from property name to resolved value text.
///
/// Empty after parsing, filled once by the cascade, read-only afterwards.
/// Values are stored the way the stylesheet parser normalized them
/// (`"blue"`, `"12px"`, `"0 auto"`); typed interpretation is layout's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    /// Creates an empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    /// Sets a property, replacing any earlier value.
    pub fn set(&mut self, property: &str, value: &str) {
        let _ = self
            .properties
            .insert(property.to_ascii_lowercase(), value.to_string());
    }

    /// Returns the value of a property, if one was applied.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Number of properties with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when no declaration was applied to the element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates `(property, value)` pairs in property-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Removes every property (used when a document is re-styled).
    pub fn clear(&mut self) {
        self.properties.clear();
    }
}

/// Element data: tag, attributes, children and the applied style.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "When an element is created, its local name is always given."
///
/// NOTE: Namespaces are not modeled. Tag names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Declarations folded in by the cascade.
    pub style: ComputedStyle,
}

impl Element {
    /// Creates an element with no attributes or children.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Builder helper: adds an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        let _ = self
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Builder helper: appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder helper: appends a text child.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.append_text(text);
        self
    }

    /// Appends a child node.
    pub fn append_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Appends character data, merging with a trailing text node.
    ///
    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    pub fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Returns the class names from the class attribute.
    ///
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the
    /// element belongs to."
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// True if `class` is one of the element's classes.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated character data of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
///
/// Owns the root element (conventionally `<html>`). The tree is not modified
/// after parsing except for the style annotations written by the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Element::new("html"))
    }
}

impl Document {
    /// Wraps a root element.
    #[must_use]
    pub const fn new(root: Element) -> Self {
        Self { root }
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// The root element, mutably.
    #[must_use]
    pub const fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// A document is empty when it has no elements below the root and no
    /// text other than whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.iter().all(|child| match child {
            Node::Text(text) => text.trim().is_empty(),
            Node::Element(_) => false,
        })
    }

    /// Pre-order traversal of every element, the root first.
    ///
    /// The position of an element in this sequence is its element index,
    /// the same index [`Document::for_each_element_mut`] reports.
    #[must_use]
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: vec![&self.root],
        }
    }

    /// Number of elements in the tree, the root included.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// Visits every element mutably in pre-order, passing its element index.
    pub fn for_each_element_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(usize, &mut Element),
    {
        let mut index = 0;
        visit_mut(&mut self.root, &mut index, &mut visit);
    }

    /// Text node contents in document order.
    #[must_use]
    pub fn text_runs(&self) -> Vec<&str> {
        let mut runs = Vec::new();
        let mut stack: Vec<&Node> = self.root.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(text) => runs.push(text.as_str()),
                Node::Element(element) => stack.extend(element.children.iter().rev()),
            }
        }
        runs
    }

    /// Concatenated text of the whole document.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    /// First element (pre-order) with the given tag name.
    #[must_use]
    pub fn find_first(&self, tag_name: &str) -> Option<&Element> {
        self.elements()
            .find(|element| element.tag_name.eq_ignore_ascii_case(tag_name))
    }

    /// All elements (pre-order) with the given tag name.
    #[must_use]
    pub fn find_all(&self, tag_name: &str) -> Vec<&Element> {
        self.elements()
            .filter(|element| element.tag_name.eq_ignore_ascii_case(tag_name))
            .collect()
    }

    /// First element whose id attribute equals `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.elements().find(|element| element.id() == Some(id))
    }
}

fn visit_mut<F>(element: &mut Element, index: &mut usize, visit: &mut F)
where
    F: FnMut(usize, &mut Element),
{
    visit(*index, element);
    *index += 1;
    for child in &mut element.children {
        if let Node::Element(child) = child {
            visit_mut(child, index, visit);
        }
    }
}

/// Pre-order element iterator returned by [`Document::elements`].
#[derive(Debug)]
pub struct Elements<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.child_elements().rev());
        Some(element)
    }
}

impl fmt::Display for Element {
    /// Writes the element's start tag, e.g. `<p id="x">`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        let mut attrs: Vec<_> = self.attrs.iter().collect();
        attrs.sort();
        for (name, value) in attrs {
            write!(f, " {name}=\"{value}\"")?;
        }
        write!(f, ">")
    }
}

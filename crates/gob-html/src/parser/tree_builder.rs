use strum_macros::Display;

use gob_common::warning::warn_once;
use gob_dom::{Document, Element};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// The recoverable irregularities the tree builder reports. Names follow the
/// spec's parse error codes where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    /// An end tag with no matching open element in scope.
    StrayEndTag,
    /// An end tag that closed other elements on the way to its match.
    MisnestedEndTag,
    /// A start tag implicitly closed an open element (`<p>a<div>`).
    ImpliedEndTag,
    /// `<div/>`: the self-closing flag on a non-void element is ignored.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// The same attribute appeared twice on one tag; the first wins.
    DuplicateAttribute,
}

/// A recoverable problem found while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Category of the issue.
    pub kind: IssueKind,
    /// Human readable description.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    pub token_index: usize,
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (token {}): {}", self.kind, self.token_index, self.message)
    }
}

/// [§ 13.1.2 Elements - Void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "area, base, br, col, embed, hr, img, input, link, meta, source, track, wbr"
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// Start tags that "close a p element" if one is in button scope.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "li", "dd", "dt", "main", "menu", "nav", "ol", "p", "pre",
    "section", "summary", "table", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// "The stack of open elements is said to have a particular element in scope
/// when it has that element in the specific scope consisting of the following
/// element types: applet, caption, html, table, td, th, marquee, object, template"
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// "...in list item scope ... consisting of the following element types:
/// All the element types listed above for the has an element in scope
/// algorithm. ol in the HTML namespace. ul in the HTML namespace."
const LIST_ITEM_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "ol", "ul",
];

/// "...in button scope ... All the element types listed above for the has an
/// element in scope algorithm. button in the HTML namespace."
const BUTTON_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "button",
];

/// "...in table scope ... html, table, template"
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];

/// Definition lists bound the search for an open `dt`/`dd`.
const DEFINITION_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "dl",
];

/// Tree builder over a token stream.
///
/// Keeps a stack of open elements on top of the root `<html>` element.
/// Children are owned: when an element is popped it is appended to the
/// element beneath it, so the finished tree falls out of the stack.
pub struct HTMLParser {
    tokens: Vec<Token>,
    token_index: usize,
    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<Element>,
    pending_text: String,
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a parser over the tokenizer's output.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            token_index: 0,
            stack_of_open_elements: vec![Element::new("html")],
            pending_text: String::new(),
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the document.
    #[must_use]
    pub fn run(self) -> Document {
        self.run_with_issues().0
    }

    /// Run the parser and return the document together with every
    /// recoverable issue found on the way.
    #[must_use]
    pub fn run_with_issues(mut self) -> (Document, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            self.token_index = index;
            if !self.process_token(token) {
                break;
            }
        }
        let issues = std::mem::take(&mut self.issues);
        (self.finish(), issues)
    }

    /// Returns false once the end-of-file token has been processed.
    fn process_token(&mut self, token: Token) -> bool {
        match token {
            Token::Character { data } => self.pending_text.push(data),
            // Comments and DOCTYPEs have no rendering, so they are not
            // inserted into the tree.
            Token::Comment { .. } | Token::Doctype { .. } => {}
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_start_tag(&name, self_closing, attributes),
            Token::EndTag { name } => self.handle_end_tag(&name),
            Token::EndOfFile => return false,
        }
        true
    }

    fn handle_start_tag(&mut self, name: &str, self_closing: bool, attributes: Vec<Attribute>) {
        self.flush_text();

        // "A start tag whose tag name is "html" - ... For each attribute on the
        // token, check to see if the attribute is already present on the top
        // element of the stack of open elements. If it is not, add the attribute
        // and its corresponding value to that element."
        if name == "html" {
            let root = &mut self.stack_of_open_elements[0];
            for attribute in attributes {
                let _ = root.attrs.entry(attribute.name).or_insert(attribute.value);
            }
            return;
        }

        self.close_implied_elements(name);

        let mut element = Element::new(name);
        for attribute in attributes {
            if element.attrs.contains_key(&attribute.name) {
                self.issue(
                    IssueKind::DuplicateAttribute,
                    format!("duplicate attribute '{}' on <{name}>", attribute.name),
                );
                continue;
            }
            let _ = element.attrs.insert(attribute.name, attribute.value);
        }

        if VOID_ELEMENTS.contains(&name) {
            self.current_node().append_child(element);
            return;
        }
        if self_closing {
            self.issue(
                IssueKind::NonVoidHtmlElementStartTagWithTrailingSolidus,
                format!("<{name}/> treated as <{name}>"),
            );
        }
        self.stack_of_open_elements.push(element);
    }

    fn handle_end_tag(&mut self, name: &str) {
        self.flush_text();
        match name {
            // "An end tag whose tag name is "br" - Parse error. Drop the attributes
            // from the token, and act as described in the next entry; i.e. act as if
            // this was a "br" start tag token with no attributes"
            "br" => {
                self.current_node().append_child(Element::new("br"));
            }
            // The body and html end tags only switch insertion modes; content
            // after them still lands in the open elements. They are closed at EOF.
            "body" | "html" => {}
            _ => {
                let scope = if name == "li" {
                    LIST_ITEM_SCOPE
                } else {
                    DEFAULT_SCOPE
                };
                match self.find_in_scope(&[name], scope) {
                    Some(index) => {
                        if index + 1 != self.stack_of_open_elements.len() {
                            self.issue(
                                IssueKind::MisnestedEndTag,
                                format!("</{name}> closed elements that were still open"),
                            );
                        }
                        self.pop_until(index);
                    }
                    None => {
                        self.issue(IssueKind::StrayEndTag, format!("stray end tag </{name}>"));
                    }
                }
            }
        }
    }

    /// Close elements whose end tag is implied by the incoming start tag.
    fn close_implied_elements(&mut self, incoming: &str) {
        // STEP 1: "If the stack of open elements has a p element in button
        // scope, then close a p element."
        if CLOSES_P.contains(&incoming) {
            self.close_in_scope(&["p"], BUTTON_SCOPE, incoming);
        }

        // STEP 2: element-specific implied end tags.
        match incoming {
            "li" => self.close_in_scope(&["li"], LIST_ITEM_SCOPE, incoming),
            "dt" | "dd" => self.close_in_scope(&["dt", "dd"], DEFINITION_SCOPE, incoming),
            "option" => self.close_current_if(&["option"], incoming),
            "optgroup" => self.close_current_if(&["option", "optgroup"], incoming),
            // Cells are not scope boundaries, so closing the row closes its cells.
            "tr" => self.close_in_scope(&["tr"], TABLE_SCOPE, incoming),
            "td" | "th" => self.close_in_scope(&["td", "th"], TABLE_SCOPE, incoming),
            "thead" | "tbody" | "tfoot" => {
                self.close_in_scope(&["thead", "tbody", "tfoot"], TABLE_SCOPE, incoming);
                self.close_in_scope(&["tr"], TABLE_SCOPE, incoming);
            }
            // "If the current node is an HTML element whose tag name is one of
            // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse error;
            // pop the current node off the stack of open elements."
            h if HEADINGS.contains(&h) => self.close_current_if(HEADINGS, incoming),
            _ => {}
        }
    }

    fn close_in_scope(&mut self, targets: &[&str], scope: &[&str], incoming: &str) {
        if let Some(index) = self.find_in_scope(targets, scope) {
            let closed = self.stack_of_open_elements[index].tag_name.clone();
            self.issue(
                IssueKind::ImpliedEndTag,
                format!("<{incoming}> implicitly closed <{closed}>"),
            );
            self.pop_until(index);
        }
    }

    fn close_current_if(&mut self, targets: &[&str], incoming: &str) {
        let top = self.stack_of_open_elements.len() - 1;
        if top > 0 && targets.contains(&self.stack_of_open_elements[top].tag_name.as_str()) {
            let closed = self.stack_of_open_elements[top].tag_name.clone();
            self.issue(
                IssueKind::ImpliedEndTag,
                format!("<{incoming}> implicitly closed <{closed}>"),
            );
            self.pop_until(top);
        }
    }

    /// [§ 13.2.4.2 Has an element in the specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    ///  2. If node is the target node, terminate in a match state.
    ///  3. Otherwise, if node is one of the element types in list, terminate in a failure state.
    ///  4. Otherwise, set node to the previous entry in the stack of open elements
    ///     and return to step 2."
    ///
    /// Returns the stack index of the match. The root is never returned.
    fn find_in_scope(&self, targets: &[&str], scope: &[&str]) -> Option<usize> {
        for (index, element) in self.stack_of_open_elements.iter().enumerate().skip(1).rev() {
            let tag = element.tag_name.as_str();
            if targets.contains(&tag) {
                return Some(index);
            }
            if scope.contains(&tag) {
                return None;
            }
        }
        None
    }

    /// Pop elements until the one at `index` (inclusive) has been popped,
    /// attaching each popped element to its parent.
    fn pop_until(&mut self, index: usize) {
        let index = index.max(1);
        while self.stack_of_open_elements.len() > index {
            if let Some(element) = self.stack_of_open_elements.pop() {
                self.current_node().append_child(element);
            }
        }
    }

    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&mut self) -> &mut Element {
        let top = self.stack_of_open_elements.len() - 1;
        &mut self.stack_of_open_elements[top]
    }

    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let text = std::mem::take(&mut self.pending_text);
            self.current_node().append_text(&text);
        }
    }

    /// Record a parse issue.
    ///
    /// Logs via gob-common's warning system and stores the issue for later
    /// retrieval. Implied end tags are ordinary HTML and are only stored.
    fn issue(&mut self, kind: IssueKind, message: String) {
        if kind != IssueKind::ImpliedEndTag {
            warn_once("HTML Parser", &format!("{kind}: {message}"));
        }
        self.issues.push(ParseIssue {
            kind,
            message,
            token_index: self.token_index,
        });
    }

    /// [§ 13.2.6.5 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    fn finish(mut self) -> Document {
        self.flush_text();
        self.pop_until(1);
        let root = self
            .stack_of_open_elements
            .pop()
            .unwrap_or_else(|| Element::new("html"));
        Document::new(root)
    }
}

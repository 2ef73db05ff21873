//! HTML tokenizer and parser for the gob engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Text, raw text, tags with attributes, comments and DOCTYPEs
//!   - Numeric and common named character references
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Stack of open elements with implied end tags (`p`, `li`, `dt`/`dd`,
//!     `option`, table rows and cells, headings)
//!   - Void elements, stray end tags, unknown tags kept as generic elements
//!
//! # Errors
//!
//! Markup is parsed tolerantly. The only failure is input that ends in the
//! middle of a tag, reported as [`HtmlError::MalformedMarkup`].
//!
//! # Not Implemented
//!
//! - Insertion modes (head/body are ordinary elements; nothing is synthesized
//!   apart from the root `<html>`)
//! - Adoption agency algorithm and foster parenting
//! - Script execution

use gob_dom::Document;
use thiserror::Error;

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, IssueKind, ParseIssue, format_tree, print_tree, serialize};
pub use tokenizer::{Attribute, HTMLTokenizer, TagState, Token};

/// Errors that abort HTML parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlError {
    /// [§ 13.2.2 eof-in-tag](https://html.spec.whatwg.org/multipage/parsing.html#parse-error-eof-in-tag)
    ///
    /// "This error occurs if the parser encounters the end of the input stream
    /// in a start tag or an end tag (e.g., `<div id=`)."
    #[error("malformed markup: input ended inside a tag at byte {position} ({state} state)")]
    MalformedMarkup {
        /// Byte offset where input ended.
        position: usize,
        /// The [`TagState`] the input ended in.
        state: String,
    },
}

/// Parse an HTML string into a document.
///
/// # Errors
///
/// Returns [`HtmlError::MalformedMarkup`] if the input ends inside a tag.
pub fn parse_document(html: &str) -> Result<Document, HtmlError> {
    parse_with_issues(html).map(|(document, _)| document)
}

/// Parse raw bytes as UTF-8 (invalid sequences become U+FFFD).
///
/// # Errors
///
/// Returns [`HtmlError::MalformedMarkup`] if the input ends inside a tag.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, HtmlError> {
    parse_document(&String::from_utf8_lossy(bytes))
}

/// Parse an HTML string, also returning the recoverable issues.
///
/// # Errors
///
/// Returns [`HtmlError::MalformedMarkup`] if the input ends inside a tag.
pub fn parse_with_issues(html: &str) -> Result<(Document, Vec<ParseIssue>), HtmlError> {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run()?;
    let parser = HTMLParser::new(tokenizer.into_tokens());
    Ok(parser.run_with_issues())
}

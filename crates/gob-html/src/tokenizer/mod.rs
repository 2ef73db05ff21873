//! HTML tokenizer module.
//!
//! Covers the parts of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! that ordinary documents exercise.

/// Character reference decoding per § 13.2.5.72.
pub mod character_reference;
/// Token types produced by the tokenizer.
pub mod token;
/// The tokenizer itself.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use token::{Attribute, Token};
pub use tokenizer::{HTMLTokenizer, TagState};

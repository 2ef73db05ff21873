//! CSS tokenizer module.

/// The token set.
pub mod token;
/// Turns stylesheet text into tokens.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use token::{Bracket, Token};
pub use tokenizer::{Tokenizer, tokenize};

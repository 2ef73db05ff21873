//! The tokens gob's stylesheet grammar is built from.
//!
//! [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
//!
//! This is a subset of the CSS Syntax token set. Gob has no property that
//! takes a `url()`, unicode range or integer/number distinction, so those
//! are folded into simpler tokens:
//!
//! - `url(...)` is an ordinary [`Token::Function`]
//! - a hash token carries only its name
//! - `<!--` and `-->` are whitespace
//! - numbers are always `f64`

use std::fmt;

/// The three bracket pairs that open a nested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `( )`
    Round,
    /// `[ ]`
    Square,
    /// `{ }`
    Curly,
}

impl Bracket {
    /// The bracket that `c` opens, if any.
    #[must_use]
    pub const fn opened_by(c: char) -> Option<Self> {
        match c {
            '(' => Some(Self::Round),
            '[' => Some(Self::Square),
            '{' => Some(Self::Curly),
            _ => None,
        }
    }

    /// The bracket that `c` closes, if any.
    #[must_use]
    pub const fn closed_by(c: char) -> Option<Self> {
        match c {
            ')' => Some(Self::Round),
            ']' => Some(Self::Square),
            '}' => Some(Self::Curly),
            _ => None,
        }
    }

    /// The opening character.
    #[must_use]
    pub const fn open(self) -> char {
        match self {
            Self::Round => '(',
            Self::Square => '[',
            Self::Curly => '{',
        }
    }

    /// The closing character.
    #[must_use]
    pub const fn close(self) -> char {
        match self {
            Self::Round => ')',
            Self::Square => ']',
            Self::Curly => '}',
        }
    }
}

/// A single CSS token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A name such as `color` or `red`.
    Ident(String),
    /// A name directly followed by `(`; the name only.
    Function(String),
    /// `@name`; the name only.
    AtKeyword(String),
    /// `#name`; the name only.
    Hash(String),
    /// A quoted string with its escapes resolved.
    String(String),
    /// A string broken by an unescaped newline. Never a valid value.
    BadString,
    /// A bare number.
    Number(f64),
    /// A number followed by `%`.
    Percentage(f64),
    /// A number followed by a unit name.
    Dimension {
        /// The numeric part.
        value: f64,
        /// The unit, as written.
        unit: String,
    },
    /// Any other single code point.
    Delim(char),
    /// One or more whitespace code points, comments between them included.
    Whitespace,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// An opening bracket.
    Open(Bracket),
    /// A closing bracket.
    Close(Bracket),
}

impl Token {
    /// Whether this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Whether this is an identifier equal to `name`, ignoring ASCII case.
    #[must_use]
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Self::Ident(ident) if ident.eq_ignore_ascii_case(name))
    }
}

/// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
///
/// Writes text that tokenizes back to the same token. Escapes are not
/// re-applied, which is enough for the names and values gob accepts.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => f.write_str(name),
            Self::Function(name) => write!(f, "{name}("),
            Self::AtKeyword(name) => write!(f, "@{name}"),
            Self::Hash(name) => write!(f, "#{name}"),
            Self::String(text) => write!(f, "\"{}\"", text.replace('"', "\\\"")),
            Self::BadString => Ok(()),
            Self::Number(value) => write!(f, "{value}"),
            Self::Percentage(value) => write!(f, "{value}%"),
            Self::Dimension { value, unit } => write!(f, "{value}{unit}"),
            Self::Delim(c) => write!(f, "{c}"),
            Self::Whitespace => f.write_str(" "),
            Self::Colon => f.write_str(":"),
            Self::Semicolon => f.write_str(";"),
            Self::Comma => f.write_str(","),
            Self::Open(bracket) => write!(f, "{}", bracket.open()),
            Self::Close(bracket) => write!(f, "{}", bracket.close()),
        }
    }
}

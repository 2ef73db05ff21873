/// A `name="value"` pair from a start tag. Names are lowercased; values keep
/// their case with character references decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Decoded value; empty for a bare attribute like `hidden`.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// What the tree builder consumes. Text arrives one code point per token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<!DOCTYPE name ...>`. Public and system identifiers are dropped.
    Doctype {
        /// Lowercased name, if one was given.
        name: Option<String>,
    },

    /// An opening tag.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Written as `<name/>`.
        self_closing: bool,
        /// Attributes in source order, duplicates included.
        attributes: Vec<Attribute>,
    },

    /// A closing tag. Any attributes written on it are skipped.
    EndTag {
        /// Lowercased tag name.
        name: String,
    },

    /// `<!-- data -->`, or a bogus comment such as `<?xml ...>`.
    Comment {
        /// Everything between the delimiters.
        data: String,
    },

    /// One code point of text.
    Character {
        /// The code point.
        data: char,
    },

    /// Always the last token.
    EndOfFile,
}

impl Token {
    /// The tag name of a start or end tag token.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }
}

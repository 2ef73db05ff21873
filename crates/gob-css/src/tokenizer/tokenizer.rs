//! Stylesheet text to [`Token`]s.
//!
//! [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
//!
//! The tokenizer is an iterator over the preprocessed code points. It never
//! fails: a code point it has no rule for becomes a [`Token::Delim`], and
//! the parser decides whether that makes a rule or declaration invalid.

use super::token::{Bracket, Token};

const REPLACEMENT: char = '\u{FFFD}';

/// Tokenize all of `css`.
#[must_use]
pub fn tokenize(css: &str) -> Vec<Token> {
    Tokenizer::new(css).collect()
}

/// An iterator of tokens over stylesheet text.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    chars: Vec<char>,
    cursor: usize,
}

impl Tokenizer {
    /// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
    ///
    /// CR, FF and CRLF become a single LF. NUL becomes U+FFFD.
    #[must_use]
    pub fn new(css: &str) -> Self {
        let mut chars = Vec::with_capacity(css.len());
        let mut source = css.chars().peekable();
        while let Some(c) = source.next() {
            chars.push(match c {
                '\r' => {
                    let _ = source.next_if_eq(&'\n');
                    '\n'
                }
                '\x0C' => '\n',
                '\0' => REPLACEMENT,
                c => c,
            });
        }
        Self { chars, cursor: 0 }
    }

    fn at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.cursor + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.at(0)?;
        self.cursor += 1;
        Some(c)
    }

    fn skip(&mut self, count: usize) {
        self.cursor = (self.cursor + count).min(self.chars.len());
    }

    fn looking_at(&self, text: &str) -> bool {
        text.chars().enumerate().all(|(i, c)| self.at(i) == Some(c))
    }

    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.at(0).is_some_and(&predicate) {
            self.cursor += 1;
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// An unterminated comment runs to the end of the input.
    fn skip_comments(&mut self) {
        while self.looking_at("/*") {
            self.skip(2);
            while !self.looking_at("*/") && self.bump().is_some() {}
            self.skip(2);
        }
    }

    /// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn starts_escape(&self, offset: usize) -> bool {
        self.at(offset) == Some('\\') && self.at(offset + 1) != Some('\n')
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_name(&self, offset: usize) -> bool {
        match self.at(offset) {
            Some('-') => {
                self.at(offset + 1).is_some_and(|c| c == '-' || is_name_start(c))
                    || self.starts_escape(offset + 1)
            }
            Some('\\') => self.starts_escape(offset),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn starts_number(&self) -> bool {
        let digit = |i: usize| self.at(i).is_some_and(|c| c.is_ascii_digit());
        match self.at(0) {
            Some('+' | '-') => digit(1) || (self.at(1) == Some('.') && digit(2)),
            Some('.') => digit(1),
            _ => digit(0),
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn numeric(&mut self) -> Token {
        let value = self.number();
        if self.starts_name(0) {
            Token::Dimension {
                value,
                unit: self.name(),
            }
        } else if self.at(0) == Some('%') {
            self.cursor += 1;
            Token::Percentage(value)
        } else {
            Token::Number(value)
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Sign, integer part, fraction and exponent are scanned in place and
    /// the slice is handed to the float parser.
    fn number(&mut self) -> f64 {
        let start = self.cursor;
        if matches!(self.at(0), Some('+' | '-')) {
            self.cursor += 1;
        }
        self.skip_while(|c| c.is_ascii_digit());
        if self.at(0) == Some('.') && self.at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.cursor += 1;
            self.skip_while(|c| c.is_ascii_digit());
        }
        if matches!(self.at(0), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.at(1), Some('+' | '-')));
            if self.at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                self.skip(1 + sign);
                self.skip_while(|c| c.is_ascii_digit());
            }
        }
        let repr: String = self.chars[start..self.cursor].iter().collect();
        repr.parse().unwrap_or(0.0)
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// `url(` gets no special treatment: no gob property takes a URL, so
    /// its arguments only need to tokenize well enough to be rejected.
    fn ident_like(&mut self) -> Token {
        let name = self.name();
        if self.at(0) == Some('(') {
            self.cursor += 1;
            Token::Function(name)
        } else {
            Token::Ident(name)
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.at(0) {
                Some(c) if is_name_char(c) => {
                    name.push(c);
                    self.cursor += 1;
                }
                Some('\\') if self.starts_escape(0) => {
                    self.cursor += 1;
                    name.push(self.escaped());
                }
                _ => return name,
            }
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// The backslash has already been consumed. Up to six hex digits and
    /// one trailing whitespace code point are taken.
    fn escaped(&mut self) -> char {
        let digits = (0..6)
            .take_while(|&i| self.at(i).is_some_and(|c| c.is_ascii_hexdigit()))
            .count();
        if digits == 0 {
            return self.bump().unwrap_or(REPLACEMENT);
        }

        let hex: String = self.chars[self.cursor..self.cursor + digits].iter().collect();
        self.skip(digits);
        if self.at(0).is_some_and(is_whitespace) {
            self.cursor += 1;
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&code| code != 0)
            .and_then(char::from_u32)
            .unwrap_or(REPLACEMENT)
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// The opening quote has already been consumed. An unescaped newline
    /// ends the string as a [`Token::BadString`] and is left for the next
    /// token.
    fn string(&mut self, quote: char) -> Token {
        let mut text = String::new();
        loop {
            match self.at(0) {
                None => return Token::String(text),
                Some('\n') => return Token::BadString,
                Some(c) if c == quote => {
                    self.cursor += 1;
                    return Token::String(text);
                }
                Some('\\') => {
                    self.cursor += 1;
                    match self.at(0) {
                        None => {}
                        Some('\n') => self.cursor += 1,
                        Some(_) => text.push(self.escaped()),
                    }
                }
                Some(c) => {
                    self.cursor += 1;
                    text.push(c);
                }
            }
        }
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn next(&mut self) -> Option<Token> {
        self.skip_comments();
        let c = self.at(0)?;

        let token = if is_whitespace(c) {
            self.skip_while(is_whitespace);
            Token::Whitespace
        } else if self.looking_at("<!--") {
            // HTML comment markers around embedded styles.
            self.skip(4);
            Token::Whitespace
        } else if self.looking_at("-->") {
            self.skip(3);
            Token::Whitespace
        } else if self.starts_number() {
            self.numeric()
        } else if self.starts_name(0) {
            self.ident_like()
        } else {
            self.cursor += 1;
            match c {
                '"' | '\'' => self.string(c),
                '#' if self.at(0).is_some_and(is_name_char) || self.starts_escape(0) => {
                    Token::Hash(self.name())
                }
                '@' if self.starts_name(0) => Token::AtKeyword(self.name()),
                ':' => Token::Colon,
                ';' => Token::Semicolon,
                ',' => Token::Comma,
                c => Bracket::opened_by(c)
                    .map(Token::Open)
                    .or_else(|| Bracket::closed_by(c).map(Token::Close))
                    .unwrap_or(Token::Delim(c)),
            }
        };
        Some(token)
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

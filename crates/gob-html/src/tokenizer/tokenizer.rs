use strum_macros::Display;

use super::character_reference::{decode_numeric_reference, lookup_named_reference};
use super::token::{Attribute, Token};
use crate::HtmlError;

/// Where inside a tag the input ran out. Reported in
/// [`HtmlError::MalformedMarkup`].
///
/// Names follow the [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
/// states they correspond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TagState {
    /// Reading the tag name.
    TagName,
    /// Between attributes.
    BeforeAttributeName,
    /// Reading an attribute name.
    AttributeName,
    /// Inside a `"`-quoted value.
    AttributeValueDoubleQuoted,
    /// Inside a `'`-quoted value.
    AttributeValueSingleQuoted,
    /// Inside an unquoted value.
    AttributeValueUnquoted,
    /// Just after a `/` in a tag.
    SelfClosingStartTag,
}

/// Elements whose content is raw text up to the matching end tag.
///
/// The tree builder would normally switch the tokenizer into RAWTEXT;
/// tokenizing in one pass, the switch happens as the start tag is emitted.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script", "title", "textarea", "xmp", "noscript"];

/// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
const fn is_space(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// Scans the whole input in one pass. Each markup construct (tag, comment,
/// DOCTYPE, raw text run) is read by its own method rather than a character
/// at a time, but the recovery rules are the standard's: a `<` that does
/// not open a tag is text, unknown `&` sequences stay literal, and an
/// unterminated comment runs to the end of input.
#[derive(Debug)]
pub struct HTMLTokenizer {
    input: String,
    pos: usize,
    tokens: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    /// The tokens produced by [`HTMLTokenizer::run`].
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Tokenize to the end of input.
    ///
    /// # Errors
    ///
    /// Returns [`HtmlError::MalformedMarkup`] if the input ends inside a tag.
    pub fn run(&mut self) -> Result<(), HtmlError> {
        if matches!(self.tokens.last(), Some(Token::EndOfFile)) {
            return Ok(());
        }
        while let Some(c) = self.bump() {
            match c {
                '&' => self.character_reference(),
                '<' => self.markup()?,
                c => self.text(c),
            }
        }
        self.tokens.push(Token::EndOfFile);
        Ok(())
    }

    /// After `<` in text.
    fn markup(&mut self) -> Result<(), HtmlError> {
        match self.peek() {
            Some('!') => {
                self.pos += 1;
                self.declaration();
            }
            Some('/') => {
                self.pos += 1;
                self.end_tag()?;
            }
            Some(c) if c.is_ascii_alphabetic() => self.start_tag()?,
            Some('?') => self.bogus_comment(),
            // "invalid-first-character-of-tag-name": the `<` is text.
            _ => self.text('<'),
        }
        Ok(())
    }

    /// After `</`.
    fn end_tag(&mut self) -> Result<(), HtmlError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                let (name, _, _) = self.tag()?;
                self.tokens.push(Token::EndTag { name });
            }
            // "missing-end-tag-name": `</>` is dropped.
            Some('>') => self.pos += 1,
            None => {
                self.text('<');
                self.text('/');
            }
            Some(_) => self.bogus_comment(),
        }
        Ok(())
    }

    fn start_tag(&mut self) -> Result<(), HtmlError> {
        let (name, self_closing, attributes) = self.tag()?;
        let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str());
        self.tokens.push(Token::StartTag {
            name: name.clone(),
            self_closing,
            attributes,
        });
        if raw {
            self.raw_text(&name)?;
        }
        Ok(())
    }

    /// Reads a tag from its name through the closing `>`.
    fn tag(&mut self) -> Result<(String, bool, Vec<Attribute>), HtmlError> {
        let name = self.name_until(TagState::TagName, |c| {
            is_space(c) || matches!(c, '/' | '>')
        })?;
        let mut attributes = Vec::new();
        loop {
            self.skip_spaces();
            match self.bump() {
                None => return Err(self.eof_in(TagState::BeforeAttributeName)),
                Some('>') => return Ok((name, false, attributes)),
                // A `/` not followed by `>` is ignored like whitespace.
                Some('/') => match self.peek() {
                    Some('>') => {
                        self.pos += 1;
                        return Ok((name, true, attributes));
                    }
                    None => return Err(self.eof_in(TagState::SelfClosingStartTag)),
                    Some(_) => {}
                },
                Some(first) => attributes.push(self.attribute(first)?),
            }
        }
    }

    /// One attribute, its first name character already consumed. A leading
    /// `=` is part of the name.
    fn attribute(&mut self, first: char) -> Result<Attribute, HtmlError> {
        let rest = self.name_until(TagState::AttributeName, |c| {
            is_space(c) || matches!(c, '/' | '>' | '=')
        })?;
        let name = format!("{}{rest}", first.to_ascii_lowercase());

        self.skip_spaces();
        if self.peek() != Some('=') {
            return Ok(Attribute::new(name, String::new()));
        }
        self.pos += 1;
        self.skip_spaces();
        let value = match self.peek() {
            Some('"') => self.quoted_value('"', TagState::AttributeValueDoubleQuoted)?,
            Some('\'') => self.quoted_value('\'', TagState::AttributeValueSingleQuoted)?,
            // "missing-attribute-value"
            Some('>') | None => String::new(),
            Some(_) => self.unquoted_value()?,
        };
        Ok(Attribute::new(name, value))
    }

    fn quoted_value(&mut self, quote: char, state: TagState) -> Result<String, HtmlError> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.eof_in(state)),
                Some(c) if c == quote => return Ok(value),
                Some('&') => value.push_str(&self.decode_reference()),
                Some(c) => value.push(c),
            }
        }
    }

    fn unquoted_value(&mut self) -> Result<String, HtmlError> {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.eof_in(TagState::AttributeValueUnquoted)),
                Some(c) if is_space(c) || c == '>' => return Ok(value),
                Some(c) => {
                    self.pos += c.len_utf8();
                    if c == '&' {
                        value.push_str(&self.decode_reference());
                    } else {
                        value.push(c);
                    }
                }
            }
        }
    }

    /// Consumes up to (not including) the first character matching `stop`,
    /// ASCII-lowercased.
    fn name_until(
        &mut self,
        state: TagState,
        stop: impl Fn(char) -> bool,
    ) -> Result<String, HtmlError> {
        let rest = &self.input[self.pos..];
        let end = rest.find(stop).ok_or_else(|| self.eof_in(state))?;
        let name = rest[..end].to_ascii_lowercase();
        self.pos += end;
        Ok(name)
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Everything up to `</name` followed by whitespace, `/` or `>` is text.
    /// Without such an end tag the rest of the input is text.
    fn raw_text(&mut self, name: &str) -> Result<(), HtmlError> {
        loop {
            let rest = &self.input[self.pos..];
            let Some(lt) = rest.find('<') else {
                let rest = rest.to_owned();
                self.pos = self.input.len();
                self.texts_from(&rest);
                return Ok(());
            };
            let (before, candidate) = rest.split_at(lt);
            let closes = candidate
                .strip_prefix("</")
                .and_then(|after| after.get(..name.len()).zip(after.get(name.len()..)))
                .is_some_and(|(tag, after)| {
                    tag.eq_ignore_ascii_case(name)
                        && after.starts_with(|c: char| is_space(c) || matches!(c, '/' | '>'))
                });
            let before = before.to_owned();
            self.pos += lt + 1;
            self.texts_from(&before);
            if closes {
                self.pos += 1;
                return self.end_tag();
            }
            self.text('<');
        }
    }

    /// After `<!`.
    fn declaration(&mut self) {
        if self.input[self.pos..].starts_with("--") {
            self.pos += 2;
            let data = self.until("-->");
            self.tokens.push(Token::Comment { data });
        } else if self
            .input
            .get(self.pos..self.pos + "doctype".len())
            .is_some_and(|word| word.eq_ignore_ascii_case("doctype"))
        {
            self.pos += "doctype".len();
            let body = self.until(">");
            let name = body
                .split_ascii_whitespace()
                .next()
                .map(str::to_ascii_lowercase);
            self.tokens.push(Token::Doctype { name });
        } else {
            self.bogus_comment();
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn bogus_comment(&mut self) {
        let data = self.until(">");
        self.tokens.push(Token::Comment { data });
    }

    /// Consumes through `end` and returns what came before it, or the rest
    /// of the input when `end` never appears.
    fn until(&mut self, end: &str) -> String {
        let rest = &self.input[self.pos..];
        match rest.find(end) {
            Some(at) => {
                let data = rest[..at].to_owned();
                self.pos += at + end.len();
                data
            }
            None => {
                let data = rest.to_owned();
                self.pos = self.input.len();
                data
            }
        }
    }

    fn character_reference(&mut self) {
        let decoded = self.decode_reference();
        self.texts_from(&decoded);
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Called just after `&`. Unrecognized sequences decode to a literal `&`
    /// and leave the input where it was.
    fn decode_reference(&mut self) -> String {
        let rest = &self.input[self.pos..];
        if let Some(number) = rest.strip_prefix('#') {
            let (radix, digits) = match number.strip_prefix(['x', 'X']) {
                Some(hex) => (16, hex),
                None => (10, number),
            };
            let len = digits
                .find(|c: char| !c.is_digit(radix))
                .unwrap_or(digits.len());
            if len == 0 {
                return "&".to_owned();
            }
            let decoded = decode_numeric_reference(&digits[..len], radix);
            let prefix = rest.len() - digits.len();
            let semicolon = usize::from(digits[len..].starts_with(';'));
            self.pos += prefix + len + semicolon;
            return decoded.to_string();
        }

        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        match lookup_named_reference(&rest[..len]) {
            Some(decoded) if len > 0 && rest[len..].starts_with(';') => {
                self.pos += len + 1;
                decoded.to_owned()
            }
            _ => "&".to_owned(),
        }
    }

    fn eof_in(&self, state: TagState) -> HtmlError {
        HtmlError::MalformedMarkup {
            position: self.input.len(),
            state: state.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    fn text(&mut self, data: char) {
        self.tokens.push(Token::Character { data });
    }

    fn texts_from(&mut self, text: &str) {
        self.tokens
            .extend(text.chars().map(|data| Token::Character { data }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut tokenizer = HTMLTokenizer::new(input);
        tokenizer.run().expect("input should tokenize");
        tokenizer.into_tokens()
    }

    #[test]
    fn test_tag_names() {
        let names: Vec<_> = tokens("<H1 class=x>a</h1 ignored=y><br/>")
            .iter()
            .filter_map(|t| t.tag_name().map(str::to_owned))
            .collect();
        assert_eq!(names, ["h1", "h1", "br"]);
    }

    #[test]
    fn test_slash_inside_tag_is_ignored() {
        match &tokens("<a / href=x>")[0] {
            Token::StartTag {
                self_closing,
                attributes,
                ..
            } => {
                assert!(!self_closing);
                assert_eq!(attributes, &[Attribute::new("href".into(), "x".into())]);
            }
            other => panic!("Expected start tag, got {other:?}"),
        }
    }

    #[test]
    fn test_unquoted_value_keeps_slash() {
        match &tokens("<a href=/x/>")[0] {
            Token::StartTag { attributes, .. } => assert_eq!(attributes[0].value, "/x/"),
            other => panic!("Expected start tag, got {other:?}"),
        }
    }

    #[test]
    fn test_bogus_and_empty_end_tags() {
        let tokens = tokens("a</>b<?xml v?>c</ x>d");
        let comments: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Comment { data } => Some(data.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(comments, ["?xml v?", " x"]);
        assert_eq!(tokens.len(), 4 + 2 + 1);
    }

    #[test]
    fn test_raw_text_end_tag_needs_a_delimiter() {
        let tokens = tokens("<title>a</titles></title >b");
        let text: String = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Character { data } => Some(*data),
                _ => None,
            })
            .collect();
        assert_eq!(text, "a</titles>b");
    }

    #[test]
    fn test_unclosed_raw_text_runs_to_end() {
        let tokens = tokens("<script>a</script");
        assert_eq!(tokens.len(), 1 + "a</script".len() + 1);
    }

    #[test]
    fn test_eof_in_unquoted_value() {
        let mut tokenizer = HTMLTokenizer::new("<a href=x");
        match tokenizer.run() {
            Err(HtmlError::MalformedMarkup { state, position }) => {
                assert_eq!(state, "AttributeValueUnquoted");
                assert_eq!(position, 9);
            }
            other => panic!("Expected eof-in-tag, got {other:?}"),
        }
    }
}

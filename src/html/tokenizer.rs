//! Forgiving HTML tokenizer.
//!
//! [`Tokenizer`] turns decoded text into a lazy sequence of [`Token`]s. It
//! never fails: markup it cannot make sense of is passed through as text,
//! and recoverable oddities (duplicate attributes, unterminated tags) are
//! recorded as warnings.
//!
//! ```
//! use htmlarbor::html::tokenizer::{Token, Tokenizer};
//!
//! let tokens: Vec<Token> = Tokenizer::new("<p class=x>a &amp; b</p>").collect();
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[1], Token::Text("a & b".to_string()));
//! ```

use crate::error::{ErrorSeverity, ParseDiagnostic, SourceLocation};
use crate::parser::input::{is_html_whitespace, ParserInput};
use crate::tree::Attribute;

use super::entities::{lookup_entity, lookup_legacy_entity};
use super::is_raw_text_element;

/// A lexical unit of HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr=value ...>` or `<name ... />`.
    StartTag {
        /// Lowercase tag name.
        name: String,
        /// Attributes in source order, names in their original case.
        attributes: Vec<Attribute>,
        /// True if the tag ended with `/>`.
        self_closing: bool,
    },
    /// `</name>`.
    EndTag {
        /// Lowercase tag name.
        name: String,
    },
    /// Character data, with references decoded (except in raw text).
    Text(String),
    /// `<!--...-->`, or a bogus `<!...>` / `<?...>` construct.
    Comment(String),
    /// `<!DOCTYPE ...>`; holds everything between `<!` and `>`.
    Doctype(String),
}

/// A lazy, forward-only HTML tokenizer.
pub struct Tokenizer<'a> {
    input: ParserInput<'a>,
    /// Set after a `<script>` or `<style>` start tag; the next token is the
    /// element's raw content.
    raw_text: Option<String>,
    /// Set once a tag, comment or declaration runs off the end of the input.
    /// Nothing after it can be terminated either, so the rest is text.
    rest_is_text: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over decoded HTML text.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input: ParserInput::new(input),
            raw_text: None,
            rest_is_text: false,
        }
    }

    /// Returns the warnings recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.input.diagnostics
    }

    /// Removes and returns the warnings recorded so far.
    pub fn take_diagnostics(&mut self) -> Vec<ParseDiagnostic> {
        std::mem::take(&mut self.input.diagnostics)
    }

    /// Returns the current position in the input.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.input.location()
    }

    /// Records a warning at the current position.
    pub(crate) fn warn(&mut self, message: String) {
        self.input.push_diagnostic(ErrorSeverity::Warning, message);
    }

    /// Records an error at the current position, for markup that is
    /// dropped rather than interpreted.
    pub(crate) fn error(&mut self, message: String) {
        self.input.push_diagnostic(ErrorSeverity::Error, message);
    }

    /// Returns `true` if the input at the current position opens a tag,
    /// comment, doctype or bogus comment.
    fn at_markup(&self) -> bool {
        if self.rest_is_text || self.input.peek() != Some(b'<') {
            return false;
        }
        match self.input.peek_at(1) {
            Some(b'!' | b'?') => true,
            Some(b'/') => self.input.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic()),
            Some(b) => b.is_ascii_alphabetic(),
            None => false,
        }
    }

    fn markup(&mut self) -> Option<Token> {
        if self.input.looking_at(b"<!--") {
            self.comment()
        } else if self.input.looking_at_ci(b"<!doctype") {
            self.declaration(2).map(Token::Doctype)
        } else if self.input.looking_at(b"<!") {
            self.declaration(2).map(Token::Comment)
        } else if self.input.looking_at(b"<?") {
            self.declaration(1).map(Token::Comment)
        } else if self.input.looking_at(b"</") {
            self.end_tag()
        } else {
            self.start_tag()
        }
    }

    // --- Text ---

    /// Reads text up to the next markup. When `literal_lt` is set, the `<`
    /// at the current position is taken as text even if it looks like
    /// markup; this is how an unterminated tag degrades.
    fn text(&mut self, literal_lt: bool) -> String {
        let mut text = String::new();
        if literal_lt {
            self.input.advance(1);
            text.push('<');
        }
        while !self.input.at_end() && !self.at_markup() {
            if self.input.peek() == Some(b'&') {
                self.char_ref(&mut text, false);
            } else if let Some(c) = self.input.next_char() {
                text.push(c);
            }
        }
        text
    }

    /// Reads the content of a `script` or `style` element verbatim, up to
    /// its end tag or the end of input.
    fn raw_text(&mut self, tag: &str) -> String {
        let rest = self.input.remaining();
        let bytes = rest.as_bytes();
        let mut end = rest.len();
        let mut from = 0;
        while let Some(offset) = rest[from..].find("</") {
            let at = from + offset;
            let name_end = at + 2 + tag.len();
            let name_matches = bytes
                .get(at + 2..name_end)
                .is_some_and(|n| n.eq_ignore_ascii_case(tag.as_bytes()));
            let terminated = bytes
                .get(name_end)
                .map_or(true, |&b| is_html_whitespace(b) || b == b'/' || b == b'>');
            if name_matches && terminated {
                end = at;
                break;
            }
            from = at + 2;
        }
        let raw = &rest[..end];
        self.input.advance(end);
        if raw.contains('\r') {
            raw.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            raw.to_string()
        }
    }

    // --- Character references ---

    /// Decodes the character reference at the current `&` into `out`, or
    /// pushes a literal `&` if there is no valid reference.
    fn char_ref(&mut self, out: &mut String, in_attribute: bool) {
        let saved = self.input.save_position();
        self.input.advance(1); // consume '&'

        let decoded = if self.input.peek() == Some(b'#') {
            self.input.advance(1);
            self.numeric_ref()
        } else {
            self.named_ref(in_attribute)
        };

        match decoded {
            Some(c) => out.push(c),
            None => {
                self.input.restore_position(saved);
                self.input.advance(1);
                out.push('&');
            }
        }
    }

    fn numeric_ref(&mut self) -> Option<char> {
        let hex = matches!(self.input.peek(), Some(b'x' | b'X'));
        if hex {
            self.input.advance(1);
        }
        let digits = if hex {
            self.input.take_while(|b| b.is_ascii_hexdigit())
        } else {
            self.input.take_while(|b| b.is_ascii_digit())
        };
        if digits.is_empty() {
            return None;
        }
        if self.input.peek() == Some(b';') {
            self.input.advance(1);
        } else {
            self.warn(format!("character reference &#{digits} missing ';'"));
        }
        let value = u32::from_str_radix(digits, if hex { 16 } else { 10 }).unwrap_or(u32::MAX);
        Some(match value {
            0 | 0xD800..=0xDFFF => '\u{FFFD}',
            v => char::from_u32(v).unwrap_or('\u{FFFD}'),
        })
    }

    fn named_ref(&mut self, in_attribute: bool) -> Option<char> {
        let name = self.input.take_while(|b| b.is_ascii_alphanumeric());
        if name.is_empty() {
            return None;
        }
        if self.input.peek() == Some(b';') {
            let c = lookup_entity(name)?;
            self.input.advance(1);
            return Some(c);
        }
        // `?a=1&copy=2` in an attribute is a query string, not a reference.
        if in_attribute && self.input.peek() == Some(b'=') {
            return None;
        }
        lookup_legacy_entity(name)
    }

    // --- Comments and declarations ---

    fn comment(&mut self) -> Option<Token> {
        let saved = self.input.save_position();
        self.input.advance(4); // consume '<!--'

        // Abrupt forms: <!--> and <!--->
        if self.input.peek() == Some(b'>') {
            self.input.advance(1);
            return Some(Token::Comment(String::new()));
        }
        if self.input.looking_at(b"->") {
            self.input.advance(2);
            return Some(Token::Comment(String::new()));
        }

        let mut content = String::new();
        loop {
            if self.input.at_end() {
                self.input.restore_position(saved);
                self.warn("unterminated comment treated as text".to_string());
                return None;
            }
            if self.input.looking_at(b"-->") {
                self.input.advance(3);
                break;
            }
            if self.input.looking_at(b"--!>") {
                self.input.advance(4);
                break;
            }
            if let Some(c) = self.input.next_char() {
                content.push(c);
            }
        }
        Some(Token::Comment(content))
    }

    /// Reads `<!...>` or `<?...>` and returns the span after the first
    /// `skip` bytes, up to (not including) the `>`.
    fn declaration(&mut self, skip: usize) -> Option<String> {
        let Some(end) = self.input.find(">") else {
            self.warn("unterminated markup declaration treated as text".to_string());
            return None;
        };
        let content = self.input.remaining()[skip..end].to_string();
        self.input.advance(end + 1);
        Some(content)
    }

    // --- Tags ---

    fn tag_name(&mut self) -> String {
        self.input
            .take_while(|b| !is_html_whitespace(b) && b != b'/' && b != b'>')
            .to_ascii_lowercase()
    }

    fn end_tag(&mut self) -> Option<Token> {
        let saved = self.input.save_position();
        self.input.advance(2); // consume '</'
        let name = self.tag_name();
        let Some(end) = self.input.find(">") else {
            self.input.restore_position(saved);
            self.warn(format!("unterminated end tag </{name}> treated as text"));
            return None;
        };
        if !self.input.remaining()[..end].trim().is_empty() {
            self.warn(format!("junk in end tag </{name}> ignored"));
        }
        self.input.advance(end + 1);
        Some(Token::EndTag { name })
    }

    fn start_tag(&mut self) -> Option<Token> {
        let saved = self.input.save_position();
        self.input.advance(1); // consume '<'
        let name = self.tag_name();
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut self_closing = false;

        loop {
            self.input.skip_whitespace();
            match self.input.peek() {
                None => {
                    self.input.restore_position(saved);
                    self.warn(format!("unterminated tag <{name}> treated as text"));
                    return None;
                }
                Some(b'>') => {
                    self.input.advance(1);
                    break;
                }
                Some(b'/') => {
                    self.input.advance(1);
                    if self.input.peek() == Some(b'>') {
                        self.input.advance(1);
                        self_closing = true;
                        break;
                    }
                    continue;
                }
                Some(_) => {}
            }

            let Some(attr) = self.attribute() else {
                self.input.restore_position(saved);
                self.warn(format!("unterminated tag <{name}> treated as text"));
                return None;
            };
            if attributes.iter().any(|a| a.matches(&attr.name)) {
                self.error(format!(
                    "duplicate attribute '{}' on <{name}> ignored",
                    attr.name
                ));
            } else {
                attributes.push(attr);
            }
        }

        if is_raw_text_element(&name) && !self_closing {
            self.raw_text = Some(name.clone());
        }
        Some(Token::StartTag {
            name,
            attributes,
            self_closing,
        })
    }

    /// Parses one attribute. Returns `None` if the input ends inside a
    /// quoted value.
    fn attribute(&mut self) -> Option<Attribute> {
        let mut name = self
            .input
            .take_while(|b| !is_html_whitespace(b) && !matches!(b, b'/' | b'>' | b'='))
            .to_string();
        if name.is_empty() {
            // A leading '=' belongs to the name.
            self.input.advance(1);
            name.push('=');
            name.push_str(
                self.input
                    .take_while(|b| !is_html_whitespace(b) && !matches!(b, b'/' | b'>' | b'=')),
            );
        }

        let save = self.input.save_position();
        self.input.skip_whitespace();
        if self.input.peek() != Some(b'=') {
            self.input.restore_position(save);
            return Some(Attribute::new(name, ""));
        }
        self.input.advance(1); // consume '='
        self.input.skip_whitespace();

        let mut value = String::new();
        match self.input.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.input.advance(1);
                loop {
                    match self.input.peek() {
                        None => return None,
                        Some(b) if b == quote => {
                            self.input.advance(1);
                            break;
                        }
                        Some(b'&') => self.char_ref(&mut value, true),
                        Some(_) => {
                            if let Some(c) = self.input.next_char() {
                                value.push(c);
                            }
                        }
                    }
                }
            }
            _ => {
                while let Some(b) = self.input.peek() {
                    if is_html_whitespace(b) || b == b'>' {
                        break;
                    }
                    if b == b'&' {
                        self.char_ref(&mut value, true);
                    } else if let Some(c) = self.input.next_char() {
                        value.push(c);
                    }
                }
            }
        }
        Some(Attribute::new(name, value))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(tag) = self.raw_text.take() {
            let content = self.raw_text(&tag);
            if !content.is_empty() {
                return Some(Token::Text(content));
            }
        }

        if self.input.at_end() {
            return None;
        }

        if self.at_markup() {
            if let Some(token) = self.markup() {
                return Some(token);
            }
            self.rest_is_text = true;
            return Some(Token::Text(self.text(true)));
        }
        Some(Token::Text(self.text(false)))
    }
}

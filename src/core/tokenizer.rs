//! Push Tokenizer
//!
//! Turns a chunked byte stream into open-tag / text / close-tag / error
//! events. Input is buffered until a token is complete, so a tag name,
//! attribute value or multi-byte character split across writes comes out
//! exactly as if the document had been written in one piece.
//!
//! ```text
//! write(chunk) ──▶ pending bytes ──▶ scan_token ──▶ Token ──▶ TokenHandler
//!                      ▲                  │
//!                      └── Incomplete ────┘   (wait for the next chunk)
//! ```
//!
//! Well-formedness is checked just far enough for streaming: end tags must
//! match, nothing may follow the root element, and markup must be closed
//! by the end of input. The first error is reported once and the
//! tokenizer ignores all later input.

use super::attributes::{parse_attributes, AttributeError, Attributes};
use super::entities::decode_text;
use super::scanner::{is_name_start_char, is_whitespace, Scanner};
use crate::error::Error;

/// Receiver of tokenizer events
///
/// Empty elements (`<a/>`) arrive as `open_tag` immediately followed by
/// `close_tag`. CDATA sections arrive as `text`, so CDATA inside a field
/// tag is folded into the record like ordinary character data (a
/// `<rad_name>` holding text and a CDATA section yields two names).
/// Comments, processing instructions and declarations are dropped.
pub trait TokenHandler {
    /// An element opened
    fn open_tag(&mut self, name: &str, attributes: Attributes);

    /// Character data inside an element, entities decoded
    fn text(&mut self, content: &str);

    /// An element closed
    fn close_tag(&mut self, name: &str);

    /// The document is malformed; no further events follow
    fn error(&mut self, error: Error);
}

/// A complete token borrowed from the pending buffer
#[derive(Debug, PartialEq)]
enum Token<'a> {
    Start {
        name: &'a [u8],
        attrs: &'a [u8],
        is_empty: bool,
    },
    End {
        name: &'a [u8],
    },
    Text(&'a [u8]),
    CData(&'a [u8]),
    /// Comment, processing instruction or declaration
    Skip,
}

/// Result of scanning at the start of the pending buffer
#[derive(Debug, PartialEq)]
enum Scan<'a> {
    Token { token: Token<'a>, len: usize },
    Incomplete,
    Invalid(&'static str),
}

impl<'a> Scan<'a> {
    #[inline]
    fn token(token: Token<'a>, len: usize) -> Self {
        Scan::Token { token, len }
    }
}

/// Incremental tokenizer for one document
pub struct Tokenizer {
    /// Bytes received but not yet forming a complete token
    pending: Vec<u8>,
    /// Stream offset of `pending[0]`
    offset: u64,
    /// Names of currently open elements
    open: Vec<String>,
    root_closed: bool,
    failed: bool,
}

impl Tokenizer {
    /// Create a tokenizer at the start of a document
    pub fn new() -> Self {
        Tokenizer {
            pending: Vec::with_capacity(8192),
            offset: 0,
            open: Vec::with_capacity(8),
            root_closed: false,
            failed: false,
        }
    }

    /// Feed a chunk, emitting every token it completes
    pub fn write<H: TokenHandler>(&mut self, chunk: &[u8], handler: &mut H) {
        if self.failed {
            return;
        }
        self.pending.extend_from_slice(chunk);
        self.drain(handler, false);
    }

    /// Signal end of input: flush trailing text and report anything left open
    pub fn close<H: TokenHandler>(&mut self, handler: &mut H) {
        if self.failed {
            return;
        }
        self.drain(handler, true);
        if self.failed {
            return;
        }

        if !self.pending.is_empty() {
            let offset = self.offset;
            self.fail(
                handler,
                Error::malformed(offset, "unexpected end of input inside markup"),
            );
        } else if let Some(name) = self.open.last().cloned() {
            self.fail(handler, Error::Unclosed { name });
        }
    }

    /// Bytes held while waiting for a token to complete
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Number of elements currently open
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// True once an error has been reported
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    fn fail<H: TokenHandler>(&mut self, handler: &mut H, error: Error) {
        self.failed = true;
        self.pending = Vec::new();
        handler.error(error);
    }

    /// Process every complete token in the pending buffer
    fn drain<H: TokenHandler>(&mut self, handler: &mut H, at_eof: bool) {
        let buf = std::mem::take(&mut self.pending);
        let mut pos = 0;

        while pos < buf.len() {
            let start = self.offset + pos as u64;
            match scan_token(&buf[pos..], at_eof) {
                Scan::Incomplete => break,
                Scan::Invalid(message) => {
                    self.fail(handler, Error::malformed(start, message));
                    return;
                }
                Scan::Token { token, len } => {
                    self.dispatch(token, start, handler);
                    if self.failed {
                        return;
                    }
                    pos += len;
                }
            }
        }

        self.offset += pos as u64;
        self.pending = buf;
        self.pending.drain(..pos);
    }

    fn dispatch<H: TokenHandler>(&mut self, token: Token<'_>, start: u64, handler: &mut H) {
        match token {
            Token::Start {
                name,
                attrs,
                is_empty,
            } => {
                if self.root_closed {
                    return self.fail(handler, Error::malformed(start, "content after the root element"));
                }
                let Ok(name) = std::str::from_utf8(name) else {
                    return self.fail(handler, Error::InvalidUtf8 { offset: start });
                };
                let attributes = match parse_attributes(attrs) {
                    Ok(attributes) => attributes,
                    Err(AttributeError::Syntax(message)) => {
                        return self.fail(handler, Error::malformed(start, message));
                    }
                    Err(AttributeError::Utf8) => {
                        return self.fail(handler, Error::InvalidUtf8 { offset: start });
                    }
                };

                handler.open_tag(name, attributes);
                if is_empty {
                    handler.close_tag(name);
                    self.root_closed = self.open.is_empty();
                } else {
                    self.open.push(name.to_owned());
                }
            }
            Token::End { name } => {
                let Ok(name) = std::str::from_utf8(name) else {
                    return self.fail(handler, Error::InvalidUtf8 { offset: start });
                };
                match self.open.pop() {
                    Some(expected) if expected == name => {
                        handler.close_tag(name);
                        self.root_closed = self.open.is_empty();
                    }
                    Some(expected) => {
                        let message =
                            format!("mismatched close tag: expected </{expected}>, found </{name}>");
                        self.fail(handler, Error::malformed(start, message));
                    }
                    None => {
                        let message = format!("unexpected close tag </{name}>");
                        self.fail(handler, Error::malformed(start, message));
                    }
                }
            }
            Token::Text(raw) => {
                let decoded = decode_text(raw);
                self.emit_text(&decoded, start, handler);
            }
            Token::CData(raw) => self.emit_text(raw, start, handler),
            Token::Skip => {}
        }
    }

    fn emit_text<H: TokenHandler>(&mut self, raw: &[u8], start: u64, handler: &mut H) {
        if self.open.is_empty() {
            if raw.iter().all(|&b| is_whitespace(b)) {
                return;
            }
            return self.fail(handler, Error::malformed(start, "text outside the root element"));
        }
        match std::str::from_utf8(raw) {
            Ok(text) => handler.text(text),
            Err(_) => self.fail(handler, Error::InvalidUtf8 { offset: start }),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan one token at the start of `input`
fn scan_token(input: &[u8], at_eof: bool) -> Scan<'_> {
    let scanner = Scanner::new(input);

    if scanner.peek() != Some(b'<') {
        // Text runs until the next '<'; without one it may still be growing
        return match scanner.find_byte(b'<') {
            Some(end) => Scan::token(Token::Text(&input[..end]), end),
            None if at_eof => Scan::token(Token::Text(input), input.len()),
            None => Scan::Incomplete,
        };
    }

    match scanner.peek_at(1) {
        None => Scan::Incomplete,
        Some(b'/') => scan_end_tag(scanner),
        Some(b'!') => scan_bang(scanner),
        Some(b'?') => match scanner.find_seq(b"?>") {
            Some(end) => Scan::token(Token::Skip, end + 2),
            None => Scan::Incomplete,
        },
        Some(c) if is_name_start_char(c) => scan_start_tag(scanner),
        Some(_) => Scan::Invalid("invalid character after '<'"),
    }
}

/// Scan `<name attr="v">` or `<name/>`
fn scan_start_tag(scanner: Scanner<'_>) -> Scan<'_> {
    let Some(end) = scanner.find_tag_end_quoted() else {
        return Scan::Incomplete;
    };

    let mut content = scanner.slice(1, end);
    let is_empty = content.last() == Some(&b'/');
    if is_empty {
        content = &content[..content.len() - 1];
    }

    let mut inner = Scanner::new(content);
    let Some(name) = inner.read_name() else {
        return Scan::Invalid("malformed start tag");
    };
    let attrs = inner.remaining();
    if attrs.first().is_some_and(|&b| !is_whitespace(b)) {
        return Scan::Invalid("malformed start tag");
    }

    Scan::token(
        Token::Start {
            name,
            attrs,
            is_empty,
        },
        end + 1,
    )
}

/// Scan `</name>`
fn scan_end_tag(scanner: Scanner<'_>) -> Scan<'_> {
    let Some(end) = scanner.find_byte(b'>') else {
        return Scan::Incomplete;
    };

    let mut inner = Scanner::new(scanner.slice(2, end));
    let Some(name) = inner.read_name() else {
        return Scan::Invalid("malformed end tag");
    };
    inner.skip_whitespace();
    if !inner.is_eof() {
        return Scan::Invalid("malformed end tag");
    }

    Scan::token(Token::End { name }, end + 1)
}

/// Scan a comment, CDATA section or declaration
fn scan_bang(mut scanner: Scanner<'_>) -> Scan<'_> {
    match scanner.starts_with_partial(b"<!--") {
        None => return Scan::Incomplete,
        Some(true) => {
            scanner.advance(4);
            return match scanner.find_seq(b"-->") {
                Some(end) => Scan::token(Token::Skip, end + 3),
                None => Scan::Incomplete,
            };
        }
        Some(false) => {}
    }

    match scanner.starts_with_partial(b"<![CDATA[") {
        None => return Scan::Incomplete,
        Some(true) => {
            scanner.advance(9);
            return match scanner.find_seq(b"]]>") {
                Some(end) => Scan::token(Token::CData(scanner.slice(9, end)), end + 3),
                None => Scan::Incomplete,
            };
        }
        Some(false) => {}
    }

    match scanner.find_declaration_end() {
        Some(end) => Scan::token(Token::Skip, end + 1),
        None => Scan::Incomplete,
    }
}

//! Lexer for JavaScript source code
//!
//! Wraps the logos-generated lexer with manual scanning for the tokens a
//! regular grammar cannot describe: string bodies, block comments, template
//! chunks and regular expression literals.

use std::borrow::Cow;

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

/// JavaScript lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    /// Peeked token (for lookahead)
    peeked: Option<ParseResult<SpannedToken<'a>>>,
    /// Offset from original source (used after restarting lexer)
    offset: usize,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("offset", &self.offset)
            .field("peeked", &self.peeked)
            .finish()
    }
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            peeked: None,
            offset: 0,
        }
    }

    /// Get the source code
    pub fn source(&self) -> &'a str {
        self.source
    }

    fn token_at(&self, token: Token, start: usize, end: usize) -> SpannedToken<'a> {
        SpannedToken::new(token, Span::new(start, end), &self.source[start..end])
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&ParseResult<SpannedToken<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.next_token_internal();
        }
        self.peeked.as_ref()
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        if let Some(peeked) = self.peeked.take() {
            return Some(peeked);
        }
        self.next_token_internal()
    }

    fn next_token_internal(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let start = self.offset + span.start;
        let end = self.offset + span.end;

        let scanned = match result {
            Ok(Token::Quote) => self
                .scan_string(start)
                .map(|close| (Token::String, close)),
            Ok(Token::Backtick) => self.scan_template_chunk(end).map(|(close, finished)| {
                let token = if finished {
                    Token::TemplateString
                } else {
                    Token::TemplateHead
                };
                (token, close)
            }),
            Ok(Token::BlockCommentStart) => self.scan_block_comment(start),
            Ok(token @ (Token::Identifier | Token::PrivateName))
                if !escapes_are_valid(token, &self.source[start..end]) =>
            {
                return Some(Err(ParseError::LexerError {
                    span: Span::new(start, end),
                }))
            }
            Ok(token) => return Some(Ok(self.token_at(token, start, end))),
            Err(()) => {
                return Some(Err(ParseError::LexerError {
                    span: Span::new(start, end),
                }))
            }
        };

        match scanned {
            Ok((token, close)) => {
                self.restart_from(close);
                Some(Ok(self.token_at(token, start, close)))
            }
            Err(e) => {
                // Nothing after an unterminated literal can be tokenized reliably
                self.restart_from(self.source.len());
                Some(Err(e))
            }
        }
    }

    /// Scan a quoted string starting at its opening quote.
    /// Uses memchr to jump between quote and escape characters.
    fn scan_string(&self, start: usize) -> ParseResult<usize> {
        let bytes = self.source.as_bytes();
        let quote = bytes[start];
        let mut pos = start + 1;

        while pos < bytes.len() {
            let Some(offset) = memchr::memchr3(quote, b'\\', b'\n', &bytes[pos..]) else {
                break;
            };
            pos += offset;
            match bytes[pos] {
                b'\\' => pos += 2,
                b'\n' => break,
                _ => return Ok(pos + 1),
            }
        }

        Err(ParseError::UnterminatedString {
            span: Span::new(start, pos.min(bytes.len())),
        })
    }

    /// Scan template text starting just after a backtick or `}`.
    ///
    /// Returns the end offset and whether the template finished (closing
    /// backtick) rather than opening a `${` substitution.
    fn scan_template_chunk(&self, from: usize) -> ParseResult<(usize, bool)> {
        let bytes = self.source.as_bytes();
        let mut pos = from;

        while pos < bytes.len() {
            let Some(offset) = memchr::memchr3(b'`', b'\\', b'$', &bytes[pos..]) else {
                break;
            };
            pos += offset;
            match bytes[pos] {
                b'\\' => pos += 2,
                b'`' => return Ok((pos + 1, true)),
                _ if bytes.get(pos + 1) == Some(&b'{') => return Ok((pos + 2, false)),
                _ => pos += 1,
            }
        }

        Err(ParseError::UnterminatedTemplate {
            span: Span::new(from.saturating_sub(1), bytes.len()),
        })
    }

    fn scan_block_comment(&self, start: usize) -> ParseResult<(Token, usize)> {
        let body = &self.source.as_bytes()[start + 2..];
        let Some(offset) = memchr::memmem::find(body, b"*/") else {
            return Err(ParseError::UnterminatedBlockComment {
                span: Span::new(start, self.source.len()),
            });
        };
        let token = if memchr::memchr2(b'\n', b'\r', &body[..offset]).is_some() {
            Token::BlockCommentMultiline
        } else {
            Token::BlockComment
        };
        Ok((token, start + 2 + offset + 2))
    }

    /// Continue a template literal after the `}` closing a substitution.
    ///
    /// `brace` is the offset of that `}`; the returned token covers the brace
    /// and the following text through `${` or the closing backtick.
    pub fn continue_template(&mut self, brace: usize) -> ParseResult<SpannedToken<'a>> {
        let (close, finished) = self.scan_template_chunk(brace + 1)?;
        self.restart_from(close);
        let token = if finished {
            Token::TemplateTail
        } else {
            Token::TemplateMiddle
        };
        Ok(self.token_at(token, brace, close))
    }

    /// Re-read a `/` or `/=` token at `slash` as a regular expression literal.
    pub fn rescan_regex(&mut self, slash: usize) -> ParseResult<SpannedToken<'a>> {
        let bytes = self.source.as_bytes();
        let mut pos = slash + 1;
        let mut in_class = false;

        loop {
            match bytes.get(pos) {
                None | Some(b'\n') | Some(b'\r') => {
                    return Err(ParseError::UnterminatedRegex {
                        span: Span::new(slash, pos),
                    })
                }
                Some(b'\\') => pos += 2,
                Some(b'[') => {
                    in_class = true;
                    pos += 1;
                }
                Some(b']') => {
                    in_class = false;
                    pos += 1;
                }
                Some(b'/') if !in_class => break,
                Some(_) => pos += 1,
            }
        }

        pos += 1;
        while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'$') {
            pos += 1;
        }

        self.restart_from(pos);
        Ok(self.token_at(Token::Regex, slash, pos))
    }

    /// Restart the lexer from a new position.
    /// Uses bump() to advance within the current logos lexer when possible.
    pub fn restart_from(&mut self, pos: usize) {
        self.peeked = None;
        let logos_abs_pos = self.offset + self.inner.span().end;
        if pos > logos_abs_pos && pos <= self.source.len() {
            self.inner.bump(pos - logos_abs_pos);
        } else if pos < self.source.len() {
            self.inner = Token::lexer(&self.source[pos..]);
            self.offset = pos;
        } else {
            self.inner = Token::lexer("");
            self.offset = self.source.len();
        }
    }

    /// Collect all tokens (for debugging)
    pub fn collect_all(mut self) -> Vec<ParseResult<SpannedToken<'a>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<SpannedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize source code into a vector of spanned tokens
///
/// Regular expressions and template continuations depend on parser context
/// and are not recognized here.
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    Lexer::new(source).collect_all()
}

/// The name an identifier's source text denotes, with `\uXXXX` and
/// `\u{...}` escapes resolved
pub fn identifier_name(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    match decode_escapes(text) {
        Some(name) => Cow::Owned(name),
        None => Cow::Borrowed(text),
    }
}

fn decode_escapes(text: &str) -> Option<String> {
    let mut name = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find("\\u") {
        name.push_str(&rest[..at]);
        let escape = &rest[at + 2..];
        let (digits, len) = match escape.strip_prefix('{') {
            Some(braced) => {
                let close = braced.find('}')?;
                (&braced[..close], close + 2)
            }
            None => (escape.get(..4)?, 4),
        };
        name.push(u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?);
        rest = &escape[len..];
    }
    name.push_str(rest);
    Some(name)
}

/// An escaped identifier must decode to one that lexes the same way
/// unescaped; this rejects escaped keywords and escaped punctuation.
fn escapes_are_valid(token: Token, text: &str) -> bool {
    if !text.contains('\\') {
        return true;
    }
    let Some(decoded) = decode_escapes(text) else {
        return false;
    };
    let mut relexed = Token::lexer(&decoded);
    relexed.next() == Some(Ok(token))
        && relexed.span().end == decoded.len()
        && !relexed.slice().contains('\\')
}

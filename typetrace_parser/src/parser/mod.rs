//! Recursive descent parser for JavaScript modules
//!
//! Converts the token stream from the lexer into the typed AST. Statements
//! are parsed by recursive descent, expressions by precedence climbing.

mod expressions;
mod functions;
mod statements;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::Span;
use crate::token::Token;

/// Which of `yield` / `await` are operators in the current function.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FnContext {
    pub(crate) is_async: bool,
    pub(crate) is_generator: bool,
}

/// JavaScript parser
pub struct Parser<'a> {
    /// Source code
    pub(crate) source: &'a str,
    /// Lexer
    pub(crate) lexer: Lexer<'a>,
    /// Current token
    pub(crate) current: Option<SpannedToken<'a>>,
    /// A line terminator precedes the current token
    pub(crate) newline_before: bool,
    /// A line terminator was skipped while peeking past the current token
    pending_newline: bool,
    /// End offset of the previously consumed token
    pub(crate) prev_end: usize,
    /// `in` is not a binary operator (for-statement heads)
    pub(crate) no_in: bool,
    pub(crate) fn_ctx: FnContext,
    /// First lexer error; reported in place of the error it causes
    lex_error: Option<ParseError>,
}

impl std::fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("current", &self.current)
            .field("prev_end", &self.prev_end)
            .finish()
    }
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            current: None,
            newline_before: false,
            pending_newline: false,
            prev_end: 0,
            no_in: false,
            // Modules allow top-level await
            fn_ctx: FnContext {
                is_async: true,
                is_generator: false,
            },
            lex_error: None,
        }
    }

    /// Parse the source as an ES module
    pub fn parse(mut self) -> ParseResult<Program> {
        self.advance();

        let mut body = Vec::new();
        while !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(e) => return Err(self.lex_error.take().unwrap_or(e)),
            }
        }

        if let Some(e) = self.lex_error.take() {
            return Err(e);
        }

        Ok(Program {
            body,
            span: Span::new(0, self.source.len()),
        })
    }

    // ==================== Token Management ====================

    /// Advance to the next significant token, returning the previous one
    pub(crate) fn advance(&mut self) -> Option<SpannedToken<'a>> {
        let prev = self.current.take();
        if let Some(prev) = &prev {
            self.prev_end = prev.span.end;
        }
        self.newline_before = std::mem::take(&mut self.pending_newline);

        loop {
            match self.lexer.next_token() {
                Some(Ok(token)) if token.token.is_trivia() => {
                    if breaks_line(token.token) {
                        self.newline_before = true;
                    }
                }
                Some(Ok(token)) => {
                    self.current = Some(token);
                    break;
                }
                Some(Err(e)) => {
                    self.lex_error.get_or_insert(e);
                    break;
                }
                None => break,
            }
        }
        prev
    }

    /// Peek at the token after the current one
    pub(crate) fn peek_next(&mut self) -> Option<SpannedToken<'a>> {
        loop {
            let token = match self.lexer.peek() {
                Some(Ok(token)) => *token,
                _ => return None,
            };
            if !token.token.is_trivia() {
                return Some(token);
            }
            if breaks_line(token.token) {
                self.pending_newline = true;
            }
            let _ = self.lexer.next_token();
        }
    }

    /// Peek at the next token only if no line terminator separates it
    pub(crate) fn peek_next_same_line(&mut self) -> Option<Token> {
        let next = self.peek_next()?;
        (!self.pending_newline).then_some(next.token)
    }

    /// Replace the current token with one rescanned by the lexer
    pub(crate) fn replace_current(&mut self, token: SpannedToken<'a>) {
        self.pending_newline = false;
        self.current = Some(token);
    }

    /// Current token kind
    pub(crate) fn token(&self) -> Option<Token> {
        self.current.as_ref().map(|t| t.token)
    }

    /// Check if current token matches
    pub(crate) fn check(&self, expected: Token) -> bool {
        self.token() == Some(expected)
    }

    /// Check if the current token is the identifier `word`
    pub(crate) fn check_word(&self, word: &str) -> bool {
        matches!(&self.current, Some(t) if t.token == Token::Identifier && t.text == word)
    }

    /// Consume the current token if it matches
    pub(crate) fn eat(&mut self, expected: Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume current token if it matches, return error otherwise
    pub(crate) fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken<'a>> {
        match self.current {
            Some(current) if current.token == expected => {
                self.advance();
                Ok(current)
            }
            _ => Err(self.unexpected(&format!("{:?}", expected))),
        }
    }

    /// Consume the contextual keyword `word`
    pub(crate) fn expect_word(&mut self, word: &str) -> ParseResult<()> {
        if self.check_word(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", word)))
        }
    }

    /// Error for the current token
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current {
            Some(token) => ParseError::unexpected_token(token.text, expected, token.span),
            None => ParseError::unexpected_eof(expected, self.current_span()),
        }
    }

    /// Get the span of the current token
    pub(crate) fn current_span(&self) -> Span {
        self.current
            .as_ref()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::new(self.source.len(), self.source.len()))
    }

    /// Span from `start` to the end of the last consumed token
    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    /// Check if we're at end of input
    pub(crate) fn is_at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Terminate a statement, applying automatic semicolon insertion
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(Token::Semicolon)
            || self.check(Token::RBrace)
            || self.is_at_end()
            || self.newline_before
        {
            Ok(())
        } else {
            Err(self.unexpected("';'"))
        }
    }

    /// Run `f` with `in` re-enabled as a binary operator
    pub(crate) fn with_in<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    /// Run `f` inside a function body with the given context
    pub(crate) fn in_function<T>(
        &mut self,
        ctx: FnContext,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved_ctx = std::mem::replace(&mut self.fn_ctx, ctx);
        let saved_in = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.fn_ctx = saved_ctx;
        self.no_in = saved_in;
        result
    }
}

fn breaks_line(token: Token) -> bool {
    matches!(token, Token::Newline | Token::BlockCommentMultiline)
}

/// Parse JavaScript module source into a [`Program`]
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source).parse()
}

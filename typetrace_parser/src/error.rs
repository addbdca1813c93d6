//! Parse error types

use crate::span::{SourceMap, Span};
use thiserror::Error;

/// Parse error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unexpected token
    #[error("unexpected token '{found}' at byte {}, expected {expected}", span.start)]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// Unexpected end of input
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    /// Unterminated string
    #[error("unterminated string literal starting at byte {}", span.start)]
    UnterminatedString { span: Span },

    /// Unterminated template literal
    #[error("unterminated template literal starting at byte {}", span.start)]
    UnterminatedTemplate { span: Span },

    /// Unterminated regular expression
    #[error("unterminated regular expression starting at byte {}", span.start)]
    UnterminatedRegex { span: Span },

    /// Unterminated block comment
    #[error("unterminated block comment starting at byte {}", span.start)]
    UnterminatedBlockComment { span: Span },

    /// Invalid number literal
    #[error("invalid number literal '{literal}' at byte {}", span.start)]
    InvalidNumber { literal: String, span: Span },

    /// Invalid syntax
    #[error("{message} at byte {}", span.start)]
    InvalidSyntax { message: String, span: Span },

    /// Lexer error
    #[error("unrecognized character at byte {}", span.start)]
    LexerError { span: Span },
}

impl ParseError {
    /// Get the span of the error
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::UnterminatedString { span }
            | ParseError::UnterminatedTemplate { span }
            | ParseError::UnterminatedRegex { span }
            | ParseError::UnterminatedBlockComment { span }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexerError { span } => *span,
        }
    }

    /// Create an unexpected token error
    pub fn unexpected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
            span,
        }
    }

    /// Create an unexpected EOF error
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            span,
        }
    }

    /// Create an invalid syntax error
    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidSyntax {
            message: message.into(),
            span,
        }
    }

    /// Format error with source context
    ///
    /// Returns the offending source line with a caret marker under the error.
    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();
        let map = SourceMap::new(source);
        let (line_no, column) = map.line_col(span.start.min(source.len()));

        let Some(line) = source.lines().nth(line_no - 1) else {
            return String::new();
        };

        let col = column - 1;
        let width = span.len().clamp(1, line.len().saturating_sub(col).max(1));
        let gutter = " ".repeat(line_no.to_string().len());

        format!(
            "  {} | {}\n  {} | {}{}",
            line_no,
            line,
            gutter,
            " ".repeat(col),
            "^".repeat(width)
        )
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token() {
        let err = ParseError::unexpected_token("foo", "';'", Span::new(0, 3));
        assert_eq!(err.span(), Span::new(0, 3));
        assert!(err.to_string().contains("foo"));
        assert!(err.to_string().contains("';'"));
    }

    #[test]
    fn test_unexpected_eof() {
        let err = ParseError::unexpected_eof("expression", Span::new(10, 10));
        assert!(err.to_string().contains("expression"));
    }

    #[test]
    fn test_format_with_context() {
        let source = "let x = 1;\nlet y = ;";
        let err = ParseError::unexpected_token(";", "expression", Span::new(19, 20));

        let context = err.format_with_context(source);
        assert!(context.contains("let y = ;"));
        assert!(context.contains("        ^"));
        assert!(context.starts_with("  2 |"));
    }
}

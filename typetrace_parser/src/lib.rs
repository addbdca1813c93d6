//! typetrace_parser
//!
//! Pure Rust JavaScript module parser and printer used by the typetrace
//! instrumenter.
//!
//! Source is parsed into a typed AST ([`ast::Program`]), rewritten through
//! [`visit_mut::VisitMut`], and printed back with [`generate`].
//!
//! # Example
//!
//! ```
//! use typetrace_parser::{generate, parse};
//!
//! let program = parse("const add = (a, b) => a + b").unwrap();
//! assert_eq!(generate(&program), "const add = (a, b) => a + b;\n");
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
pub mod visit_mut;

// Re-exports
pub use codegen::{generate, generate_expr, Printer};
pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, SpannedToken};
pub use parser::{parse, Parser};
pub use span::{SourceMap, Span};
pub use token::{Associativity, InfixOp, Precedence, Token};
pub use visit_mut::VisitMut;

/// Tokenize JavaScript source
///
/// Returns every token, trivia included, with its span.
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    lexer::tokenize(source)
}

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let program = parse("").unwrap();
        assert!(program.body.is_empty());
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("1 + 2");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

//! Token definitions for the JavaScript lexer
//!
//! Contextual keywords (`let`, `of`, `async`, `get`, `set`, `static`, `from`,
//! `as`, `yield`, `await`) lex as `Identifier`; the parser checks their text.

mod precedence;

#[cfg(test)]
mod tests;

use logos::Logos;

pub use precedence::{Associativity, InfixOp, Precedence};

/// JavaScript tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\u{0B}\u{0C}\u{A0}\u{FEFF}]+")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("var")]
    KwVar,
    #[token("const")]
    KwConst,
    #[token("function")]
    KwFunction,
    #[token("return")]
    KwReturn,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("for")]
    KwFor,
    #[token("while")]
    KwWhile,
    #[token("do")]
    KwDo,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,
    #[token("switch")]
    KwSwitch,
    #[token("case")]
    KwCase,
    #[token("default")]
    KwDefault,
    #[token("throw")]
    KwThrow,
    #[token("try")]
    KwTry,
    #[token("catch")]
    KwCatch,
    #[token("finally")]
    KwFinally,
    #[token("new")]
    KwNew,
    #[token("delete")]
    KwDelete,
    #[token("typeof")]
    KwTypeof,
    #[token("void")]
    KwVoid,
    #[token("instanceof")]
    KwInstanceof,
    #[token("in")]
    KwIn,
    #[token("class")]
    KwClass,
    #[token("extends")]
    KwExtends,
    #[token("super")]
    KwSuper,
    #[token("this")]
    KwThis,
    #[token("import")]
    KwImport,
    #[token("export")]
    KwExport,
    #[token("debugger")]
    KwDebugger,
    #[token("with")]
    KwWith,

    // ==================== Literals ====================
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Number,

    #[regex(r"[0-9][0-9_]*n")]
    #[regex(r"0[xX][0-9a-fA-F_]+n")]
    #[regex(r"0[oO][0-7_]+n")]
    #[regex(r"0[bB][01_]+n")]
    BigInt,

    /// Opening quote; the lexer scans the body and reports `String`
    #[token("\"")]
    #[token("'")]
    Quote,
    /// Complete string literal, quotes included
    String,

    /// Opening backtick; the lexer scans up to the first substitution
    #[token("`")]
    Backtick,
    /// Template without substitutions: `` `abc` ``
    TemplateString,
    /// Template text up to the first `${`
    TemplateHead,
    /// Template text between `}` and the next `${`
    TemplateMiddle,
    /// Template text between `}` and the closing backtick
    TemplateTail,

    /// Regular expression literal; produced by rescanning a `/` or `/=`
    Regex,

    // ==================== Identifiers ====================
    /// May contain `\uXXXX` escapes; the lexer checks what they decode to
    #[regex(r"([_$\p{XID_Start}]|\\u[0-9a-fA-F]{4}|\\u\{[0-9a-fA-F]+\})([$\p{XID_Continue}\u{200C}\u{200D}]|\\u[0-9a-fA-F]{4}|\\u\{[0-9a-fA-F]+\})*")]
    Identifier,
    #[regex(r"#([_$\p{XID_Start}]|\\u[0-9a-fA-F]{4}|\\u\{[0-9a-fA-F]+\})([$\p{XID_Continue}\u{200C}\u{200D}]|\\u[0-9a-fA-F]{4}|\\u\{[0-9a-fA-F]+\})*")]
    PrivateName,

    // ==================== Delimiters ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // ==================== Punctuation ====================
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token("?.")]
    QuestionDot,
    #[token("=>")]
    FatArrow,

    // ==================== Operators ====================
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("**=")]
    StarStarEq,
    #[token("<<=")]
    LtLtEq,
    #[token(">>=")]
    GtGtEq,
    #[token(">>>=")]
    GtGtGtEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("&&=")]
    AndAndEq,
    #[token("||=")]
    OrOrEq,
    #[token("??=")]
    QuestionQuestionEq,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    NotEqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    StarStar,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token(">>>")]
    GtGtGt,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("??")]
    QuestionQuestion,

    // ==================== Trivia ====================
    #[regex(r"\r\n|\n|\r|\u{2028}|\u{2029}")]
    Newline,

    #[regex(r"//[^\n\r\u{2028}\u{2029}]*")]
    #[regex(r"#![^\n\r]*")]
    LineComment,

    /// `/*`; the lexer scans to the closing `*/`
    #[token("/*")]
    BlockCommentStart,
    /// Whole block comment; `multiline` variant spans a line break
    BlockComment,
    BlockCommentMultiline,
}

impl Token {
    /// Check if this token is a reserved word
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::KwVar
                | Token::KwConst
                | Token::KwFunction
                | Token::KwReturn
                | Token::KwIf
                | Token::KwElse
                | Token::KwFor
                | Token::KwWhile
                | Token::KwDo
                | Token::KwBreak
                | Token::KwContinue
                | Token::KwSwitch
                | Token::KwCase
                | Token::KwDefault
                | Token::KwThrow
                | Token::KwTry
                | Token::KwCatch
                | Token::KwFinally
                | Token::KwNew
                | Token::KwDelete
                | Token::KwTypeof
                | Token::KwVoid
                | Token::KwInstanceof
                | Token::KwIn
                | Token::KwClass
                | Token::KwExtends
                | Token::KwSuper
                | Token::KwThis
                | Token::KwImport
                | Token::KwExport
                | Token::KwDebugger
                | Token::KwWith
                | Token::Null
                | Token::True
                | Token::False
        )
    }

    /// Tokens usable as a property name after `.` or as an object key
    pub fn is_identifier_name(&self) -> bool {
        *self == Token::Identifier || self.is_keyword()
    }

    /// Check if this token is trivia skipped by the parser
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Newline
                | Token::LineComment
                | Token::BlockComment
                | Token::BlockCommentMultiline
        )
    }

    /// Check if this token is an assignment operator
    pub fn is_assignment(&self) -> bool {
        *self == Token::Eq || self.is_compound_assignment()
    }

    /// Check if this token is a compound assignment operator (`+=`, `??=`, ...)
    pub fn is_compound_assignment(&self) -> bool {
        matches!(
            self,
            Token::PlusEq
                | Token::MinusEq
                | Token::StarEq
                | Token::SlashEq
                | Token::PercentEq
                | Token::StarStarEq
                | Token::LtLtEq
                | Token::GtGtEq
                | Token::GtGtGtEq
                | Token::AmpEq
                | Token::PipeEq
                | Token::CaretEq
                | Token::AndAndEq
                | Token::OrOrEq
                | Token::QuestionQuestionEq
        )
    }

    /// Check if a `/` or `/=` in this position would start a regular expression
    pub fn may_start_regex(&self) -> bool {
        matches!(self, Token::Slash | Token::SlashEq)
    }
}

//! Operator precedence and associativity definitions
//!
//! The same scale drives the parser's precedence climbing and the printer's
//! parenthesization.

use super::Token;
use crate::ast::{BinaryOp, LogicalOp};

/// Operator precedence levels, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    /// Sequence: `a, b`
    Comma = 1,
    /// Yield: `yield x`
    Yield = 2,
    /// Assignment and arrow functions
    Assign = 3,
    /// Conditional: `a ? b : c`
    Conditional = 4,
    /// Nullish coalescing: `??`
    Coalesce = 5,
    /// Logical or: `||`
    LogicalOr = 6,
    /// Logical and: `&&`
    LogicalAnd = 7,
    /// Bitwise or: `|`
    BitOr = 8,
    /// Bitwise xor: `^`
    BitXor = 9,
    /// Bitwise and: `&`
    BitAnd = 10,
    /// Equality: `==`, `===`, ...
    Equality = 11,
    /// Relational: `<`, `instanceof`, `in`, ...
    Relational = 12,
    /// Shift: `<<`, `>>`, `>>>`
    Shift = 13,
    /// Additive: `+`, `-`
    Additive = 14,
    /// Multiplicative: `*`, `/`, `%`
    Multiplicative = 15,
    /// Exponent: `**`
    Exponent = 16,
    /// Prefix unary operators and `await`
    Prefix = 17,
    /// Postfix `++` / `--`
    Postfix = 18,
    /// Calls, member access, `new`
    Call = 19,
    /// Literals, identifiers, parenthesized expressions
    Primary = 20,
}

impl Precedence {
    /// The next tighter level (saturating at `Primary`)
    pub fn next(self) -> Precedence {
        use Precedence::*;
        match self {
            Comma => Yield,
            Yield => Assign,
            Assign => Conditional,
            Conditional => Coalesce,
            Coalesce => LogicalOr,
            LogicalOr => LogicalAnd,
            LogicalAnd => BitOr,
            BitOr => BitXor,
            BitXor => BitAnd,
            BitAnd => Equality,
            Equality => Relational,
            Relational => Shift,
            Shift => Additive,
            Additive => Multiplicative,
            Multiplicative => Exponent,
            Exponent => Prefix,
            Prefix => Postfix,
            Postfix => Call,
            Call | Primary => Primary,
        }
    }
}

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// A binary-position operator: arithmetic/bitwise/relational or short-circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl Token {
    /// Get the operator, precedence and associativity of a binary operator.
    ///
    /// Assignment, the conditional operator and the comma are handled by the
    /// parser directly and return `None` here.
    pub fn binary_precedence(&self) -> Option<(InfixOp, Precedence, Associativity)> {
        use Associativity::{Left, Right};
        use InfixOp::{Binary, Logical};
        use Precedence::*;

        Some(match self {
            Token::QuestionQuestion => (Logical(LogicalOp::Coalesce), Coalesce, Left),
            Token::OrOr => (Logical(LogicalOp::Or), LogicalOr, Left),
            Token::AndAnd => (Logical(LogicalOp::And), LogicalAnd, Left),
            Token::Pipe => (Binary(BinaryOp::BitOr), BitOr, Left),
            Token::Caret => (Binary(BinaryOp::BitXor), BitXor, Left),
            Token::Amp => (Binary(BinaryOp::BitAnd), BitAnd, Left),
            Token::EqEq => (Binary(BinaryOp::EqEq), Equality, Left),
            Token::NotEq => (Binary(BinaryOp::NotEq), Equality, Left),
            Token::EqEqEq => (Binary(BinaryOp::EqEqEq), Equality, Left),
            Token::NotEqEq => (Binary(BinaryOp::NotEqEq), Equality, Left),
            Token::Lt => (Binary(BinaryOp::Lt), Relational, Left),
            Token::Gt => (Binary(BinaryOp::Gt), Relational, Left),
            Token::LtEq => (Binary(BinaryOp::LtEq), Relational, Left),
            Token::GtEq => (Binary(BinaryOp::GtEq), Relational, Left),
            Token::KwInstanceof => (Binary(BinaryOp::InstanceOf), Relational, Left),
            Token::KwIn => (Binary(BinaryOp::In), Relational, Left),
            Token::LtLt => (Binary(BinaryOp::Shl), Shift, Left),
            Token::GtGt => (Binary(BinaryOp::Shr), Shift, Left),
            Token::GtGtGt => (Binary(BinaryOp::UShr), Shift, Left),
            Token::Plus => (Binary(BinaryOp::Add), Additive, Left),
            Token::Minus => (Binary(BinaryOp::Sub), Additive, Left),
            Token::Star => (Binary(BinaryOp::Mul), Multiplicative, Left),
            Token::Slash => (Binary(BinaryOp::Div), Multiplicative, Left),
            Token::Percent => (Binary(BinaryOp::Mod), Multiplicative, Left),
            Token::StarStar => (Binary(BinaryOp::Exp), Exponent, Right),
            _ => return None,
        })
    }
}

impl BinaryOp {
    /// Precedence of this operator
    pub fn precedence(&self) -> Precedence {
        use Precedence::*;
        match self {
            BinaryOp::BitOr => BitOr,
            BinaryOp::BitXor => BitXor,
            BinaryOp::BitAnd => BitAnd,
            BinaryOp::EqEq | BinaryOp::NotEq | BinaryOp::EqEqEq | BinaryOp::NotEqEq => Equality,
            BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq
            | BinaryOp::InstanceOf
            | BinaryOp::In => Relational,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => Shift,
            BinaryOp::Add | BinaryOp::Sub => Additive,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => Multiplicative,
            BinaryOp::Exp => Exponent,
        }
    }
}

impl LogicalOp {
    /// Precedence of this operator
    pub fn precedence(&self) -> Precedence {
        match self {
            LogicalOp::Coalesce => Precedence::Coalesce,
            LogicalOp::Or => Precedence::LogicalOr,
            LogicalOp::And => Precedence::LogicalAnd,
        }
    }
}

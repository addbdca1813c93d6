//! Tests for token module

use super::*;
use logos::Logos;

#[test]
fn test_keywords_and_contextual_words() {
    let mut lexer = Token::lexer("function return async yield of");
    assert_eq!(lexer.next(), Some(Ok(Token::KwFunction)));
    assert_eq!(lexer.next(), Some(Ok(Token::KwReturn)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
}

#[test]
fn test_operators() {
    let mut lexer = Token::lexer("?? ?. ** >>>= ... => !==");
    assert_eq!(lexer.next(), Some(Ok(Token::QuestionQuestion)));
    assert_eq!(lexer.next(), Some(Ok(Token::QuestionDot)));
    assert_eq!(lexer.next(), Some(Ok(Token::StarStar)));
    assert_eq!(lexer.next(), Some(Ok(Token::GtGtGtEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::Ellipsis)));
    assert_eq!(lexer.next(), Some(Ok(Token::FatArrow)));
    assert_eq!(lexer.next(), Some(Ok(Token::NotEqEq)));
}

#[test]
fn test_numbers() {
    let mut lexer = Token::lexer("42 3.14 .5 0xff 1e-3 10n 1_000");
    assert_eq!(lexer.next(), Some(Ok(Token::Number)));
    assert_eq!(lexer.next(), Some(Ok(Token::Number)));
    assert_eq!(lexer.next(), Some(Ok(Token::Number)));
    assert_eq!(lexer.next(), Some(Ok(Token::Number)));
    assert_eq!(lexer.next(), Some(Ok(Token::Number)));
    assert_eq!(lexer.next(), Some(Ok(Token::BigInt)));
    assert_eq!(lexer.next(), Some(Ok(Token::Number)));
}

#[test]
fn test_identifiers() {
    let mut lexer = Token::lexer("foo $bar _baz café #secret");
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::PrivateName)));
}

#[test]
fn test_comments_are_trivia() {
    let mut lexer = Token::lexer("a // rest\nb");
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    let comment = lexer.next();
    assert_eq!(comment, Some(Ok(Token::LineComment)));
    assert!(Token::LineComment.is_trivia());
    assert_eq!(lexer.next(), Some(Ok(Token::Newline)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
}

#[test]
fn test_binary_precedence() {
    let (_, add, _) = Token::Plus.binary_precedence().unwrap();
    let (_, mul, _) = Token::Star.binary_precedence().unwrap();
    let (_, exp, assoc) = Token::StarStar.binary_precedence().unwrap();
    assert!(mul > add);
    assert!(exp > mul);
    assert_eq!(assoc, Associativity::Right);
    assert!(Token::Eq.binary_precedence().is_none());
}

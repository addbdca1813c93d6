//! Expression parsing (precedence climbing)
//!
//! Handles:
//! - Sequence, assignment, conditional, binary and unary expressions
//! - Calls, member access, optional chains, `new`, tagged templates
//! - Primary expressions: literals, templates, arrays, objects, parentheses

use crate::ast::{
    AssignOp, Expr, ExprOrSpread, Ident, Lit, LitKind, MemberProp, MethodKind, Prop, PropKey,
    Template, UnaryOp, UpdateOp,
};
use crate::error::{ParseError, ParseResult};
use crate::lexer::identifier_name;
use crate::token::{Associativity, InfixOp, Precedence, Token};

use super::Parser;

impl<'a> Parser<'a> {
    /// Parse an expression, including the comma operator
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let first = self.parse_assignment()?;
        if !self.check(Token::Comma) {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.eat(Token::Comma) {
            exprs.push(self.parse_assignment()?);
        }
        Ok(Expr::Seq {
            exprs,
            span: self.span_from(start),
        })
    }

    /// Parse an assignment-level expression (also arrows and `yield`)
    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Expr> {
        if self.fn_ctx.is_generator && self.check_word("yield") {
            return self.parse_yield();
        }

        let start = self.current_span().start;
        let left = self.parse_conditional()?;

        let Some(op) = self.token().and_then(assign_op) else {
            return Ok(left);
        };
        if matches!(left, Expr::Arrow(_)) {
            return Ok(left);
        }
        self.advance();

        let target = if op == AssignOp::Assign {
            self.expr_to_pattern(left, false)?
        } else {
            match left {
                Expr::Ident(_) | Expr::Member { .. } => self.expr_to_pattern(left, false)?,
                other => {
                    return Err(ParseError::invalid_syntax(
                        "invalid compound assignment target",
                        other.span(),
                    ))
                }
            }
        };
        let value = self.parse_assignment()?;

        Ok(Expr::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
            span: self.span_from(start),
        })
    }

    fn parse_yield(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.advance();

        let delegate = !self.newline_before && self.eat(Token::Star);
        let has_arg = delegate
            || !(self.newline_before
                || self.is_at_end()
                || matches!(
                    self.token(),
                    Some(Token::RParen)
                        | Some(Token::RBracket)
                        | Some(Token::RBrace)
                        | Some(Token::Comma)
                        | Some(Token::Semicolon)
                        | Some(Token::Colon)
                ));
        let arg = if has_arg {
            Some(Box::new(self.parse_assignment()?))
        } else {
            None
        };

        Ok(Expr::Yield {
            arg,
            delegate,
            span: self.span_from(start),
        })
    }

    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let test = self.parse_binary(Precedence::Coalesce)?;
        if !self.eat(Token::Question) {
            return Ok(test);
        }

        let consequent = self.with_in(|p| p.parse_assignment())?;
        self.expect(Token::Colon)?;
        let alternate = self.parse_assignment()?;
        Ok(Expr::Cond {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.span_from(start),
        })
    }

    /// Binary operators at `min_prec` or tighter
    fn parse_binary(&mut self, min_prec: Precedence) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let current = self.current;
        let mut left = match current {
            Some(name) if name.token == Token::PrivateName && self.private_in(min_prec) => {
                self.advance();
                Expr::PrivateName(Ident::new(identifier_name(&name.text[1..]), name.span))
            }
            _ => self.parse_unary()?,
        };

        while let Some(token) = self.token() {
            let Some((op, prec, assoc)) = token.binary_precedence() else {
                break;
            };
            if prec < min_prec || (token == Token::KwIn && self.no_in) {
                break;
            }
            self.advance();

            let next_prec = match assoc {
                Associativity::Left => prec.next(),
                Associativity::Right => prec,
            };
            let right = Box::new(self.parse_binary(next_prec)?);
            let span = self.span_from(start);
            left = match op {
                InfixOp::Binary(op) => Expr::Binary {
                    op,
                    left: Box::new(left),
                    right,
                    span,
                },
                InfixOp::Logical(op) => Expr::Logical {
                    op,
                    left: Box::new(left),
                    right,
                    span,
                },
            };
        }

        Ok(left)
    }

    /// Whether the current `#name` starts an ergonomic brand check `#name in obj`
    fn private_in(&mut self, min_prec: Precedence) -> bool {
        min_prec <= Precedence::Relational
            && !self.no_in
            && self.peek_next().is_some_and(|next| next.token == Token::KwIn)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let unary = match self.token() {
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Tilde) => Some(UnaryOp::BitNot),
            Some(Token::Plus) => Some(UnaryOp::Plus),
            Some(Token::Minus) => Some(UnaryOp::Minus),
            Some(Token::KwTypeof) => Some(UnaryOp::TypeOf),
            Some(Token::KwVoid) => Some(UnaryOp::Void),
            Some(Token::KwDelete) => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = unary {
            self.advance();
            let arg = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary {
                op,
                arg,
                span: self.span_from(start),
            });
        }

        if let Some(op) = self.token().and_then(update_op) {
            self.advance();
            let arg = Box::new(self.parse_unary()?);
            return Ok(Expr::Update {
                op,
                prefix: true,
                arg,
                span: self.span_from(start),
            });
        }

        if self.fn_ctx.is_async && self.check_word("await") {
            self.advance();
            let arg = Box::new(self.parse_unary()?);
            return Ok(Expr::Await {
                arg,
                span: self.span_from(start),
            });
        }

        let expr = self.parse_left_hand_side()?;
        if !self.newline_before {
            if let Some(op) = self.token().and_then(update_op) {
                self.advance();
                return Ok(Expr::Update {
                    op,
                    prefix: false,
                    arg: Box::new(expr),
                    span: self.span_from(start),
                });
            }
        }
        Ok(expr)
    }

    /// Member access, calls and `new` chains
    fn parse_left_hand_side(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let mut expr = if self.check(Token::KwNew) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        if matches!(expr, Expr::Arrow(_)) {
            return Ok(expr);
        }

        loop {
            expr = match self.token() {
                Some(Token::LParen) => {
                    let args = self.parse_arguments()?;
                    Expr::Call {
                        callee: Box::new(expr),
                        args,
                        optional: false,
                        span: self.span_from(start),
                    }
                }
                Some(Token::QuestionDot) => {
                    self.advance();
                    match self.token() {
                        Some(Token::LParen) => {
                            let args = self.parse_arguments()?;
                            Expr::Call {
                                callee: Box::new(expr),
                                args,
                                optional: true,
                                span: self.span_from(start),
                            }
                        }
                        Some(Token::LBracket) => self.parse_computed_member(expr, start, true)?,
                        _ => {
                            let prop = self.parse_member_name()?;
                            Expr::Member {
                                object: Box::new(expr),
                                prop,
                                optional: true,
                                span: self.span_from(start),
                            }
                        }
                    }
                }
                Some(_) if self.at_member_tail() => self.parse_member_tail(expr, start)?,
                _ => break,
            };
        }

        Ok(expr)
    }

    fn at_member_tail(&self) -> bool {
        matches!(
            self.token(),
            Some(Token::Dot)
                | Some(Token::LBracket)
                | Some(Token::TemplateString)
                | Some(Token::TemplateHead)
        )
    }

    /// `.name`, `[expr]` or a tagged template after `expr`
    fn parse_member_tail(&mut self, expr: Expr, start: usize) -> ParseResult<Expr> {
        match self.token() {
            Some(Token::Dot) => {
                self.advance();
                let prop = self.parse_member_name()?;
                Ok(Expr::Member {
                    object: Box::new(expr),
                    prop,
                    optional: false,
                    span: self.span_from(start),
                })
            }
            Some(Token::LBracket) => self.parse_computed_member(expr, start, false),
            _ => {
                let quasi = self.parse_template()?;
                Ok(Expr::TaggedTemplate {
                    tag: Box::new(expr),
                    quasi,
                    span: self.span_from(start),
                })
            }
        }
    }

    fn parse_computed_member(
        &mut self,
        object: Expr,
        start: usize,
        optional: bool,
    ) -> ParseResult<Expr> {
        self.expect(Token::LBracket)?;
        let prop = self.with_in(|p| p.parse_expression())?;
        self.expect(Token::RBracket)?;
        Ok(Expr::Member {
            object: Box::new(object),
            prop: MemberProp::Computed(Box::new(prop)),
            optional,
            span: self.span_from(start),
        })
    }

    fn parse_member_name(&mut self) -> ParseResult<MemberProp> {
        match self.current {
            Some(token) if token.token == Token::PrivateName => {
                self.advance();
                Ok(MemberProp::Private(Ident::new(identifier_name(&token.text[1..]), token.span)))
            }
            Some(token) if token.token.is_identifier_name() => {
                self.advance();
                Ok(MemberProp::Ident(Ident::new(identifier_name(token.text), token.span)))
            }
            _ => Err(self.unexpected("property name")),
        }
    }

    fn parse_new(&mut self) -> ParseResult<Expr> {
        let new_token = self.expect(Token::KwNew)?;
        let start = new_token.span.start;

        if self.eat(Token::Dot) {
            let prop = self.parse_ident_name()?;
            return Ok(Expr::MetaProp {
                meta: Ident::new("new", new_token.span),
                prop,
                span: self.span_from(start),
            });
        }

        let callee_start = self.current_span().start;
        let mut callee = if self.check(Token::KwNew) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        while self.at_member_tail() {
            callee = self.parse_member_tail(callee, callee_start)?;
        }

        let args = if self.check(Token::LParen) {
            Some(self.parse_arguments()?)
        } else {
            None
        };
        Ok(Expr::New {
            callee: Box::new(callee),
            args,
            span: self.span_from(start),
        })
    }

    /// Parse `( args )` of a call or `new`
    pub(crate) fn parse_arguments(&mut self) -> ParseResult<Vec<ExprOrSpread>> {
        self.expect(Token::LParen)?;
        self.with_in(|p| {
            let mut args = Vec::new();
            while !p.eat(Token::RParen) {
                let spread = p.eat(Token::Ellipsis);
                let expr = p.parse_assignment()?;
                args.push(ExprOrSpread { spread, expr });
                if !p.eat(Token::Comma) {
                    p.expect(Token::RParen)?;
                    break;
                }
            }
            Ok(args)
        })
    }

    // ==================== Primary Expressions ====================

    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(current) = self.current else {
            return Err(self.unexpected("expression"));
        };
        let start = current.span.start;

        match current.token {
            Token::Identifier => {
                if current.text == "async" {
                    if let Some(expr) = self.try_parse_async_primary()? {
                        return Ok(expr);
                    }
                }
                let ident = self.parse_ident()?;
                if self.check(Token::FatArrow) && !self.newline_before {
                    return self.parse_arrow_from_params(
                        vec![crate::ast::Pattern::Ident(ident)],
                        start,
                        false,
                    );
                }
                Ok(Expr::Ident(ident))
            }
            Token::KwThis => {
                self.advance();
                Ok(Expr::This(current.span))
            }
            Token::KwSuper => {
                self.advance();
                Ok(Expr::Super(current.span))
            }
            Token::Null | Token::True | Token::False => {
                let kind = if current.token == Token::Null {
                    LitKind::Null
                } else {
                    LitKind::Bool
                };
                self.advance();
                Ok(literal(kind, current.text, current.span))
            }
            Token::Number => {
                self.advance();
                Ok(literal(LitKind::Num, current.text, current.span))
            }
            Token::BigInt => {
                self.advance();
                Ok(literal(LitKind::BigInt, current.text, current.span))
            }
            Token::String => {
                self.advance();
                Ok(literal(LitKind::Str, current.text, current.span))
            }
            Token::Slash | Token::SlashEq => {
                let regex = self.lexer.rescan_regex(start)?;
                self.replace_current(regex);
                self.advance();
                Ok(literal(LitKind::Regex, regex.text, regex.span))
            }
            Token::TemplateString | Token::TemplateHead => {
                Ok(Expr::Template(self.parse_template()?))
            }
            Token::KwFunction => Ok(Expr::Function(Box::new(
                self.parse_function(start, false, true)?,
            ))),
            Token::KwClass => Ok(Expr::Class(Box::new(self.parse_class(true)?))),
            Token::KwImport => {
                // import(...) or import.meta
                self.advance();
                if self.eat(Token::Dot) {
                    let prop = self.parse_ident_name()?;
                    return Ok(Expr::MetaProp {
                        meta: Ident::new("import", current.span),
                        prop,
                        span: self.span_from(start),
                    });
                }
                Ok(Expr::Ident(Ident::new("import", current.span)))
            }
            Token::LParen => self.parse_paren_or_arrow(start, false),
            Token::LBracket => self.parse_array_literal(),
            Token::LBrace => self.parse_object_literal(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Async arrows and async function expressions; `None` if `async` is a
    /// plain identifier here
    fn try_parse_async_primary(&mut self) -> ParseResult<Option<Expr>> {
        let start = self.current_span().start;
        match self.peek_next_same_line() {
            Some(Token::KwFunction) => {
                self.advance();
                let function = self.parse_function(start, true, true)?;
                Ok(Some(Expr::Function(Box::new(function))))
            }
            Some(Token::Identifier) => {
                self.advance();
                let param = self.parse_ident()?;
                if !self.check(Token::FatArrow) {
                    return Err(self.unexpected("'=>'"));
                }
                let arrow = self.parse_arrow_from_params(
                    vec![crate::ast::Pattern::Ident(param)],
                    start,
                    true,
                )?;
                Ok(Some(arrow))
            }
            Some(Token::LParen) => {
                self.advance();
                self.parse_paren_or_arrow(start, true).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Parenthesized expression or arrow parameter list.
    ///
    /// With `is_async`, the `async` keyword was consumed and a non-arrow
    /// result is the call `async(...)`.
    fn parse_paren_or_arrow(&mut self, start: usize, is_async: bool) -> ParseResult<Expr> {
        let open = self.expect(Token::LParen)?;
        let items = self.with_in(|p| {
            let mut items = Vec::new();
            while !p.eat(Token::RParen) {
                let spread = p.eat(Token::Ellipsis);
                let expr = if spread && matches!(p.token(), Some(Token::LBracket | Token::LBrace)) {
                    p.parse_primary()?
                } else {
                    p.parse_assignment()?
                };
                items.push(ExprOrSpread { spread, expr });
                if !p.eat(Token::Comma) {
                    p.expect(Token::RParen)?;
                    break;
                }
            }
            Ok::<_, ParseError>(items)
        })?;

        if self.check(Token::FatArrow) && !self.newline_before {
            let params = items
                .into_iter()
                .map(|item| self.param_from_item(item))
                .collect::<ParseResult<Vec<_>>>()?;
            return self.parse_arrow_from_params(params, start, is_async);
        }

        if is_async {
            return Ok(Expr::Call {
                callee: Box::new(Expr::Ident(Ident::new(
                    "async",
                    crate::span::Span::new(start, start + 5),
                ))),
                args: items,
                optional: false,
                span: self.span_from(start),
            });
        }

        if items.is_empty() || items.iter().any(|item| item.spread) {
            return Err(ParseError::invalid_syntax(
                "expected '=>' after parameter list",
                self.span_from(open.span.start),
            ));
        }

        let inner = if items.len() == 1 {
            items.into_iter().map(|item| item.expr).next().ok_or_else(|| {
                ParseError::invalid_syntax("empty parentheses", open.span)
            })?
        } else {
            let first = items[0].expr.span();
            Expr::Seq {
                span: self.span_from(first.start),
                exprs: items.into_iter().map(|item| item.expr).collect(),
            }
        };
        Ok(Expr::Paren {
            expr: Box::new(inner),
            span: self.span_from(start),
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let start = self.expect(Token::LBracket)?.span.start;
        self.with_in(|p| {
            let mut elems = Vec::new();
            while !p.eat(Token::RBracket) {
                if p.eat(Token::Comma) {
                    elems.push(None);
                    continue;
                }
                let spread = p.eat(Token::Ellipsis);
                let expr = p.parse_assignment()?;
                elems.push(Some(ExprOrSpread { spread, expr }));
                if !p.eat(Token::Comma) {
                    p.expect(Token::RBracket)?;
                    break;
                }
            }
            Ok(Expr::Array {
                elems,
                span: p.span_from(start),
            })
        })
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        let start = self.expect(Token::LBrace)?.span.start;
        self.with_in(|p| {
            let mut props = Vec::new();
            while !p.eat(Token::RBrace) {
                props.push(p.parse_object_property()?);
                if !p.eat(Token::Comma) {
                    p.expect(Token::RBrace)?;
                    break;
                }
            }
            Ok(Expr::Object {
                props,
                span: p.span_from(start),
            })
        })
    }

    fn parse_object_property(&mut self) -> ParseResult<Prop> {
        let start = self.current_span().start;

        if self.eat(Token::Ellipsis) {
            let arg = self.parse_assignment()?;
            return Ok(Prop::Spread {
                arg,
                span: self.span_from(start),
            });
        }

        let mut is_async = false;
        let mut is_generator = false;
        let mut kind = MethodKind::Method;

        if self.check_word("async") && self.modifier_applies(true) {
            self.advance();
            is_async = true;
        }
        if self.eat(Token::Star) {
            is_generator = true;
        }
        if !is_async && !is_generator {
            if self.check_word("get") && self.modifier_applies(false) {
                self.advance();
                kind = MethodKind::Getter;
            } else if self.check_word("set") && self.modifier_applies(false) {
                self.advance();
                kind = MethodKind::Setter;
            }
        }

        let key_token = self.current;
        let key = self.parse_prop_key(false)?;

        if self.check(Token::LParen) {
            let function = self.parse_method_function(start, is_async, is_generator)?;
            return Ok(Prop::Method {
                key,
                kind,
                function,
                span: self.span_from(start),
            });
        }
        if is_async || is_generator || kind != MethodKind::Method {
            return Err(self.unexpected("'('"));
        }

        if self.eat(Token::Colon) {
            let value = self.parse_assignment()?;
            return Ok(Prop::KeyValue {
                key,
                value,
                span: self.span_from(start),
            });
        }

        // Shorthand: only plain identifiers qualify
        match (key, key_token) {
            (PropKey::Ident(id), Some(token)) if token.token == Token::Identifier => {
                let default = if self.eat(Token::Eq) {
                    Some(self.parse_assignment()?)
                } else {
                    None
                };
                Ok(Prop::Shorthand {
                    id,
                    default,
                    span: self.span_from(start),
                })
            }
            _ => Err(self.unexpected("':'")),
        }
    }

    /// Whether `async`/`get`/`set`/`static` at the current token modifies the
    /// following member rather than naming it
    pub(crate) fn modifier_applies(&mut self, same_line: bool) -> bool {
        let Some(next) = self.peek_next() else {
            return false;
        };
        if same_line && self.peek_next_same_line().is_none() {
            return false;
        }
        next.token.is_identifier_name()
            || matches!(
                next.token,
                Token::String
                    | Token::Number
                    | Token::BigInt
                    | Token::LBracket
                    | Token::PrivateName
                    | Token::Star
            )
    }

    /// Parse a property key of an object literal or class body
    pub(crate) fn parse_prop_key(&mut self, allow_private: bool) -> ParseResult<PropKey> {
        let Some(current) = self.current else {
            return Err(self.unexpected("property name"));
        };
        match current.token {
            Token::LBracket => {
                self.advance();
                let expr = self.with_in(|p| p.parse_assignment())?;
                self.expect(Token::RBracket)?;
                Ok(PropKey::Computed(Box::new(expr)))
            }
            Token::String => {
                self.advance();
                Ok(PropKey::Lit(Lit {
                    kind: LitKind::Str,
                    raw: current.text.to_string(),
                    span: current.span,
                }))
            }
            Token::Number | Token::BigInt => {
                self.advance();
                Ok(PropKey::Lit(Lit {
                    kind: LitKind::Num,
                    raw: current.text.to_string(),
                    span: current.span,
                }))
            }
            Token::PrivateName if allow_private => {
                self.advance();
                Ok(PropKey::Private(Ident::new(identifier_name(&current.text[1..]), current.span)))
            }
            token if token.is_identifier_name() => {
                self.advance();
                Ok(PropKey::Ident(Ident::new(identifier_name(current.text), current.span)))
            }
            _ => Err(self.unexpected("property name")),
        }
    }

    /// Parse a template literal starting at `TemplateString` or `TemplateHead`
    pub(crate) fn parse_template(&mut self) -> ParseResult<Template> {
        let Some(head) = self.current else {
            return Err(self.unexpected("template"));
        };
        let start = head.span.start;
        self.advance();

        if head.token == Token::TemplateString {
            return Ok(Template {
                quasis: vec![chunk(head.text, 1, 1)],
                exprs: Vec::new(),
                span: head.span,
            });
        }

        let mut quasis = vec![chunk(head.text, 1, 2)];
        let mut exprs = Vec::new();
        loop {
            exprs.push(self.with_in(|p| p.parse_expression())?);
            let brace = match self.current {
                Some(token) if token.token == Token::RBrace => token,
                _ => return Err(self.unexpected("'}' in template")),
            };
            let next = self.lexer.continue_template(brace.span.start)?;
            self.replace_current(next);
            self.advance();
            if next.token == Token::TemplateTail {
                quasis.push(chunk(next.text, 1, 1));
                break;
            }
            quasis.push(chunk(next.text, 1, 2));
        }

        Ok(Template {
            quasis,
            exprs,
            span: self.span_from(start),
        })
    }

    // ==================== Identifiers ====================

    /// Parse a binding or reference identifier
    pub(crate) fn parse_ident(&mut self) -> ParseResult<Ident> {
        match self.current {
            Some(token) if token.token == Token::Identifier => {
                self.advance();
                Ok(Ident::new(identifier_name(token.text), token.span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse any identifier name, reserved words included
    pub(crate) fn parse_ident_name(&mut self) -> ParseResult<Ident> {
        match self.current {
            Some(token) if token.token.is_identifier_name() => {
                self.advance();
                Ok(Ident::new(identifier_name(token.text), token.span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }
}

fn literal(kind: LitKind, raw: &str, span: crate::span::Span) -> Expr {
    Expr::Lit(Lit {
        kind,
        raw: raw.to_string(),
        span,
    })
}

/// Strip template delimiters from a raw chunk
fn chunk(text: &str, prefix: usize, suffix: usize) -> String {
    text.get(prefix..text.len().saturating_sub(suffix))
        .unwrap_or_default()
        .to_string()
}

fn assign_op(token: Token) -> Option<AssignOp> {
    Some(match token {
        Token::Eq => AssignOp::Assign,
        Token::PlusEq => AssignOp::Add,
        Token::MinusEq => AssignOp::Sub,
        Token::StarEq => AssignOp::Mul,
        Token::SlashEq => AssignOp::Div,
        Token::PercentEq => AssignOp::Mod,
        Token::StarStarEq => AssignOp::Exp,
        Token::LtLtEq => AssignOp::Shl,
        Token::GtGtEq => AssignOp::Shr,
        Token::GtGtGtEq => AssignOp::UShr,
        Token::AmpEq => AssignOp::BitAnd,
        Token::PipeEq => AssignOp::BitOr,
        Token::CaretEq => AssignOp::BitXor,
        Token::AndAndEq => AssignOp::And,
        Token::OrOrEq => AssignOp::Or,
        Token::QuestionQuestionEq => AssignOp::Coalesce,
        _ => return None,
    })
}

fn update_op(token: Token) -> Option<UpdateOp> {
    match token {
        Token::PlusPlus => Some(UpdateOp::Increment),
        Token::MinusMinus => Some(UpdateOp::Decrement),
        _ => None,
    }
}

//! Functions, classes, parameters and patterns
//!
//! Arrow parameters and destructuring assignment targets are first parsed
//! as expressions and reinterpreted as patterns once the parser sees `=>`
//! or `=`.

use crate::ast::{
    AssignOp, Class, ClassMember, Expr, ExprOrSpread, Function, FunctionBody, MethodKind,
    ObjectPatProp, Pattern, Prop, PropKey,
};
use crate::error::{ParseError, ParseResult};
use crate::token::Token;

use super::{FnContext, Parser};

impl<'a> Parser<'a> {
    /// Parse `function [*] [name] (params) { body }`.
    ///
    /// `start` is the offset of the construct (the `async` keyword when
    /// present, which the caller has already consumed).
    pub(crate) fn parse_function(
        &mut self,
        start: usize,
        is_async: bool,
        allow_anonymous: bool,
    ) -> ParseResult<Function> {
        self.expect(Token::KwFunction)?;
        let is_generator = self.eat(Token::Star);

        let id = if self.check(Token::Identifier) {
            Some(self.parse_ident()?)
        } else if allow_anonymous {
            None
        } else {
            return Err(self.unexpected("function name"));
        };

        let ctx = FnContext {
            is_async,
            is_generator,
        };
        let (params, body) = self.in_function(ctx, |p| {
            let params = p.parse_params()?;
            let body = p.parse_block()?;
            Ok::<_, ParseError>((params, body))
        })?;

        Ok(Function {
            id,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_generator,
            is_arrow: false,
            span: self.span_from(start),
        })
    }

    /// Parameters and body of an object or class method
    pub(crate) fn parse_method_function(
        &mut self,
        start: usize,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<Function> {
        let ctx = FnContext {
            is_async,
            is_generator,
        };
        let (params, body) = self.in_function(ctx, |p| {
            let params = p.parse_params()?;
            let body = p.parse_block()?;
            Ok::<_, ParseError>((params, body))
        })?;

        Ok(Function {
            id: None,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_generator,
            is_arrow: false,
            span: self.span_from(start),
        })
    }

    /// Parse `=> body` for already-parsed parameters
    pub(crate) fn parse_arrow_from_params(
        &mut self,
        params: Vec<Pattern>,
        start: usize,
        is_async: bool,
    ) -> ParseResult<Expr> {
        self.expect(Token::FatArrow)?;
        let ctx = FnContext {
            is_async,
            is_generator: false,
        };
        let no_in = self.no_in;
        let body = self.in_function(ctx, |p| {
            if p.check(Token::LBrace) {
                p.parse_block().map(FunctionBody::Block)
            } else {
                // A concise body keeps the surrounding `in` restriction
                p.no_in = no_in;
                p.parse_assignment().map(|e| FunctionBody::Expr(Box::new(e)))
            }
        })?;

        Ok(Expr::Arrow(Box::new(Function {
            id: None,
            params,
            body,
            is_async,
            is_generator: false,
            is_arrow: true,
            span: self.span_from(start),
        })))
    }

    /// Parse a parenthesized formal parameter list
    fn parse_params(&mut self) -> ParseResult<Vec<Pattern>> {
        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        while !self.eat(Token::RParen) {
            let start = self.current_span().start;
            if self.eat(Token::Ellipsis) {
                let arg = self.parse_binding_target()?;
                params.push(Pattern::Rest {
                    arg: Box::new(arg),
                    span: self.span_from(start),
                });
                self.expect(Token::RParen)?;
                break;
            }

            let target = self.parse_binding_target()?;
            let param = if self.eat(Token::Eq) {
                let right = self.parse_assignment()?;
                Pattern::Assign {
                    left: Box::new(target),
                    right: Box::new(right),
                    span: self.span_from(start),
                }
            } else {
                target
            };
            params.push(param);

            if !self.eat(Token::Comma) {
                self.expect(Token::RParen)?;
                break;
            }
        }
        Ok(params)
    }

    /// Arrow parameter from an item of a parenthesized list
    pub(crate) fn param_from_item(&self, item: ExprOrSpread) -> ParseResult<Pattern> {
        let span = item.expr.span();
        let pattern = self.expr_to_pattern(item.expr, true)?;
        if item.spread {
            Ok(Pattern::Rest {
                arg: Box::new(pattern),
                span,
            })
        } else {
            Ok(pattern)
        }
    }

    /// Reinterpret an expression as a pattern.
    ///
    /// `binding` patterns (declarations, parameters) only admit identifiers at
    /// the leaves; assignment patterns also admit member expressions.
    pub(crate) fn expr_to_pattern(&self, expr: Expr, binding: bool) -> ParseResult<Pattern> {
        match expr {
            Expr::Ident(ident) => Ok(Pattern::Ident(ident)),
            Expr::Array { elems, span } => {
                let elems = elems
                    .into_iter()
                    .map(|elem| {
                        elem.map(|item| {
                            let item_span = item.expr.span();
                            let pattern = self.expr_to_pattern(item.expr, binding)?;
                            Ok(if item.spread {
                                Pattern::Rest {
                                    arg: Box::new(pattern),
                                    span: item_span,
                                }
                            } else {
                                pattern
                            })
                        })
                        .transpose()
                    })
                    .collect::<ParseResult<Vec<_>>>()?;
                Ok(Pattern::Array { elems, span })
            }
            Expr::Object { props, span } => {
                let props = props
                    .into_iter()
                    .map(|prop| self.prop_to_pattern(prop, binding))
                    .collect::<ParseResult<Vec<_>>>()?;
                Ok(Pattern::Object { props, span })
            }
            Expr::Assign {
                op: AssignOp::Assign,
                target,
                value,
                span,
            } => Ok(Pattern::Assign {
                left: target,
                right: value,
                span,
            }),
            Expr::Paren { expr, .. } if !binding => self.expr_to_pattern(*expr, binding),
            Expr::Member { .. } if !binding => Ok(Pattern::Expr(Box::new(expr))),
            other => Err(ParseError::invalid_syntax(
                "invalid destructuring target",
                other.span(),
            )),
        }
    }

    fn prop_to_pattern(&self, prop: Prop, binding: bool) -> ParseResult<ObjectPatProp> {
        match prop {
            Prop::KeyValue { key, value, span } => Ok(ObjectPatProp::KeyValue {
                key,
                value: self.expr_to_pattern(value, binding)?,
                span,
            }),
            Prop::Shorthand { id, default, span } => {
                Ok(ObjectPatProp::Shorthand { id, default, span })
            }
            Prop::Spread { arg, span } => Ok(ObjectPatProp::Rest {
                arg: self.expr_to_pattern(arg, binding)?,
                span,
            }),
            Prop::Method { span, .. } => Err(ParseError::invalid_syntax(
                "method in destructuring pattern",
                span,
            )),
        }
    }

    // ==================== Classes ====================

    /// Parse `class [name] [extends expr] { members }`
    pub(crate) fn parse_class(&mut self, allow_anonymous: bool) -> ParseResult<Class> {
        let start = self.expect(Token::KwClass)?.span.start;
        let id = if self.check(Token::Identifier) {
            Some(self.parse_ident()?)
        } else if allow_anonymous {
            None
        } else {
            return Err(self.unexpected("class name"));
        };

        let super_class = if self.eat(Token::KwExtends) {
            Some(Box::new(self.parse_class_heritage()?))
        } else {
            None
        };

        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while !self.eat(Token::RBrace) {
            if self.eat(Token::Semicolon) {
                continue;
            }
            if self.is_at_end() {
                return Err(self.unexpected("'}'"));
            }
            body.push(self.parse_class_member()?);
        }

        Ok(Class {
            id,
            super_class,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_class_heritage(&mut self) -> ParseResult<Expr> {
        // LeftHandSideExpression: member/call chain without binary operators
        let saved = self.no_in;
        self.no_in = false;
        let expr = self.parse_primary_chain();
        self.no_in = saved;
        expr
    }

    fn parse_primary_chain(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let mut expr = self.parse_primary()?;
        loop {
            expr = match self.token() {
                Some(Token::Dot) => {
                    self.advance();
                    let prop = self.parse_ident_name()?;
                    Expr::member_from(expr, prop, self.span_from(start))
                }
                Some(Token::LParen) => {
                    let args = self.parse_arguments()?;
                    Expr::Call {
                        callee: Box::new(expr),
                        args,
                        optional: false,
                        span: self.span_from(start),
                    }
                }
                _ => break,
            };
        }
        Ok(expr)
    }

    fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        let start = self.current_span().start;

        let mut is_static = false;
        if self.check_word("static") && self.member_modifier_applies() {
            self.advance();
            if self.check(Token::LBrace) {
                let body = self.in_function(
                    FnContext {
                        is_async: false,
                        is_generator: false,
                    },
                    |p| p.parse_block(),
                )?;
                return Ok(ClassMember::StaticBlock {
                    body,
                    span: self.span_from(start),
                });
            }
            is_static = true;
        }

        let mut is_async = false;
        if self.check_word("async") && self.modifier_applies(true) {
            self.advance();
            is_async = true;
        }
        let is_generator = self.eat(Token::Star);

        let mut kind = MethodKind::Method;
        if !is_async && !is_generator {
            if self.check_word("get") && self.modifier_applies(false) {
                self.advance();
                kind = MethodKind::Getter;
            } else if self.check_word("set") && self.modifier_applies(false) {
                self.advance();
                kind = MethodKind::Setter;
            }
        }

        let key = self.parse_prop_key(true)?;

        if self.check(Token::LParen) {
            let is_constructor = !is_static
                && kind == MethodKind::Method
                && matches!(&key, PropKey::Ident(id) if id.name == "constructor");
            if is_constructor {
                kind = MethodKind::Constructor;
            }
            let function = self.parse_method_function(start, is_async, is_generator)?;
            return Ok(ClassMember::Method {
                key,
                kind,
                is_static,
                function,
                span: self.span_from(start),
            });
        }
        if is_async || is_generator || kind != MethodKind::Method {
            return Err(self.unexpected("'('"));
        }

        let value = if self.eat(Token::Eq) {
            let ctx = FnContext {
                is_async: false,
                is_generator: false,
            };
            Some(self.in_function(ctx, |p| p.parse_assignment())?)
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(ClassMember::Property {
            key,
            is_static,
            value,
            span: self.span_from(start),
        })
    }

    /// `static` is a modifier unless it names the member itself
    fn member_modifier_applies(&mut self) -> bool {
        self.modifier_applies(false) || self.peek_next().map(|t| t.token) == Some(Token::LBrace)
    }
}

impl Expr {
    fn member_from(object: Expr, prop: crate::ast::Ident, span: crate::span::Span) -> Expr {
        Expr::Member {
            object: Box::new(object),
            prop: crate::ast::MemberProp::Ident(prop),
            optional: false,
            span,
        }
    }
}

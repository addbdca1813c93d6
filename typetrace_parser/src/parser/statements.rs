//! Statement parsing
//!
//! Handles declarations, control flow, jumps and module items.

use crate::ast::{
    Block, CatchClause, DefaultExport, ExportDecl, ExportSpecifier, Expr, ForHead, ForInit,
    ImportDecl, ImportSpecifier, Lit, LitKind, Pattern, Stmt, SwitchCase, VarDecl, VarDeclarator,
    VarKind,
};
use crate::error::{ParseError, ParseResult};
use crate::token::Token;

use super::Parser;

impl<'a> Parser<'a> {
    /// Parse one statement or declaration.
    ///
    /// Dispatches on the current token; anything that is not a keyword-led
    /// statement, a label or a `let` declaration is an expression statement.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let Some(current) = self.current else {
            return Err(self.unexpected("statement"));
        };
        let start = current.span.start;

        match current.token {
            Token::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            Token::Semicolon => {
                self.advance();
                Ok(Stmt::Empty {
                    span: current.span,
                })
            }
            Token::KwVar | Token::KwConst => self.parse_var_statement(),
            Token::KwFunction => Ok(Stmt::Function(self.parse_function(start, false, false)?)),
            Token::KwClass => Ok(Stmt::Class(self.parse_class(false)?)),
            Token::KwIf => self.parse_if_statement(),
            Token::KwFor => self.parse_for_statement(),
            Token::KwWhile => {
                self.advance();
                let test = self.parse_paren_condition()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::While {
                    test,
                    body,
                    span: self.span_from(start),
                })
            }
            Token::KwDo => {
                self.advance();
                let body = Box::new(self.parse_statement()?);
                self.expect(Token::KwWhile)?;
                let test = self.parse_paren_condition()?;
                self.eat(Token::Semicolon);
                Ok(Stmt::DoWhile {
                    body,
                    test,
                    span: self.span_from(start),
                })
            }
            Token::KwReturn => {
                self.advance();
                let arg = self.parse_restricted_argument()?;
                self.consume_semicolon()?;
                Ok(Stmt::Return {
                    arg,
                    span: self.span_from(start),
                })
            }
            Token::KwBreak | Token::KwContinue => {
                self.advance();
                let label = if self.check(Token::Identifier) && !self.newline_before {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                self.consume_semicolon()?;
                let span = self.span_from(start);
                Ok(if current.token == Token::KwBreak {
                    Stmt::Break { label, span }
                } else {
                    Stmt::Continue { label, span }
                })
            }
            Token::KwThrow => {
                self.advance();
                if self.newline_before {
                    return Err(ParseError::invalid_syntax(
                        "illegal newline after throw",
                        self.current_span(),
                    ));
                }
                let arg = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Stmt::Throw {
                    arg,
                    span: self.span_from(start),
                })
            }
            Token::KwTry => self.parse_try_statement(),
            Token::KwSwitch => self.parse_switch_statement(),
            Token::KwDebugger => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Stmt::Debugger {
                    span: self.span_from(start),
                })
            }
            Token::KwImport => {
                let next = self.peek_next().map(|t| t.token);
                if matches!(next, Some(Token::LParen) | Some(Token::Dot)) {
                    self.parse_expression_statement()
                } else {
                    self.parse_import_declaration()
                }
            }
            Token::KwExport => self.parse_export_declaration(),
            Token::Identifier => {
                if current.text == "let" && self.let_starts_declaration() {
                    return self.parse_var_statement();
                }
                if current.text == "async"
                    && self.peek_next_same_line() == Some(Token::KwFunction)
                {
                    self.advance();
                    return Ok(Stmt::Function(self.parse_function(start, true, false)?));
                }
                if self.peek_next().map(|t| t.token) == Some(Token::Colon) {
                    let label = self.parse_ident()?;
                    self.advance();
                    let body = Box::new(self.parse_statement()?);
                    return Ok(Stmt::Labeled {
                        label,
                        body,
                        span: self.span_from(start),
                    });
                }
                self.parse_expression_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span().start;
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Stmt::Expr {
            expr,
            span: self.span_from(start),
        })
    }

    /// `let` followed by a binding starts a declaration
    fn let_starts_declaration(&mut self) -> bool {
        matches!(
            self.peek_next().map(|t| t.token),
            Some(Token::Identifier) | Some(Token::LBracket) | Some(Token::LBrace)
        )
    }

    /// Argument of `return`, absent before a line break or statement end
    fn parse_restricted_argument(&mut self) -> ParseResult<Option<Expr>> {
        if self.newline_before
            || self.is_at_end()
            || self.check(Token::Semicolon)
            || self.check(Token::RBrace)
        {
            Ok(None)
        } else {
            self.parse_expression().map(Some)
        }
    }

    /// Parse a `{ ... }` block
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.expect(Token::LBrace)?.span.start;
        let mut body = Vec::new();
        while !self.check(Token::RBrace) {
            if self.is_at_end() {
                return Err(self.unexpected("'}'"));
            }
            body.push(self.parse_statement()?);
        }
        self.advance();
        Ok(Block {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_paren_condition(&mut self) -> ParseResult<Expr> {
        self.expect(Token::LParen)?;
        let test = self.with_in(|p| p.parse_expression())?;
        self.expect(Token::RParen)?;
        Ok(test)
    }

    // ==================== Declarations ====================

    fn parse_var_statement(&mut self) -> ParseResult<Stmt> {
        let decl = self.parse_var_declaration()?;
        self.consume_semicolon()?;
        let span = self.span_from(decl.span.start);
        Ok(Stmt::Var(VarDecl { span, ..decl }))
    }

    /// Parse `var|let|const` declarators (without the terminating semicolon)
    pub(crate) fn parse_var_declaration(&mut self) -> ParseResult<VarDecl> {
        let start = self.current_span().start;
        let kind = match self.token() {
            Some(Token::KwVar) => VarKind::Var,
            Some(Token::KwConst) => VarKind::Const,
            _ if self.check_word("let") => VarKind::Let,
            _ => return Err(self.unexpected("variable declaration")),
        };
        self.advance();

        let mut decls = Vec::new();
        loop {
            let decl_start = self.current_span().start;
            let id = self.parse_binding_target()?;
            let init = if self.eat(Token::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            decls.push(VarDeclarator {
                id,
                init,
                span: self.span_from(decl_start),
            });
            if !self.eat(Token::Comma) {
                break;
            }
        }

        Ok(VarDecl {
            kind,
            decls,
            span: self.span_from(start),
        })
    }

    // ==================== Control Flow ====================

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwIf)?.span.start;
        let test = self.parse_paren_condition()?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.eat(Token::KwElse) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        })
    }

    /// Parse `for (;;)`, `for (.. in ..)`, `for (.. of ..)` and `for await`
    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwFor)?.span.start;
        let is_await = if self.check_word("await") {
            self.advance();
            true
        } else {
            false
        };
        self.expect(Token::LParen)?;

        let mut init = None;
        if !self.check(Token::Semicolon) {
            let is_decl = matches!(self.token(), Some(Token::KwVar) | Some(Token::KwConst))
                || (self.check_word("let") && self.let_starts_declaration());

            self.no_in = true;
            let parsed = if is_decl {
                self.parse_var_declaration().map(ForInit::Var)
            } else {
                self.parse_expression().map(ForInit::Expr)
            };
            self.no_in = false;
            let parsed = parsed?;

            let is_of = self.check_word("of");
            if is_of || self.check(Token::KwIn) {
                self.advance();
                let left = match parsed {
                    ForInit::Var(decl) => ForHead::Var(decl),
                    ForInit::Expr(expr) => ForHead::Pattern(self.expr_to_pattern(expr, false)?),
                };
                let right = if is_of {
                    self.with_in(|p| p.parse_assignment())?
                } else {
                    self.with_in(|p| p.parse_expression())?
                };
                self.expect(Token::RParen)?;
                let body = Box::new(self.parse_statement()?);
                let span = self.span_from(start);
                return Ok(if is_of {
                    Stmt::ForOf {
                        left,
                        right,
                        body,
                        is_await,
                        span,
                    }
                } else {
                    Stmt::ForIn {
                        left,
                        right,
                        body,
                        span,
                    }
                });
            }
            init = Some(parsed);
        }

        self.expect(Token::Semicolon)?;
        let test = if self.check(Token::Semicolon) {
            None
        } else {
            Some(self.with_in(|p| p.parse_expression())?)
        };
        self.expect(Token::Semicolon)?;
        let update = if self.check(Token::RParen) {
            None
        } else {
            Some(self.with_in(|p| p.parse_expression())?)
        };
        self.expect(Token::RParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_try_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwTry)?.span.start;
        let block = self.parse_block()?;

        let handler = if self.check(Token::KwCatch) {
            let catch_start = self.current_span().start;
            self.advance();
            let param = if self.eat(Token::LParen) {
                let param = self.parse_binding_target()?;
                self.expect(Token::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                param,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.eat(Token::KwFinally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("'catch' or 'finally'"));
        }

        Ok(Stmt::Try {
            block,
            handler,
            finalizer,
            span: self.span_from(start),
        })
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwSwitch)?.span.start;
        let discriminant = self.parse_paren_condition()?;
        self.expect(Token::LBrace)?;

        let mut cases = Vec::new();
        while !self.eat(Token::RBrace) {
            let case_start = self.current_span().start;
            let test = if self.eat(Token::KwCase) {
                Some(self.with_in(|p| p.parse_expression())?)
            } else {
                self.expect(Token::KwDefault)?;
                None
            };
            self.expect(Token::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.token(),
                Some(Token::KwCase) | Some(Token::KwDefault) | Some(Token::RBrace) | None
            ) {
                consequent.push(self.parse_statement()?);
            }
            cases.push(SwitchCase {
                test,
                consequent,
                span: self.span_from(case_start),
            });
        }

        Ok(Stmt::Switch {
            discriminant,
            cases,
            span: self.span_from(start),
        })
    }

    // ==================== Modules ====================

    fn parse_module_source(&mut self) -> ParseResult<Lit> {
        let token = self.expect(Token::String)?;
        Ok(Lit {
            kind: LitKind::Str,
            raw: token.text.to_string(),
            span: token.span,
        })
    }

    /// Identifier name or string used as an import/export name
    fn parse_module_export_name(&mut self) -> ParseResult<String> {
        match self.current {
            Some(token) if token.token.is_identifier_name() || token.token == Token::String => {
                self.advance();
                Ok(token.text.to_string())
            }
            _ => Err(self.unexpected("export name")),
        }
    }

    fn parse_import_declaration(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwImport)?.span.start;
        let mut specifiers = Vec::new();

        if !self.check(Token::String) {
            if self.check(Token::Identifier) {
                specifiers.push(ImportSpecifier::Default(self.parse_ident()?));
                if self.eat(Token::Comma) {
                    self.parse_import_clause(&mut specifiers)?;
                }
            } else {
                self.parse_import_clause(&mut specifiers)?;
            }
            self.expect_word("from")?;
        }

        let source = self.parse_module_source()?;
        self.consume_semicolon()?;
        Ok(Stmt::Import(ImportDecl {
            specifiers,
            source,
            span: self.span_from(start),
        }))
    }

    /// `* as ns` or `{ a, b as c }`
    fn parse_import_clause(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> ParseResult<()> {
        if self.eat(Token::Star) {
            self.expect_word("as")?;
            specifiers.push(ImportSpecifier::Namespace(self.parse_ident()?));
            return Ok(());
        }

        self.expect(Token::LBrace)?;
        while !self.eat(Token::RBrace) {
            let imported_token = self.current;
            let imported = self.parse_module_export_name()?;
            let local = if self.check_word("as") {
                self.advance();
                self.parse_ident()?
            } else {
                match imported_token {
                    Some(token) if token.token == Token::Identifier => {
                        crate::ast::Ident::new(crate::lexer::identifier_name(token.text), token.span)
                    }
                    _ => return Err(self.unexpected("'as'")),
                }
            };
            specifiers.push(ImportSpecifier::Named { imported, local });
            if !self.eat(Token::Comma) {
                self.expect(Token::RBrace)?;
                break;
            }
        }
        Ok(())
    }

    fn parse_export_declaration(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwExport)?.span.start;

        if self.eat(Token::KwDefault) {
            let value_start = self.current_span().start;
            let value = if self.check(Token::KwFunction) {
                DefaultExport::Function(self.parse_function(value_start, false, true)?)
            } else if self.check_word("async")
                && self.peek_next_same_line() == Some(Token::KwFunction)
            {
                self.advance();
                DefaultExport::Function(self.parse_function(value_start, true, true)?)
            } else if self.check(Token::KwClass) {
                DefaultExport::Class(self.parse_class(true)?)
            } else {
                let expr = self.parse_assignment()?;
                self.consume_semicolon()?;
                DefaultExport::Expr(expr)
            };
            return Ok(Stmt::Export(ExportDecl::Default {
                value,
                span: self.span_from(start),
            }));
        }

        if self.eat(Token::Star) {
            let exported = if self.check_word("as") {
                self.advance();
                Some(self.parse_module_export_name()?)
            } else {
                None
            };
            self.expect_word("from")?;
            let source = self.parse_module_source()?;
            self.consume_semicolon()?;
            return Ok(Stmt::Export(ExportDecl::All {
                exported,
                source,
                span: self.span_from(start),
            }));
        }

        if self.eat(Token::LBrace) {
            let mut specifiers = Vec::new();
            while !self.eat(Token::RBrace) {
                let local = self.parse_module_export_name()?;
                let exported = if self.check_word("as") {
                    self.advance();
                    self.parse_module_export_name()?
                } else {
                    local.clone()
                };
                specifiers.push(ExportSpecifier { local, exported });
                if !self.eat(Token::Comma) {
                    self.expect(Token::RBrace)?;
                    break;
                }
            }
            let source = if self.check_word("from") {
                self.advance();
                Some(self.parse_module_source()?)
            } else {
                None
            };
            self.consume_semicolon()?;
            return Ok(Stmt::Export(ExportDecl::Named {
                specifiers,
                source,
                span: self.span_from(start),
            }));
        }

        let is_declaration = matches!(
            self.token(),
            Some(Token::KwVar) | Some(Token::KwConst) | Some(Token::KwFunction) | Some(Token::KwClass)
        ) || self.check_word("let")
            || self.check_word("async");
        if !is_declaration {
            return Err(self.unexpected("declaration after 'export'"));
        }

        let decl = Box::new(self.parse_statement()?);
        Ok(Stmt::Export(ExportDecl::Decl {
            decl,
            span: self.span_from(start),
        }))
    }

    /// Parse a binding identifier, array pattern or object pattern
    pub(crate) fn parse_binding_target(&mut self) -> ParseResult<Pattern> {
        match self.token() {
            Some(Token::LBracket) | Some(Token::LBrace) => {
                let expr = self.with_in(|p| p.parse_primary())?;
                self.expr_to_pattern(expr, true)
            }
            _ => Ok(Pattern::Ident(self.parse_ident()?)),
        }
    }
}

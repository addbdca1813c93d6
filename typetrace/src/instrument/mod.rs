//! Instrumentation compiler
//!
//! Rewrites a module so every function-like construct reports its calls to
//! the collector hooks:
//!
//! ```text
//! function add(a, b) { return a + b }
//! ```
//!
//! becomes
//!
//! ```text
//! function add(__tt_p0, __tt_p1) {
//!   var [__tt_call, a, b] = globalThis.__typetrace.enter("m.js:0", __tt_p0, __tt_p1);
//!   return globalThis.__typetrace.exit(__tt_call, add, a + b);
//! }
//! ```
//!
//! Functions are rewritten innermost first, each independently of the
//! functions it contains.
//!
//! # Module Organization
//!
//! - `names`: synthetic name prefix and hook-call builders
//! - `params`: parameter replacement and array pattern expansion
//! - `body`: return and yield rewriting
//! - `self_ref`: self-reference expressions for the exit hook

mod body;
mod names;
mod params;
mod self_ref;

use std::fmt;

use tracing::debug;
use typetrace_parser::ast::{
    AssignOp, Block, Class, ClassMember, DefaultExport, ExportDecl, Expr, Function, FunctionBody,
    MethodKind, Pattern, Program, Prop, Stmt, VarDecl, VarDeclarator, VarKind,
};
use typetrace_parser::visit_mut::{
    walk_class, walk_class_member, walk_expr, walk_function, walk_prop, walk_prop_key, walk_stmt,
    VisitMut,
};
use typetrace_parser::{generate, parse, Span};

use crate::config::Config;
use crate::error::{TraceError, TraceResult};
use body::ExitRewriter;
use names::{call_name, choose_prefix, temp_name, Hooks};
use self_ref::Holder;

/// Instrument `source` with the default hook binding
pub fn instrument(source: &str, module_path: &str) -> TraceResult<String> {
    Instrumenter::new().instrument(source, module_path)
}

/// Reusable instrumentation pass with a configured hook binding
#[derive(Clone, Default)]
pub struct Instrumenter {
    hooks: Hooks,
}

impl fmt::Debug for Instrumenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumenter")
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Instrumenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instrumenter reaching the hooks through `hooks`, a dotted identifier
    /// path such as `globalThis.__typetrace`
    pub fn with_options(hooks: &str) -> TraceResult<Self> {
        Ok(Self {
            hooks: Hooks::parse(hooks)?,
        })
    }

    pub fn from_config(config: &Config) -> TraceResult<Self> {
        Self::with_options(&config.hooks)
    }

    /// Rewrite one module. Parse failures and internal invariant
    /// violations are fatal: no partial output is produced.
    pub fn instrument(&self, source: &str, module_path: &str) -> TraceResult<String> {
        let mut program = parse(source).map_err(|error| TraceError::parse(module_path, error))?;
        let mut pass = Pass {
            module: module_path,
            hooks: &self.hooks,
            prefix: choose_prefix(source),
            temps: Vec::new(),
            classes: Vec::new(),
            functions: 0,
            error: None,
        };
        pass.visit_program(&mut program);
        if let Some(error) = pass.error {
            return Err(error);
        }
        pass.declare_temps(&mut program);
        debug!(module = module_path, functions = pass.functions, "module instrumented");
        Ok(generate(&program))
    }
}

/// Number of leading directive statements
fn directive_count(body: &[Stmt]) -> usize {
    body.iter().take_while(|stmt| stmt.as_directive().is_some()).count()
}

fn named(function: &Function) -> Option<Expr> {
    function.id.as_ref().map(|id| Expr::ident(id.name.clone()))
}

struct Pass<'a> {
    module: &'a str,
    hooks: &'a Hooks,
    prefix: String,
    /// Temporaries naming anonymous functions, declared at module top
    temps: Vec<String>,
    /// Enclosing class names, innermost last
    classes: Vec<Option<String>>,
    functions: usize,
    error: Option<TraceError>,
}

impl Pass<'_> {
    fn temp(&mut self) -> String {
        let name = temp_name(&self.prefix, self.temps.len());
        self.temps.push(name.clone());
        name
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(TraceError::invariant(self.module, message));
        }
    }

    fn declare_temps(&self, program: &mut Program) {
        if self.temps.is_empty() {
            return;
        }
        let decls = self
            .temps
            .iter()
            .map(|name| VarDeclarator {
                id: Pattern::ident(name.clone()),
                init: None,
                span: Span::synthetic(),
            })
            .collect();
        let stmt = Stmt::Var(VarDecl {
            kind: VarKind::Var,
            decls,
            span: Span::synthetic(),
        });
        let at = directive_count(&program.body);
        program.body.insert(at, stmt);
    }

    /// Instrument one function-like node whose declaration starts at
    /// `offset`. Nested functions are instrumented first.
    fn function(&mut self, function: &mut Function, self_ref: Expr, offset: usize) {
        walk_function(self, function);
        self.functions += 1;

        if let FunctionBody::Expr(expr) = &mut function.body {
            let expr = std::mem::replace(&mut **expr, Expr::undefined());
            let span = expr.span();
            function.body = FunctionBody::Block(Block {
                body: vec![Stmt::Return {
                    arg: Some(expr),
                    span,
                }],
                span,
            });
        }
        let FunctionBody::Block(block) = &mut function.body else {
            self.fail(format!("function at offset {offset} has no block body"));
            return;
        };

        let key = format!("{}:{}", self.module, offset);
        let call = call_name(&self.prefix);
        let prologue = params::rewrite(&mut function.params, &self.prefix);
        ExitRewriter {
            hooks: self.hooks,
            call: &call,
            self_ref: &self_ref,
        }
        .rewrite(block);

        let kind = prologue.binding_kind(block);
        let at = directive_count(&block.body);
        let entry = prologue.entry(self.hooks, &key, &call, kind);
        block.body.splice(at..at, entry);
    }

    /// Function declaration, keyed at `offset`
    fn declaration(&mut self, function: &mut Function, offset: usize) {
        let self_ref = named(function).unwrap_or_else(Expr::undefined);
        self.function(function, self_ref, offset);
    }

    fn class_name(&self) -> Option<String> {
        self.classes.last().cloned().flatten()
    }
}

impl VisitMut for Pass<'_> {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Function(function) => {
                let offset = function.span.start;
                self.declaration(function, offset);
            }
            Stmt::Export(ExportDecl::Decl { decl, span }) => {
                let offset = span.start;
                match &mut **decl {
                    Stmt::Function(function) => self.declaration(function, offset),
                    other => self.visit_stmt(other),
                }
            }
            Stmt::Export(ExportDecl::Default { value, span }) => {
                let offset = span.start;
                match value {
                    DefaultExport::Function(function) => self.declaration(function, offset),
                    DefaultExport::Expr(Expr::Function(function) | Expr::Arrow(function)) => {
                        self.declaration(function, offset)
                    }
                    DefaultExport::Class(class) => self.visit_class(class),
                    DefaultExport::Expr(expr) => self.visit_expr(expr),
                }
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        let temp = match expr {
            Expr::Function(function) | Expr::Arrow(function) => {
                let offset = function.span.start;
                match named(function) {
                    Some(self_ref) => {
                        self.function(function, self_ref, offset);
                        None
                    }
                    None => {
                        let temp = self.temp();
                        self.function(function, Expr::ident(temp.clone()), offset);
                        Some(temp)
                    }
                }
            }
            _ => {
                walk_expr(self, expr);
                None
            }
        };
        if let Some(temp) = temp {
            let function = std::mem::replace(expr, Expr::undefined());
            *expr = Expr::Assign {
                op: AssignOp::Assign,
                target: Box::new(Pattern::ident(temp)),
                value: Box::new(function),
                span: Span::synthetic(),
            };
        }
    }

    fn visit_class(&mut self, class: &mut Class) {
        self.classes.push(class.id.as_ref().map(|id| id.name.clone()));
        walk_class(self, class);
        self.classes.pop();
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        let ClassMember::Method {
            key,
            kind,
            is_static,
            function,
            ..
        } = member
        else {
            walk_class_member(self, member);
            return;
        };
        walk_prop_key(self, key);
        let self_ref = match kind {
            MethodKind::Constructor => self
                .class_name()
                .map(Expr::ident)
                .unwrap_or_else(Expr::undefined),
            MethodKind::Method => self_ref::method(key),
            MethodKind::Getter | MethodKind::Setter => {
                let holder = if *is_static {
                    Holder::This
                } else {
                    Holder::Prototype
                };
                self_ref::accessor(key, *kind, holder)
            }
        };
        let offset = function.span.start;
        self.function(function, self_ref, offset);
    }

    fn visit_prop(&mut self, prop: &mut Prop) {
        let Prop::Method {
            key,
            kind,
            function,
            ..
        } = prop
        else {
            walk_prop(self, prop);
            return;
        };
        walk_prop_key(self, key);
        let self_ref = match kind {
            MethodKind::Getter | MethodKind::Setter => {
                self_ref::accessor(key, *kind, Holder::This)
            }
            MethodKind::Method | MethodKind::Constructor => self_ref::method(key),
        };
        let offset = function.span.start;
        self.function(function, self_ref, offset);
    }

    fn visit_function(&mut self, function: &mut Function) {
        let offset = function.span.start;
        self.function(function, Expr::undefined(), offset);
    }
}

#[cfg(test)]
mod tests;

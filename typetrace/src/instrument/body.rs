//! Return and yield rewriting for one function body

use typetrace_parser::ast::{Block, Expr, Function, Stmt};
use typetrace_parser::visit_mut::{walk_expr, walk_stmt, VisitMut};
use typetrace_parser::Span;

use super::names::Hooks;

/// Routes every `return` and `yield` of the body it visits through the exit
/// and yield hooks. Inner functions are left alone; they are rewritten on
/// their own.
pub(crate) struct ExitRewriter<'a> {
    pub hooks: &'a Hooks,
    pub call: &'a str,
    pub self_ref: &'a Expr,
}

impl ExitRewriter<'_> {
    fn exit(&self, value: Expr) -> Expr {
        self.hooks.exit(self.call, self.self_ref.clone(), value)
    }

    /// Rewrite `block` and make sure it ends in a hooked `return`
    pub(crate) fn rewrite(&mut self, block: &mut Block) {
        self.visit_block(block);
        if !matches!(block.body.last(), Some(Stmt::Return { .. })) {
            block.body.push(Stmt::Return {
                arg: Some(self.exit(Expr::undefined())),
                span: Span::synthetic(),
            });
        }
    }
}

impl VisitMut for ExitRewriter<'_> {
    fn visit_function(&mut self, _function: &mut Function) {}

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
        if let Stmt::Return { arg, .. } = stmt {
            let value = arg.take().unwrap_or_else(Expr::undefined);
            *arg = Some(self.exit(value));
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
        if let Expr::Yield { arg, delegate, .. } = expr {
            let value = arg.take().map(|arg| *arg).unwrap_or_else(Expr::undefined);
            let hooked = if *delegate {
                self.hooks.delegate_yield(self.call, value)
            } else {
                self.hooks.yield_value(self.call, value)
            };
            *arg = Some(Box::new(hooked));
        }
    }
}

#[cfg(test)]
mod tests {
    use typetrace_parser::ast::FunctionBody;
    use typetrace_parser::{generate, parse};

    use super::*;

    fn rewrite_first(source: &str) -> String {
        let mut program = parse(source).unwrap();
        let Some(Stmt::Function(function)) = program.body.first_mut() else {
            panic!("expected a function declaration");
        };
        let FunctionBody::Block(block) = &mut function.body else {
            panic!("expected a block body");
        };
        let hooks = Hooks::parse("H").unwrap();
        let self_ref = Expr::ident("f");
        ExitRewriter {
            hooks: &hooks,
            call: "c",
            self_ref: &self_ref,
        }
        .rewrite(block);
        generate(&program)
    }

    #[test]
    fn test_returns_are_hooked() {
        assert_eq!(
            rewrite_first("function f(x) { if (x) return 1; return; }"),
            "function f(x) {\n  if (x) return H.exit(c, f, 1);\n  return H.exit(c, f, undefined);\n}\n"
        );
    }

    #[test]
    fn test_trailing_return_is_appended() {
        assert_eq!(
            rewrite_first("function f() { g(); }"),
            "function f() {\n  g();\n  return H.exit(c, f, undefined);\n}\n"
        );
    }

    #[test]
    fn test_inner_functions_are_untouched() {
        assert_eq!(
            rewrite_first("function f() { return () => { return 2; }; }"),
            "function f() {\n  return H.exit(c, f, () => {\n    return 2;\n  });\n}\n"
        );
    }

    #[test]
    fn test_yields_are_hooked() {
        assert_eq!(
            rewrite_first("function* f() { yield; yield* g(); }"),
            "function* f() {\n  yield H.yieldValue(c, undefined);\n  yield* H.delegateYield(c, g());\n  return H.exit(c, f, undefined);\n}\n"
        );
    }
}

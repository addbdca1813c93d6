//! Mutable AST traversal
//!
//! Implementors override the `visit_*` hooks they care about and call the
//! matching `walk_*` function to continue into children.

use crate::ast::{
    Block, Class, ClassMember, DefaultExport, ExportDecl, Expr, ForHead, ForInit, Function,
    FunctionBody, MemberProp, ObjectPatProp, Pattern, Program, Prop, PropKey, Stmt, VarDecl,
};

pub trait VisitMut {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &mut Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_function(&mut self, function: &mut Function) {
        walk_function(self, function);
    }

    fn visit_class(&mut self, class: &mut Class) {
        walk_class(self, class);
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        walk_class_member(self, member);
    }

    fn visit_prop(&mut self, prop: &mut Prop) {
        walk_prop(self, prop);
    }

    fn visit_var_decl(&mut self, decl: &mut VarDecl) {
        walk_var_decl(self, decl);
    }
}

pub fn walk_program<V: VisitMut + ?Sized>(v: &mut V, program: &mut Program) {
    for stmt in &mut program.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_block<V: VisitMut + ?Sized>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Expr { expr, .. } | Stmt::Throw { arg: expr, .. } => v.visit_expr(expr),
        Stmt::Var(decl) => v.visit_var_decl(decl),
        Stmt::Function(function) => v.visit_function(function),
        Stmt::Class(class) => v.visit_class(class),
        Stmt::Return { arg, .. } => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        Stmt::If {
            test,
            consequent,
            alternate,
            ..
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                v.visit_stmt(alternate);
            }
        }
        Stmt::Block(block) => v.visit_block(block),
        Stmt::For {
            init,
            test,
            update,
            body,
            ..
        } => {
            match init {
                Some(ForInit::Var(decl)) => v.visit_var_decl(decl),
                Some(ForInit::Expr(expr)) => v.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                v.visit_expr(test);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        Stmt::ForIn {
            left, right, body, ..
        }
        | Stmt::ForOf {
            left, right, body, ..
        } => {
            match left {
                ForHead::Var(decl) => v.visit_var_decl(decl),
                ForHead::Pattern(pattern) => v.visit_pattern(pattern),
            }
            v.visit_expr(right);
            v.visit_stmt(body);
        }
        Stmt::While { test, body, .. } | Stmt::DoWhile { body, test, .. } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
            ..
        } => {
            v.visit_block(block);
            if let Some(handler) = handler {
                if let Some(param) = &mut handler.param {
                    v.visit_pattern(param);
                }
                v.visit_block(&mut handler.body);
            }
            if let Some(finalizer) = finalizer {
                v.visit_block(finalizer);
            }
        }
        Stmt::Switch {
            discriminant,
            cases,
            ..
        } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &mut case.test {
                    v.visit_expr(test);
                }
                for stmt in &mut case.consequent {
                    v.visit_stmt(stmt);
                }
            }
        }
        Stmt::Labeled { body, .. } => v.visit_stmt(body),
        Stmt::Export(export) => match export {
            ExportDecl::Decl { decl, .. } => v.visit_stmt(decl),
            ExportDecl::Default { value, .. } => match value {
                DefaultExport::Function(function) => v.visit_function(function),
                DefaultExport::Class(class) => v.visit_class(class),
                DefaultExport::Expr(expr) => v.visit_expr(expr),
            },
            ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
        },
        Stmt::Import(_)
        | Stmt::Break { .. }
        | Stmt::Continue { .. }
        | Stmt::Empty { .. }
        | Stmt::Debugger { .. } => {}
    }
}

pub fn walk_var_decl<V: VisitMut + ?Sized>(v: &mut V, decl: &mut VarDecl) {
    for declarator in &mut decl.decls {
        v.visit_pattern(&mut declarator.id);
        if let Some(init) = &mut declarator.init {
            v.visit_expr(init);
        }
    }
}

pub fn walk_function<V: VisitMut + ?Sized>(v: &mut V, function: &mut Function) {
    for param in &mut function.params {
        v.visit_pattern(param);
    }
    match &mut function.body {
        FunctionBody::Block(block) => v.visit_block(block),
        FunctionBody::Expr(expr) => v.visit_expr(expr),
    }
}

pub fn walk_class<V: VisitMut + ?Sized>(v: &mut V, class: &mut Class) {
    if let Some(super_class) = &mut class.super_class {
        v.visit_expr(super_class);
    }
    for member in &mut class.body {
        v.visit_class_member(member);
    }
}

pub fn walk_class_member<V: VisitMut + ?Sized>(v: &mut V, member: &mut ClassMember) {
    match member {
        ClassMember::Method { key, function, .. } => {
            walk_prop_key(v, key);
            v.visit_function(function);
        }
        ClassMember::Property { key, value, .. } => {
            walk_prop_key(v, key);
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        ClassMember::StaticBlock { body, .. } => v.visit_block(body),
    }
}

pub fn walk_prop<V: VisitMut + ?Sized>(v: &mut V, prop: &mut Prop) {
    match prop {
        Prop::KeyValue { key, value, .. } => {
            walk_prop_key(v, key);
            v.visit_expr(value);
        }
        Prop::Shorthand { default, .. } => {
            if let Some(default) = default {
                v.visit_expr(default);
            }
        }
        Prop::Method { key, function, .. } => {
            walk_prop_key(v, key);
            v.visit_function(function);
        }
        Prop::Spread { arg, .. } => v.visit_expr(arg),
    }
}

pub fn walk_prop_key<V: VisitMut + ?Sized>(v: &mut V, key: &mut PropKey) {
    if let PropKey::Computed(expr) = key {
        v.visit_expr(expr);
    }
}

pub fn walk_pattern<V: VisitMut + ?Sized>(v: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Ident(_) => {}
        Pattern::Array { elems, .. } => {
            for elem in elems.iter_mut().flatten() {
                v.visit_pattern(elem);
            }
        }
        Pattern::Object { props, .. } => {
            for prop in props {
                match prop {
                    ObjectPatProp::KeyValue { key, value, .. } => {
                        walk_prop_key(v, key);
                        v.visit_pattern(value);
                    }
                    ObjectPatProp::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            v.visit_expr(default);
                        }
                    }
                    ObjectPatProp::Rest { arg, .. } => v.visit_pattern(arg),
                }
            }
        }
        Pattern::Assign { left, right, .. } => {
            v.visit_pattern(left);
            v.visit_expr(right);
        }
        Pattern::Rest { arg, .. } => v.visit_pattern(arg),
        Pattern::Expr(expr) => v.visit_expr(expr),
    }
}

pub fn walk_expr<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Ident(_)
        | Expr::PrivateName(_)
        | Expr::Lit(_)
        | Expr::This(_)
        | Expr::Super(_)
        | Expr::MetaProp { .. } => {}
        Expr::Template(template) => {
            for expr in &mut template.exprs {
                v.visit_expr(expr);
            }
        }
        Expr::TaggedTemplate { tag, quasi, .. } => {
            v.visit_expr(tag);
            for expr in &mut quasi.exprs {
                v.visit_expr(expr);
            }
        }
        Expr::Array { elems, .. } => {
            for elem in elems.iter_mut().flatten() {
                v.visit_expr(&mut elem.expr);
            }
        }
        Expr::Object { props, .. } => {
            for prop in props {
                v.visit_prop(prop);
            }
        }
        Expr::Function(function) | Expr::Arrow(function) => v.visit_function(function),
        Expr::Class(class) => v.visit_class(class),
        Expr::Unary { arg, .. } | Expr::Update { arg, .. } | Expr::Await { arg, .. } => {
            v.visit_expr(arg)
        }
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_pattern(target);
            v.visit_expr(value);
        }
        Expr::Cond {
            test,
            consequent,
            alternate,
            ..
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        Expr::Call { callee, args, .. } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(&mut arg.expr);
            }
        }
        Expr::New { callee, args, .. } => {
            v.visit_expr(callee);
            for arg in args.iter_mut().flatten() {
                v.visit_expr(&mut arg.expr);
            }
        }
        Expr::Member { object, prop, .. } => {
            v.visit_expr(object);
            if let MemberProp::Computed(prop) = prop {
                v.visit_expr(prop);
            }
        }
        Expr::Seq { exprs, .. } => {
            for expr in exprs {
                v.visit_expr(expr);
            }
        }
        Expr::Yield { arg, .. } => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        Expr::Paren { expr, .. } => v.visit_expr(expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ident;
    use crate::parse;

    struct Renamer;

    impl VisitMut for Renamer {
        fn visit_expr(&mut self, expr: &mut Expr) {
            if let Expr::Ident(Ident { name, .. }) = expr {
                if name == "a" {
                    *name = "b".to_string();
                }
            }
            walk_expr(self, expr);
        }
    }

    struct FunctionCounter(usize);

    impl VisitMut for FunctionCounter {
        fn visit_function(&mut self, function: &mut Function) {
            self.0 += 1;
            walk_function(self, function);
        }
    }

    #[test]
    fn test_rename_identifiers() {
        let mut program = parse("f(a, [a + 1], { k: a });").unwrap();
        Renamer.visit_program(&mut program);
        assert_eq!(crate::generate(&program), "f(b, [b + 1], {k: b});\n");
    }

    #[test]
    fn test_reaches_every_function_like_node() {
        let source = "function f() { return () => 1 }\n\
                      class C { m() {} get g() { return 1 } static { (function () {}) } }\n\
                      const o = { x() {}, y: async function* () {} };";
        let mut program = parse(source).unwrap();
        let mut counter = FunctionCounter(0);
        counter.visit_program(&mut program);
        assert_eq!(counter.0, 7);
    }
}

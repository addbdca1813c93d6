//! Expression and pattern printing

use crate::ast::{
    BinaryOp, Expr, ExprOrSpread, LitKind, LogicalOp, MemberProp, ObjectPatProp, Pattern, Prop,
    Template, UnaryOp, UpdateOp,
};
use crate::token::Precedence;

use super::Printer;

/// Binding strength of an expression's outermost operator
pub(crate) fn precedence(expr: &Expr) -> Precedence {
    match expr {
        Expr::Seq { .. } => Precedence::Comma,
        Expr::Yield { .. } => Precedence::Yield,
        Expr::Assign { .. } | Expr::Arrow(_) => Precedence::Assign,
        Expr::Cond { .. } => Precedence::Conditional,
        Expr::Logical { op, .. } => op.precedence(),
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } | Expr::Await { .. } => Precedence::Prefix,
        Expr::Update { prefix: true, .. } => Precedence::Prefix,
        Expr::Update { prefix: false, .. } => Precedence::Postfix,
        Expr::Call { .. }
        | Expr::New { .. }
        | Expr::Member { .. }
        | Expr::TaggedTemplate { .. }
        | Expr::MetaProp { .. } => Precedence::Call,
        Expr::Ident(_)
        | Expr::PrivateName(_)
        | Expr::Lit(_)
        | Expr::Template(_)
        | Expr::This(_)
        | Expr::Super(_)
        | Expr::Array { .. }
        | Expr::Object { .. }
        | Expr::Function(_)
        | Expr::Class(_)
        | Expr::Paren { .. } => Precedence::Primary,
    }
}

/// Whether printing `expr` first in a statement (or a statement-like
/// position) would be read as something else. `in_statement` also rejects
/// leading `function` and `class`; arrow bodies only reject `{`.
pub(crate) fn starts_ambiguously(expr: &Expr, in_statement: bool) -> bool {
    match expr {
        Expr::Object { .. } => true,
        Expr::Function(_) | Expr::Class(_) => in_statement,
        Expr::Assign { target, .. } => match &**target {
            Pattern::Object { .. } => true,
            Pattern::Expr(inner) => starts_ambiguously(inner, in_statement),
            _ => false,
        },
        Expr::Binary { left, .. } | Expr::Logical { left, .. } => {
            starts_ambiguously(left, in_statement)
        }
        Expr::Cond { test, .. } => starts_ambiguously(test, in_statement),
        Expr::Call { callee, .. } => starts_ambiguously(callee, in_statement),
        Expr::Member { object, .. } => starts_ambiguously(object, in_statement),
        Expr::TaggedTemplate { tag, .. } => starts_ambiguously(tag, in_statement),
        Expr::Update {
            prefix: false, arg, ..
        } => starts_ambiguously(arg, in_statement),
        Expr::Seq { exprs, .. } => exprs
            .first()
            .is_some_and(|first| starts_ambiguously(first, in_statement)),
        _ => false,
    }
}

/// Whether a call appears anywhere along a member chain (`new (f().g)()`)
fn contains_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } => true,
        Expr::Member { object, .. } => contains_call(object),
        Expr::TaggedTemplate { tag, .. } => contains_call(tag),
        _ => false,
    }
}

impl Printer {
    /// Print `expr`, parenthesized when it binds looser than `min`
    pub fn expr(&mut self, expr: &Expr, min: Precedence) {
        let needs_parens = precedence(expr) < min
            || (self.no_in && matches!(expr, Expr::Binary { op: BinaryOp::In, .. }));
        if needs_parens {
            let saved_in = std::mem::replace(&mut self.no_in, false);
            self.write("(");
            self.expr_unparenthesized(expr);
            self.write(")");
            self.no_in = saved_in;
        } else {
            self.expr_unparenthesized(expr);
        }
    }

    fn expr_unparenthesized(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.write(&ident.name),
            Expr::Lit(lit) => self.write(&lit.raw),
            Expr::Template(template) => self.template(template),
            Expr::TaggedTemplate { tag, quasi, .. } => {
                self.expr(tag, Precedence::Call);
                self.template(quasi);
            }
            Expr::PrivateName(ident) => {
                self.write("#");
                self.write(&ident.name);
            }
            Expr::This(_) => self.write("this"),
            Expr::Super(_) => self.write("super"),
            Expr::Array { elems, .. } => {
                self.write("[");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(elem) = elem {
                        self.expr_or_spread(elem);
                    }
                }
                if matches!(elems.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expr::Object { props, .. } => {
                self.write("{");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.prop(prop);
                }
                self.write("}");
            }
            Expr::Function(function) | Expr::Arrow(function) => self.function(function, None),
            Expr::Class(class) => self.class(class),
            Expr::Unary { op, arg, .. } => {
                self.write(op.as_str());
                let spaced = match op {
                    UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Delete => true,
                    UnaryOp::Plus => matches!(
                        &**arg,
                        Expr::Unary { op: UnaryOp::Plus, .. }
                            | Expr::Update {
                                op: UpdateOp::Increment,
                                prefix: true,
                                ..
                            }
                    ),
                    UnaryOp::Minus => matches!(
                        &**arg,
                        Expr::Unary {
                            op: UnaryOp::Minus,
                            ..
                        } | Expr::Update {
                            op: UpdateOp::Decrement,
                            prefix: true,
                            ..
                        }
                    ),
                    UnaryOp::Not | UnaryOp::BitNot => false,
                };
                if spaced {
                    self.write(" ");
                }
                self.expr(arg, Precedence::Prefix);
            }
            Expr::Update {
                op, prefix, arg, ..
            } => {
                if *prefix {
                    self.write(op.as_str());
                    self.expr(arg, Precedence::Call);
                } else {
                    self.expr(arg, Precedence::Call);
                    self.write(op.as_str());
                }
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let prec = op.precedence();
                let (left_min, right_min) = if *op == BinaryOp::Exp {
                    (Precedence::Postfix, prec)
                } else {
                    (prec, prec.next())
                };
                self.expr(left, left_min);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.expr(right, right_min);
            }
            Expr::Logical {
                op, left, right, ..
            } => {
                let prec = op.precedence();
                let (left_min, right_min) = if *op == LogicalOp::Coalesce {
                    // `??` cannot mix with `||` or `&&` without parentheses
                    let left_min = match &**left {
                        Expr::Logical {
                            op: LogicalOp::Coalesce,
                            ..
                        } => prec,
                        _ => Precedence::BitOr,
                    };
                    (left_min, Precedence::BitOr)
                } else {
                    (prec, prec.next())
                };
                self.expr(left, left_min);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.expr(right, right_min);
            }
            Expr::Assign {
                op, target, value, ..
            } => {
                self.pattern(target);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.expr(value, Precedence::Assign);
            }
            Expr::Cond {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.expr(test, Precedence::Coalesce);
                self.write(" ? ");
                self.expr(consequent, Precedence::Assign);
                self.write(" : ");
                self.expr(alternate, Precedence::Assign);
            }
            Expr::Call {
                callee,
                args,
                optional,
                ..
            } => {
                self.expr(callee, Precedence::Call);
                if *optional {
                    self.write("?.");
                }
                self.arguments(args);
            }
            Expr::New { callee, args, .. } => {
                self.write("new ");
                if contains_call(callee) {
                    self.write("(");
                    self.expr(callee, Precedence::Comma);
                    self.write(")");
                } else {
                    self.expr(callee, Precedence::Call);
                }
                self.arguments(args.as_deref().unwrap_or_default());
            }
            Expr::Member {
                object,
                prop,
                optional,
                ..
            } => {
                let integer_object = matches!(
                    &**object,
                    Expr::Lit(lit) if lit.kind == LitKind::Num
                        && lit.raw.bytes().all(|b| b.is_ascii_digit())
                );
                if integer_object {
                    self.write("(");
                    self.expr(object, Precedence::Comma);
                    self.write(")");
                } else {
                    self.expr(object, Precedence::Call);
                }
                match prop {
                    MemberProp::Ident(name) => {
                        self.write(if *optional { "?." } else { "." });
                        self.write(&name.name);
                    }
                    MemberProp::Private(name) => {
                        self.write(if *optional { "?.#" } else { ".#" });
                        self.write(&name.name);
                    }
                    MemberProp::Computed(prop) => {
                        self.write(if *optional { "?.[" } else { "[" });
                        self.expr(prop, Precedence::Comma);
                        self.write("]");
                    }
                }
            }
            Expr::Seq { exprs, .. } => {
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.expr(expr, Precedence::Assign);
                }
            }
            Expr::Yield { arg, delegate, .. } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if let Some(arg) = arg {
                    self.write(" ");
                    self.expr(arg, Precedence::Assign);
                }
            }
            Expr::Await { arg, .. } => {
                self.write("await ");
                self.expr(arg, Precedence::Prefix);
            }
            Expr::MetaProp { meta, prop, .. } => {
                self.write(&meta.name);
                self.write(".");
                self.write(&prop.name);
            }
            Expr::Paren { expr, .. } => {
                let saved_in = std::mem::replace(&mut self.no_in, false);
                self.write("(");
                self.expr(expr, Precedence::Comma);
                self.write(")");
                self.no_in = saved_in;
            }
        }
    }

    fn arguments(&mut self, args: &[ExprOrSpread]) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr_or_spread(arg);
        }
        self.write(")");
    }

    fn expr_or_spread(&mut self, item: &ExprOrSpread) {
        if item.spread {
            self.write("...");
        }
        self.expr(&item.expr, Precedence::Assign);
    }

    fn template(&mut self, template: &Template) {
        self.write("`");
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.write(quasi);
            if let Some(expr) = template.exprs.get(i) {
                self.write("${");
                self.expr(expr, Precedence::Comma);
                self.write("}");
            }
        }
        self.write("`");
    }

    fn prop(&mut self, prop: &Prop) {
        match prop {
            Prop::KeyValue { key, value, .. } => {
                self.prop_key(key);
                self.write(": ");
                self.expr(value, Precedence::Assign);
            }
            Prop::Shorthand { id, default, .. } => {
                self.write(&id.name);
                if let Some(default) = default {
                    self.write(" = ");
                    self.expr(default, Precedence::Assign);
                }
            }
            Prop::Method {
                key,
                kind,
                function,
                ..
            } => self.function(function, Some((key, *kind))),
            Prop::Spread { arg, .. } => {
                self.write("...");
                self.expr(arg, Precedence::Assign);
            }
        }
    }

    // ==================== Patterns ====================

    pub fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Ident(ident) => self.write(&ident.name),
            Pattern::Array { elems, .. } => {
                self.write("[");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(elem) = elem {
                        self.pattern(elem);
                    }
                }
                if matches!(elems.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Pattern::Object { props, .. } => {
                self.write("{");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    match prop {
                        ObjectPatProp::KeyValue { key, value, .. } => {
                            self.prop_key(key);
                            self.write(": ");
                            self.pattern(value);
                        }
                        ObjectPatProp::Shorthand { id, default, .. } => {
                            self.write(&id.name);
                            if let Some(default) = default {
                                self.write(" = ");
                                self.expr(default, Precedence::Assign);
                            }
                        }
                        ObjectPatProp::Rest { arg, .. } => {
                            self.write("...");
                            self.pattern(arg);
                        }
                    }
                }
                self.write("}");
            }
            Pattern::Assign { left, right, .. } => {
                self.pattern(left);
                self.write(" = ");
                self.expr(right, Precedence::Assign);
            }
            Pattern::Rest { arg, .. } => {
                self.write("...");
                self.pattern(arg);
            }
            Pattern::Expr(expr) => self.expr(expr, Precedence::Call),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expr};
    use crate::codegen::generate_expr;
    use crate::span::Span;

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: Span::synthetic(),
        }
    }

    #[test]
    fn test_parenthesizes_looser_operands() {
        let sum = binary(BinaryOp::Add, Expr::ident("a"), Expr::ident("b"));
        let product = binary(BinaryOp::Mul, sum, Expr::ident("c"));
        assert_eq!(generate_expr(&product), "(a + b) * c");
    }

    #[test]
    fn test_right_operand_of_same_precedence() {
        let diff = binary(BinaryOp::Sub, Expr::ident("b"), Expr::ident("c"));
        let outer = binary(BinaryOp::Sub, Expr::ident("a"), diff);
        assert_eq!(generate_expr(&outer), "a - (b - c)");
    }

    #[test]
    fn test_sequence_argument_is_wrapped() {
        let seq = Expr::Seq {
            exprs: vec![Expr::ident("a"), Expr::ident("b")],
            span: Span::synthetic(),
        };
        let call = Expr::call(Expr::ident("f"), vec![seq]);
        assert_eq!(generate_expr(&call), "f((a, b))");
    }

    #[test]
    fn test_member_on_integer_literal() {
        let one = Expr::Lit(crate::ast::Lit {
            kind: crate::ast::LitKind::Num,
            raw: "1".to_string(),
            span: Span::synthetic(),
        });
        let member = Expr::member(one, "toString", false);
        assert_eq!(generate_expr(&member), "(1).toString");
    }

    #[test]
    fn test_mixed_coalesce_keeps_parens() {
        let or = Expr::Logical {
            op: crate::ast::LogicalOp::Or,
            left: Box::new(Expr::ident("a")),
            right: Box::new(Expr::ident("b")),
            span: Span::synthetic(),
        };
        let coalesce = Expr::Logical {
            op: crate::ast::LogicalOp::Coalesce,
            left: Box::new(or),
            right: Box::new(Expr::ident("c")),
            span: Span::synthetic(),
        };
        assert_eq!(generate_expr(&coalesce), "(a || b) ?? c");
    }
}

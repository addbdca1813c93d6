//! Self-reference expressions passed to the exit hook
//!
//! The exit hook receives an expression evaluating to the running function
//! itself, so the collector can tie the declaration site to the function
//! value. When no side-effect-free expression exists, `undefined` is passed.

use typetrace_parser::ast::{Expr, Lit, MemberProp, MethodKind, PropKey};
use typetrace_parser::Span;

/// Object an accessor's property descriptor lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Holder {
    /// `Object.getPrototypeOf(this)`: instance members of classes
    Prototype,
    /// `this`: static class members and object-literal members
    This,
}

fn this() -> Expr {
    Expr::This(Span::synthetic())
}

fn optional_member(object: Expr, prop: MemberProp) -> Expr {
    Expr::Member {
        object: Box::new(object),
        prop,
        optional: true,
        span: Span::synthetic(),
    }
}

/// Key as a side-effect-free expression, if it has one
fn key_expr(key: &PropKey) -> Option<Expr> {
    match key {
        PropKey::Ident(ident) => Some(Expr::Lit(Lit::string(&ident.name))),
        PropKey::Lit(lit) => Some(Expr::Lit(lit.clone())),
        PropKey::Computed(expr) => match &**expr {
            Expr::Ident(_) | Expr::Lit(_) => Some((**expr).clone()),
            _ => None,
        },
        PropKey::Private(_) => None,
    }
}

/// `this?.name`, `this?.#name` or `this?.[key]`
pub(crate) fn method(key: &PropKey) -> Expr {
    match key {
        PropKey::Ident(ident) => Expr::member(this(), ident.name.clone(), true),
        PropKey::Private(ident) => optional_member(this(), MemberProp::Private(ident.clone())),
        PropKey::Lit(_) | PropKey::Computed(_) => match key_expr(key) {
            Some(expr) => optional_member(this(), MemberProp::Computed(Box::new(expr))),
            None => Expr::undefined(),
        },
    }
}

/// `Object.getOwnPropertyDescriptor(<holder>, <key>)?.get` (or `.set`)
pub(crate) fn accessor(key: &PropKey, kind: MethodKind, holder: Holder) -> Expr {
    let Some(name) = key_expr(key) else {
        return Expr::undefined();
    };
    let holder = match holder {
        Holder::Prototype => Expr::call(
            Expr::member(Expr::ident("Object"), "getPrototypeOf", false),
            vec![this()],
        ),
        Holder::This => this(),
    };
    let descriptor = Expr::call(
        Expr::member(Expr::ident("Object"), "getOwnPropertyDescriptor", false),
        vec![holder, name],
    );
    let slot = if kind == MethodKind::Setter { "set" } else { "get" };
    Expr::member(descriptor, slot, true)
}

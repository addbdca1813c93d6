//! Parameter rewriting
//!
//! Every formal parameter is replaced by a synthetic identifier. Array
//! patterns are expanded into one synthetic identifier per leaf, plus a
//! catch-all rest, so each destructured slot reaches the entry hook on its
//! own. The entry hook's results are then bound to the original patterns,
//! leaf by leaf.
//!
//! Defaults run in parameter order. Once one default has moved out of the
//! parameter list, every later parameter with a default is bound whole by
//! the entry hook. A default reading a parameter binding keeps its
//! temporal dead zone: the entry binding is then declared with `let`.

use std::collections::HashSet;

use typetrace_parser::ast::{
    Block, Expr, Function, ObjectPatProp, Pattern, Prop, Stmt, VarDecl, VarDeclarator, VarKind,
};
use typetrace_parser::visit_mut::{walk_expr, walk_prop, walk_var_decl, VisitMut};
use typetrace_parser::Span;

use super::names::{param_name, Hooks};

/// One value passed to the entry hook
#[derive(Debug)]
pub(crate) struct Leaf {
    pub ident: String,
    /// Where the hook's result for this leaf is bound; `None` traces the
    /// value without binding it
    pub target: Option<Pattern>,
}

/// Statements a rewritten function body starts with
#[derive(Debug, Default)]
pub(crate) struct Prologue {
    pub expansions: Vec<Stmt>,
    pub leaves: Vec<Leaf>,
    /// Some bound default reads a parameter binding
    pub reads_bindings: bool,
}

impl Prologue {
    /// `let` when a bound default must see uninitialized parameters and
    /// `body` declares none of the bound names with `var` or `function`
    pub(crate) fn binding_kind(&self, body: &mut Block) -> VarKind {
        if !self.reads_bindings {
            return VarKind::Var;
        }
        let declared = var_scoped_names(body);
        let collides = self
            .leaves
            .iter()
            .filter_map(|leaf| leaf.target.as_ref())
            .flat_map(Pattern::bound_names)
            .any(|name| declared.contains(name));
        if collides {
            VarKind::Var
        } else {
            VarKind::Let
        }
    }

    /// `var [call, ...targets] = H.enter("<key>", ...leaves);`
    pub(crate) fn entry(self, hooks: &Hooks, key: &str, call: &str, kind: VarKind) -> Vec<Stmt> {
        let mut targets: Vec<Option<Pattern>> = Vec::with_capacity(self.leaves.len() + 1);
        targets.push(Some(Pattern::ident(call)));
        let mut args = Vec::with_capacity(self.leaves.len());
        for leaf in self.leaves {
            args.push(Expr::ident(leaf.ident));
            targets.push(leaf.target);
        }
        while matches!(targets.last(), Some(None)) {
            targets.pop();
        }
        let entry = declare(
            kind,
            Pattern::Array {
                elems: targets,
                span: Span::synthetic(),
            },
            hooks.enter(key, args),
        );
        let mut stmts = self.expansions;
        stmts.push(entry);
        stmts
    }
}

fn var(id: Pattern, init: Expr) -> Stmt {
    declare(VarKind::Var, id, init)
}

fn declare(kind: VarKind, id: Pattern, init: Expr) -> Stmt {
    Stmt::Var(VarDecl {
        kind,
        decls: vec![VarDeclarator {
            id,
            init: Some(init),
            span: Span::synthetic(),
        }],
        span: Span::synthetic(),
    })
}

/// Rewrite `params` in place and return the prologue that rebinds them
pub(crate) fn rewrite(params: &mut Vec<Pattern>, prefix: &str) -> Prologue {
    let bound: HashSet<String> = params
        .iter()
        .flat_map(|p| p.bound_names())
        .map(str::to_string)
        .collect();
    let mut rewriter = Rewriter {
        prefix,
        bound,
        next: 0,
        deferred: false,
        prologue: Prologue::default(),
    };
    *params = std::mem::take(params)
        .into_iter()
        .map(|param| rewriter.param(param))
        .collect();
    rewriter.prologue
}

struct Rewriter<'a> {
    prefix: &'a str,
    /// Every name bound by the parameter list
    bound: HashSet<String>,
    next: usize,
    /// A default has already moved out of the parameter list
    deferred: bool,
    prologue: Prologue,
}

impl Rewriter<'_> {
    fn fresh(&mut self) -> String {
        let name = param_name(self.prefix, self.next);
        self.next += 1;
        name
    }

    fn leaf(&mut self, ident: &str, mut target: Option<Pattern>) {
        if let Some(target) = &mut target {
            self.prologue.reads_bindings |= self.pattern_references(target);
        }
        self.prologue.leaves.push(Leaf {
            ident: ident.to_string(),
            target,
        });
    }

    /// Whether a default expression reads a parameter binding, and so must
    /// be evaluated after the bindings exist
    fn references(&self, expr: &mut Expr) -> bool {
        let mut scan = NameScan {
            names: &self.bound,
            found: false,
        };
        scan.visit_expr(expr);
        scan.found
    }

    fn pattern_references(&self, pattern: &mut Pattern) -> bool {
        let mut scan = NameScan {
            names: &self.bound,
            found: false,
        };
        scan.visit_pattern(pattern);
        scan.found
    }

    /// Bind `target` whole from the entry hook; defaults inside it run there
    fn whole(&mut self, target: Pattern) -> String {
        let syn = self.fresh();
        self.deferred |= has_default(&target);
        self.leaf(&syn, Some(target));
        syn
    }

    fn param(&mut self, param: Pattern) -> Pattern {
        if self.deferred && has_default(&param) {
            return match param {
                Pattern::Rest { arg, span } => Pattern::Rest {
                    arg: Box::new(Pattern::ident(self.whole(*arg))),
                    span,
                },
                other => Pattern::ident(self.whole(other)),
            };
        }
        match param {
            Pattern::Assign {
                left,
                mut right,
                span,
            } => {
                if self.references(&mut right) {
                    let syn = self.whole(Pattern::Assign { left, right, span });
                    Pattern::ident(syn)
                } else {
                    let syn = self.fresh();
                    self.deferred |= has_default(&left);
                    self.bind(*left, &syn);
                    Pattern::Assign {
                        left: Box::new(Pattern::ident(syn)),
                        right,
                        span,
                    }
                }
            }
            Pattern::Rest { arg, span } => {
                let syn = self.fresh();
                self.deferred |= has_default(&arg);
                self.bind(*arg, &syn);
                Pattern::Rest {
                    arg: Box::new(Pattern::ident(syn)),
                    span,
                }
            }
            other => {
                let syn = self.fresh();
                self.deferred |= has_default(&other);
                self.bind(other, &syn);
                Pattern::ident(syn)
            }
        }
    }

    fn bind(&mut self, target: Pattern, syn: &str) {
        match target {
            Pattern::Array { elems, span } => {
                let expanded = self.expand(elems, span);
                self.prologue.expansions.push(var(expanded, Expr::ident(syn)));
            }
            other => self.leaf(syn, Some(other)),
        }
    }

    fn expand(&mut self, elems: Vec<Option<Pattern>>, span: Span) -> Pattern {
        let ends_with_rest = matches!(elems.last(), Some(Some(Pattern::Rest { .. })));
        let mut out = Vec::with_capacity(elems.len() + 1);
        for elem in elems {
            out.push(elem.map(|elem| self.expand_elem(elem)));
        }
        if !ends_with_rest {
            let syn = self.fresh();
            self.leaf(&syn, None);
            out.push(Some(Pattern::Rest {
                arg: Box::new(Pattern::ident(syn)),
                span: Span::synthetic(),
            }));
        }
        Pattern::Array { elems: out, span }
    }

    fn expand_elem(&mut self, elem: Pattern) -> Pattern {
        match elem {
            Pattern::Array { elems, span } => self.expand(elems, span),
            Pattern::Assign {
                left,
                mut right,
                span,
            } => {
                if self.references(&mut right) {
                    let syn = self.fresh();
                    self.leaf(&syn, Some(Pattern::Assign { left, right, span }));
                    return Pattern::ident(syn);
                }
                let left = match *left {
                    Pattern::Array { elems, span } => self.expand(elems, span),
                    left => {
                        let syn = self.fresh();
                        self.leaf(&syn, Some(left));
                        Pattern::ident(syn)
                    }
                };
                Pattern::Assign {
                    left: Box::new(left),
                    right,
                    span,
                }
            }
            Pattern::Rest { arg, span } => {
                let arg = match *arg {
                    Pattern::Array { elems, span } => self.expand(elems, span),
                    arg => {
                        let syn = self.fresh();
                        self.leaf(&syn, Some(arg));
                        Pattern::ident(syn)
                    }
                };
                Pattern::Rest {
                    arg: Box::new(arg),
                    span,
                }
            }
            other => {
                let syn = self.fresh();
                self.leaf(&syn, Some(other));
                Pattern::ident(syn)
            }
        }
    }
}

fn has_default(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Ident(_) | Pattern::Expr(_) => false,
        Pattern::Assign { .. } => true,
        Pattern::Array { elems, .. } => elems.iter().flatten().any(has_default),
        Pattern::Object { props, .. } => props.iter().any(|prop| match prop {
            ObjectPatProp::KeyValue { value, .. } => has_default(value),
            ObjectPatProp::Shorthand { default, .. } => default.is_some(),
            ObjectPatProp::Rest { arg, .. } => has_default(arg),
        }),
        Pattern::Rest { arg, .. } => has_default(arg),
    }
}

/// Names a function body declares with `var`, or with top-level `function`
fn var_scoped_names(body: &mut Block) -> HashSet<String> {
    let mut scan = VarScan::default();
    for stmt in &mut body.body {
        if let Stmt::Function(Function { id: Some(id), .. }) = stmt {
            scan.names.insert(id.name.clone());
        }
        scan.visit_stmt(stmt);
    }
    scan.names
}

#[derive(Default)]
struct VarScan {
    names: HashSet<String>,
}

impl VisitMut for VarScan {
    fn visit_function(&mut self, _function: &mut Function) {}

    fn visit_var_decl(&mut self, decl: &mut VarDecl) {
        if decl.kind == VarKind::Var {
            for declarator in &decl.decls {
                self.names
                    .extend(declarator.id.bound_names().into_iter().map(str::to_string));
            }
        }
        walk_var_decl(self, decl);
    }
}

struct NameScan<'a> {
    names: &'a HashSet<String>,
    found: bool,
}

impl VisitMut for NameScan<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        if let Expr::Ident(ident) = expr {
            self.found |= self.names.contains(&ident.name);
        }
        walk_expr(self, expr);
    }

    fn visit_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand { id, .. } = prop {
            self.found |= self.names.contains(&id.name);
        }
        walk_prop(self, prop);
    }
}

#[cfg(test)]
mod tests {
    use typetrace_parser::ast::{Function, FunctionBody};
    use typetrace_parser::{generate, parse};

    use super::*;

    /// Rewrite the first function's parameters; returns the new parameter
    /// list and the prologue, printed
    fn rewritten(source: &str) -> (String, String) {
        let mut program = parse(source).unwrap();
        let Some(Stmt::Function(Function { params, body, .. })) = program.body.first_mut() else {
            panic!("expected a function declaration");
        };
        let prologue = rewrite(params, "__tt");
        let FunctionBody::Block(block) = body else {
            panic!("expected a block body");
        };
        let kind = prologue.binding_kind(block);
        let stmts = prologue.entry(&Hooks::parse("H").unwrap(), "m.js:0", "__tt_call", kind);
        block.body = stmts;
        let printed = generate(&program);
        let header = printed.lines().next().unwrap_or_default().to_string();
        let body: Vec<&str> = printed.lines().skip(1).map(str::trim).collect();
        (header, body.join("\n"))
    }

    #[test]
    fn test_plain_params() {
        let (header, body) = rewritten("function f(a, { b }) {}");
        assert_eq!(header, "function f(__tt_p0, __tt_p1) {");
        assert_eq!(body, "var [__tt_call, a, {b}] = H.enter(\"m.js:0\", __tt_p0, __tt_p1);\n}");
    }

    #[test]
    fn test_defaults_stay_on_synthetic_param() {
        let (header, body) = rewritten("function f(a = 5, ...rest) {}");
        assert_eq!(header, "function f(__tt_p0 = 5, ...__tt_p1) {");
        assert_eq!(body, "var [__tt_call, a, rest] = H.enter(\"m.js:0\", __tt_p0, __tt_p1);\n}");
    }

    #[test]
    fn test_referencing_default_moves_to_target() {
        let (header, body) = rewritten("function f(a, b = a + 1) {}");
        assert_eq!(header, "function f(__tt_p0, __tt_p1) {");
        assert_eq!(
            body,
            "let [__tt_call, a, b = a + 1] = H.enter(\"m.js:0\", __tt_p0, __tt_p1);\n}"
        );
    }

    #[test]
    fn test_forward_reference_keeps_dead_zone() {
        // `a = b` must still throw when `a` is omitted
        let (header, body) = rewritten("function p(a = b, b = 1) {}");
        assert_eq!(header, "function p(__tt_p0, __tt_p1) {");
        assert_eq!(
            body,
            "let [__tt_call, a = b, b = 1] = H.enter(\"m.js:0\", __tt_p0, __tt_p1);\n}"
        );
    }

    #[test]
    fn test_later_defaults_run_after_moved_ones() {
        let (header, body) = rewritten("function f(a, b = a, c = log(), [d = 2]) {}");
        assert_eq!(header, "function f(__tt_p0, __tt_p1, __tt_p2, __tt_p3) {");
        assert_eq!(
            body,
            "let [__tt_call, a, b = a, c = log(), [d = 2]] = \
             H.enter(\"m.js:0\", __tt_p0, __tt_p1, __tt_p2, __tt_p3);\n}"
        );
    }

    #[test]
    fn test_body_var_keeps_var_binding() {
        let (_, body) = rewritten("function f(a = b, b = 1) { var b; }");
        assert!(body.starts_with("var [__tt_call, a = b, b = 1] = "), "{body}");
    }

    #[test]
    fn test_array_pattern_expansion() {
        let (header, body) = rewritten("function dog([[a, b], ...c]) {}");
        assert_eq!(header, "function dog(__tt_p0) {");
        assert_eq!(
            body,
            "var [[__tt_p1, __tt_p2, ...__tt_p3], ...__tt_p4] = __tt_p0;\n\
             var [__tt_call, a, b, , c] = H.enter(\"m.js:0\", __tt_p1, __tt_p2, __tt_p3, __tt_p4);\n}"
        );
    }

    #[test]
    fn test_holes_and_nested_defaults() {
        let (_, body) = rewritten("function f([, x = 1, [y] = [2]]) {}");
        assert_eq!(
            body,
            "var [, __tt_p1 = 1, [__tt_p2, ...__tt_p3] = [2], ...__tt_p4] = __tt_p0;\n\
             var [__tt_call, x, y] = H.enter(\"m.js:0\", __tt_p1, __tt_p2, __tt_p3, __tt_p4);\n}"
        );
    }

    #[test]
    fn test_shorthand_reference_is_detected() {
        let (_, body) = rewritten("function f(a, b = { a }) {}");
        assert_eq!(
            body,
            "let [__tt_call, a, b = {a}] = H.enter(\"m.js:0\", __tt_p0, __tt_p1);\n}"
        );
    }
}

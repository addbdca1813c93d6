//! Synthetic names and hook-call builders

use std::collections::HashSet;

use once_cell::sync::Lazy;
use typetrace_parser::ast::{Expr, Lit};

use crate::config::DEFAULT_HOOKS;
use crate::error::{TraceError, TraceResult};

const BASE_PREFIX: &str = "__tt";

/// Words that cannot start a hook binding
static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
        "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
        "function", "if", "import", "in", "instanceof", "new", "null", "return", "super",
        "switch", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    ]
    .into_iter()
    .collect()
});

/// Prefix for every synthetic name in a module: `__tt`, or `__tt<n>` for
/// the smallest `n` that does not occur in `source`
pub(crate) fn choose_prefix(source: &str) -> String {
    if !source.contains(BASE_PREFIX) {
        return BASE_PREFIX.to_string();
    }
    (1..)
        .map(|n| format!("{BASE_PREFIX}{n}"))
        .find(|candidate| !source.contains(candidate.as_str()))
        .unwrap_or_else(|| BASE_PREFIX.to_string())
}

pub(crate) fn param_name(prefix: &str, index: usize) -> String {
    format!("{prefix}_p{index}")
}

pub(crate) fn temp_name(prefix: &str, index: usize) -> String {
    format!("{prefix}_f{index}")
}

pub(crate) fn call_name(prefix: &str) -> String {
    format!("{prefix}_call")
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// The member chain instrumented code reaches the collector through
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Hooks {
    path: Vec<String>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            path: DEFAULT_HOOKS.split('.').map(str::to_string).collect(),
        }
    }
}

impl Hooks {
    /// Parse a dotted binding such as `globalThis.__typetrace`
    pub(crate) fn parse(binding: &str) -> TraceResult<Self> {
        let path: Vec<String> = binding.trim().split('.').map(str::to_string).collect();
        if let Some(bad) = path.iter().find(|segment| !is_identifier(segment)) {
            return Err(TraceError::config(format!(
                "invalid hook binding '{binding}': '{bad}' is not an identifier"
            )));
        }
        if path.first().is_some_and(|root| RESERVED.contains(root.as_str())) {
            return Err(TraceError::config(format!(
                "invalid hook binding '{binding}': starts with a reserved word"
            )));
        }
        Ok(Self { path })
    }

    fn method(&self, name: &str) -> Expr {
        let mut segments = self.path.iter();
        let root = segments
            .next()
            .map(|s| Expr::ident(s.as_str()))
            .unwrap_or_else(|| Expr::ident("globalThis"));
        let object = segments.fold(root, |object, segment| {
            Expr::member(object, segment.as_str(), false)
        });
        Expr::member(object, name, false)
    }

    /// `H.enter("<key>", ...leaves)`
    pub(crate) fn enter(&self, key: &str, leaves: Vec<Expr>) -> Expr {
        let mut args = Vec::with_capacity(leaves.len() + 1);
        args.push(Expr::Lit(Lit::string(key)));
        args.extend(leaves);
        Expr::call(self.method("enter"), args)
    }

    /// `H.exit(call, self, value)`
    pub(crate) fn exit(&self, call: &str, self_ref: Expr, value: Expr) -> Expr {
        Expr::call(self.method("exit"), vec![Expr::ident(call), self_ref, value])
    }

    pub(crate) fn yield_value(&self, call: &str, value: Expr) -> Expr {
        Expr::call(self.method("yieldValue"), vec![Expr::ident(call), value])
    }

    pub(crate) fn delegate_yield(&self, call: &str, iterable: Expr) -> Expr {
        Expr::call(self.method("delegateYield"), vec![Expr::ident(call), iterable])
    }
}

#[cfg(test)]
mod tests {
    use typetrace_parser::generate_expr;

    use super::*;

    #[test]
    fn test_prefix_avoids_source_text() {
        assert_eq!(choose_prefix("let a = 1"), "__tt");
        assert_eq!(choose_prefix("let __tt = 1"), "__tt1");
        assert_eq!(choose_prefix("let __tt, __tt1, __tt2x;"), "__tt3");
    }

    #[test]
    fn test_hook_calls() {
        let hooks = Hooks::default();
        let enter = hooks.enter("m.js:0", vec![Expr::ident("a")]);
        assert_eq!(generate_expr(&enter), "globalThis.__typetrace.enter(\"m.js:0\", a)");

        let hooks = Hooks::parse("H").unwrap();
        let exit = hooks.exit("c", Expr::ident("f"), Expr::undefined());
        assert_eq!(generate_expr(&exit), "H.exit(c, f, undefined)");
    }

    #[test]
    fn test_invalid_binding() {
        assert!(matches!(Hooks::parse("a..b"), Err(TraceError::Config(_))));
        assert!(matches!(Hooks::parse("a.b()"), Err(TraceError::Config(_))));
        assert!(matches!(Hooks::parse("new.hooks"), Err(TraceError::Config(_))));
        assert!(Hooks::parse("this.default").is_ok());
        assert!(Hooks::parse(" $hooks.t_1 ").is_ok());
    }
}

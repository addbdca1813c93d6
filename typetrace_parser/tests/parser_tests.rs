//! Parser tests
//!
//! Structural checks on the AST produced for common module shapes.

use typetrace_parser::ast::{
    BinaryOp, ClassMember, ExportDecl, Expr, FunctionBody, ImportSpecifier, LitKind, Pattern,
    Program, Stmt, VarKind,
};
use typetrace_parser::{parse, ParseError};

fn parse_ok(source: &str) -> Program {
    parse(source).unwrap_or_else(|e| panic!("Failed to parse: {}\n{}", source, e))
}

fn first_expr(source: &str) -> Expr {
    match parse_ok(source).body.into_iter().next() {
        Some(Stmt::Expr { expr, .. }) => expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

// ==================== Statements ====================

#[test]
fn test_variable_declarations() {
    let program = parse_ok("let x = 1, y;");
    match &program.body[0] {
        Stmt::Var(decl) => {
            assert_eq!(decl.kind, VarKind::Let);
            assert_eq!(decl.decls.len(), 2);
            assert!(decl.decls[1].init.is_none());
        }
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn test_automatic_semicolon_insertion() {
    let program = parse_ok("a\nb\nc()");
    assert_eq!(program.body.len(), 3);
}

#[test]
fn test_restricted_return() {
    let program = parse_ok("function f() { return\n1 }");
    let Stmt::Function(function) = &program.body[0] else {
        panic!("expected function");
    };
    let FunctionBody::Block(block) = &function.body else {
        panic!("expected block body");
    };
    assert!(matches!(block.body[0], Stmt::Return { arg: None, .. }));
    assert_eq!(block.body.len(), 2);
}

#[test]
fn test_control_flow_statements() {
    let source = "for (let i = 0; i < 3; i++) {}\n\
                  for (const k in o) {}\n\
                  for (const v of xs) {}\n\
                  while (a) break;\n\
                  do { continue } while (b)\n\
                  switch (x) { case 1: y(); default: z() }\n\
                  try { t() } catch { } finally { f() }\n\
                  outer: for (;;) { break outer }";
    let program = parse_ok(source);
    assert_eq!(program.body.len(), 8);
    assert!(matches!(program.body[0], Stmt::For { .. }));
    assert!(matches!(program.body[1], Stmt::ForIn { .. }));
    assert!(matches!(program.body[2], Stmt::ForOf { .. }));
    assert!(matches!(program.body[7], Stmt::Labeled { .. }));
}

// ==================== Modules ====================

#[test]
fn test_imports() {
    let program = parse_ok("import a, { b as c, d } from \"m\";\nimport * as ns from 'n';");
    let Stmt::Import(import) = &program.body[0] else {
        panic!("expected import");
    };
    assert_eq!(import.specifiers.len(), 3);
    assert!(matches!(&import.specifiers[0], ImportSpecifier::Default(id) if id.name == "a"));
    assert!(matches!(
        &import.specifiers[1],
        ImportSpecifier::Named { imported, local } if imported == "b" && local.name == "c"
    ));
    assert!(matches!(
        &program.body[1],
        Stmt::Import(i) if matches!(&i.specifiers[0], ImportSpecifier::Namespace(_))
    ));
}

#[test]
fn test_exports() {
    let source = "export const a = 1;\n\
                  export function f() {}\n\
                  export default class {}\n\
                  export { a as b };\n\
                  export * from \"m\";";
    let program = parse_ok(source);
    let kinds: Vec<_> = program
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::Export(ExportDecl::Decl { .. }) => "decl",
            Stmt::Export(ExportDecl::Default { .. }) => "default",
            Stmt::Export(ExportDecl::Named { .. }) => "named",
            Stmt::Export(ExportDecl::All { .. }) => "all",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["decl", "decl", "default", "named", "all"]);
}

// ==================== Expressions ====================

#[test]
fn test_regex_after_operator() {
    let program = parse_ok("const r = /ab+c/g;");
    let Stmt::Var(decl) = &program.body[0] else {
        panic!("expected declaration");
    };
    match &decl.decls[0].init {
        Some(Expr::Lit(lit)) => {
            assert_eq!(lit.kind, LitKind::Regex);
            assert_eq!(lit.raw, "/ab+c/g");
        }
        other => panic!("expected regex literal, got {:?}", other),
    }
}

#[test]
fn test_division_is_not_regex() {
    assert!(matches!(first_expr("a / b / c"), Expr::Binary { .. }));
}

#[test]
fn test_arrow_with_destructured_params() {
    match first_expr("(a, { b }, ...rest) => a") {
        Expr::Arrow(function) => {
            assert_eq!(function.params.len(), 3);
            assert!(matches!(function.params[1], Pattern::Object { .. }));
            assert!(matches!(function.params[2], Pattern::Rest { .. }));
            assert!(matches!(function.body, FunctionBody::Expr(_)));
        }
        other => panic!("expected arrow, got {:?}", other),
    }
}

#[test]
fn test_async_arrow() {
    match first_expr("async x => await x") {
        Expr::Arrow(function) => assert!(function.is_async),
        other => panic!("expected arrow, got {:?}", other),
    }
}

#[test]
fn test_call_named_async() {
    assert!(matches!(first_expr("async(1, 2)"), Expr::Call { .. }));
}

#[test]
fn test_destructuring_assignment() {
    match first_expr("[a, b] = [b, a]") {
        Expr::Assign { target, .. } => assert!(matches!(*target, Pattern::Array { .. })),
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_optional_chain() {
    match first_expr("a?.b") {
        Expr::Member { optional, .. } => assert!(optional),
        other => panic!("expected member, got {:?}", other),
    }
}

#[test]
fn test_template_with_substitutions() {
    match first_expr("`a${b}c${d}`") {
        Expr::Template(template) => {
            assert_eq!(template.quasis.len(), 3);
            assert_eq!(template.exprs.len(), 2);
        }
        other => panic!("expected template, got {:?}", other),
    }
}

// ==================== Classes ====================

#[test]
fn test_class_members() {
    let source = "class C extends B {\n  constructor() { super() }\n  static s = 1;\n  #p;\n  get g() { return 1 }\n  static { init() }\n}";
    let program = parse_ok(source);
    let Stmt::Class(class) = &program.body[0] else {
        panic!("expected class");
    };
    assert!(class.super_class.is_some());
    assert_eq!(class.body.len(), 5);
    assert!(matches!(class.body[3], ClassMember::Method { .. }));
    assert!(matches!(class.body[4], ClassMember::StaticBlock { .. }));
}

#[test]
fn test_method_span_starts_at_modifiers() {
    let program = parse_ok("class C { static async m() {} }");
    let Stmt::Class(class) = &program.body[0] else {
        panic!("expected class");
    };
    match &class.body[0] {
        ClassMember::Method { function, .. } => assert_eq!(function.span.start, 10),
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn test_private_brand_check() {
    let program = parse_ok("class C { #x; static has(o) { return #x in o && 1 } }");
    let Stmt::Class(class) = &program.body[0] else {
        panic!("expected class");
    };
    assert_eq!(class.body.len(), 2);
    assert!(parse("class C { #x; m() { return #x + 1 } }").is_err());
    assert!(parse("for (#x in o);").is_err());
    match first_expr("#x in o") {
        Expr::Binary { op, left, .. } => {
            assert_eq!(op, BinaryOp::In);
            assert!(matches!(*left, Expr::PrivateName(_)));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_escaped_identifiers_resolve() {
    match first_expr("\\u0061bc.d\\u{65}f") {
        Expr::Member { object, .. } => match *object {
            Expr::Ident(ident) => assert_eq!(ident.name, "abc"),
            other => panic!("expected identifier, got {:?}", other),
        },
        other => panic!("expected member, got {:?}", other),
    }
    assert!(parse("let \\u0069f = 1;").is_err());
}

// ==================== Errors ====================

#[test]
fn test_unexpected_token() {
    let err = parse("const a = ;").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    assert_eq!(err.span().start, 10);
}

#[test]
fn test_unterminated_string() {
    let err = parse("let s = \"abc").unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedString { .. }));
}

#[test]
fn test_error_context_points_at_token() {
    let source = "let a = 1;\nlet b = );";
    let err = parse(source).unwrap_err();
    let rendered = err.format_with_context(source);
    assert!(rendered.contains("let b = );"));
    assert!(rendered.contains('^'));
}

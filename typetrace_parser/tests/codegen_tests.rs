//! Printer tests
//!
//! Each case parses a module and checks the printed form.

use pretty_assertions::assert_eq;
use typetrace_parser::{generate, parse};

fn print(source: &str) -> String {
    let program =
        parse(source).unwrap_or_else(|e| panic!("Failed to parse: {}\n{}", source, e));
    generate(&program)
}

fn assert_prints(source: &str, expected: &str) {
    assert_eq!(print(source), expected, "source: {}", source);
}

/// Printing the printed form again must not change it
fn assert_stable(source: &str) {
    let once = print(source);
    assert_eq!(print(&once), once, "source: {}", source);
}

// ==================== Declarations ====================

#[test]
fn test_function_declaration() {
    assert_prints(
        "function f(a, b = 1, ...rest) { return a + b }",
        "function f(a, b = 1, ...rest) {\n  return a + b;\n}\n",
    );
}

#[test]
fn test_function_expressions() {
    assert_prints(
        "const f = function g(x) {}, h = function () {};",
        "const f = function g(x) {}, h = function () {};\n",
    );
}

#[test]
fn test_async_generator() {
    assert_prints(
        "async function* g() { yield* other(); await x }",
        "async function* g() {\n  yield* other();\n  await x;\n}\n",
    );
}

#[test]
fn test_class() {
    assert_prints(
        "class A extends B { constructor(x) { super(x) } static s = 1; get g() { return 1 } }",
        "class A extends B {\n  constructor(x) {\n    super(x);\n  }\n  static s = 1;\n  get g() {\n    return 1;\n  }\n}\n",
    );
}

#[test]
fn test_brand_check_and_escaped_names() {
    assert_prints("#x in o && \\u0061b", "#x in o && ab;\n");
}

#[test]
fn test_object_literal() {
    assert_prints(
        "const o = { a: 1, b, ...c, [k]: v, m() {} };",
        "const o = {a: 1, b, ...c, [k]: v, m() {}};\n",
    );
}

// ==================== Statements ====================

#[test]
fn test_if_else() {
    assert_prints(
        "if (a) { b() } else if (c) { d() } else { e() }",
        "if (a) {\n  b();\n} else if (c) {\n  d();\n} else {\n  e();\n}\n",
    );
    assert_prints("if (a) b(); else c();", "if (a) b();\nelse c();\n");
}

#[test]
fn test_loops() {
    assert_prints(
        "for (let i = 0; i < n; i++) {}",
        "for (let i = 0; i < n; i++) {}\n",
    );
    assert_prints(
        "for (const [k, v] of Object.entries(o)) log(k)",
        "for (const [k, v] of Object.entries(o)) log(k);\n",
    );
    assert_prints("while (x) x--", "while (x) x--;\n");
}

#[test]
fn test_switch() {
    assert_prints(
        "switch (x) { case 1: a(); break; default: b() }",
        "switch (x) {\n  case 1:\n    a();\n    break;\n  default:\n    b();\n}\n",
    );
}

#[test]
fn test_try_catch_finally() {
    assert_prints(
        "try { a() } catch (e) { b() } finally { c() }",
        "try {\n  a();\n} catch (e) {\n  b();\n} finally {\n  c();\n}\n",
    );
}

#[test]
fn test_directive() {
    assert_prints("'use strict'", "'use strict';\n");
}

// ==================== Modules ====================

#[test]
fn test_imports_and_exports() {
    assert_prints(
        "import a, { b as c, d } from \"m\"",
        "import a, {b as c, d} from \"m\";\n",
    );
    assert_prints("import * as ns from 'm'", "import * as ns from 'm';\n");
    assert_prints("import 'side-effect'", "import 'side-effect';\n");
    assert_prints("export { a as b }", "export {a as b};\n");
    assert_prints(
        "export default function () {}",
        "export default function () {}\n",
    );
    assert_prints("export * as ns from \"m\"", "export * as ns from \"m\";\n");
}

// ==================== Expressions ====================

#[test]
fn test_parenthesized_statement_starts() {
    assert_prints("({ a } = obj);", "({a} = obj);\n");
    assert_prints("x = () => ({ a: 1 });", "x = () => ({a: 1});\n");
}

#[test]
fn test_optional_chains() {
    assert_prints("obj?.a?.[b]?.(c)", "obj?.a?.[b]?.(c);\n");
}

#[test]
fn test_new_always_has_arguments() {
    assert_prints("new Foo", "new Foo();\n");
}

#[test]
fn test_templates() {
    assert_prints("`a${b}c`", "`a${b}c`;\n");
    assert_prints("tag`x${y}`", "tag`x${y}`;\n");
}

#[test]
fn test_precedence_preserved() {
    assert_prints("(a + b) * c", "(a + b) * c;\n");
    assert_prints("a ** -b", "a ** -b;\n");
}

#[test]
fn test_printed_output_is_stable() {
    assert_stable("class A { #x = 1; static async *gen() { yield 1 } }");
    assert_stable("label: for (const x of xs) { if (x) continue label; }");
    assert_stable("const { a, b: [c, , d], ...e } = f;");
    assert_stable("let v = a ? b : c ?? d;");
}

use pretty_assertions::assert_eq;

use super::*;

fn with_h(source: &str) -> String {
    Instrumenter::with_options("H")
        .unwrap()
        .instrument(source, "m.js")
        .unwrap()
}

// ==================== Declarations ====================

#[test]
fn test_function_declaration() {
    let out = instrument("function add(a, b) { return a + b }", "m.js").unwrap();
    assert_eq!(
        out,
        "function add(__tt_p0, __tt_p1) {\n\
         \x20 var [__tt_call, a, b] = globalThis.__typetrace.enter(\"m.js:0\", __tt_p0, __tt_p1);\n\
         \x20 return globalThis.__typetrace.exit(__tt_call, add, a + b);\n\
         }\n"
    );
}

#[test]
fn test_arrow_gets_temporary() {
    assert_eq!(
        with_h("const sq = x => x * x;"),
        "var __tt_f0;\n\
         const sq = __tt_f0 = (__tt_p0) => {\n\
         \x20 var [__tt_call, x] = H.enter(\"m.js:11\", __tt_p0);\n\
         \x20 return H.exit(__tt_call, __tt_f0, x * x);\n\
         };\n"
    );
}

#[test]
fn test_nested_functions_are_independent() {
    assert_eq!(
        with_h("const a = () => () => 1;"),
        "var __tt_f0, __tt_f1;\n\
         const a = __tt_f0 = () => {\n\
         \x20 var [__tt_call] = H.enter(\"m.js:10\");\n\
         \x20 return H.exit(__tt_call, __tt_f0, __tt_f1 = () => {\n\
         \x20   var [__tt_call] = H.enter(\"m.js:16\");\n\
         \x20   return H.exit(__tt_call, __tt_f1, 1);\n\
         \x20 });\n\
         };\n"
    );
}

#[test]
fn test_generator_with_directive() {
    assert_eq!(
        with_h("function* gen() { \"use strict\"; yield 1; yield* other() }"),
        "function* gen() {\n\
         \x20 \"use strict\";\n\
         \x20 var [__tt_call] = H.enter(\"m.js:0\");\n\
         \x20 yield H.yieldValue(__tt_call, 1);\n\
         \x20 yield* H.delegateYield(__tt_call, other());\n\
         \x20 return H.exit(__tt_call, gen, undefined);\n\
         }\n"
    );
}

#[test]
fn test_class_members() {
    let source = "class Point {\n  constructor(x) { this.x = x }\n  get norm() { return this.x }\n  static make() { return new Point(1) }\n}\n";
    assert_eq!(
        with_h(source),
        "class Point {\n\
         \x20 constructor(__tt_p0) {\n\
         \x20   var [__tt_call, x] = H.enter(\"m.js:16\", __tt_p0);\n\
         \x20   this.x = x;\n\
         \x20   return H.exit(__tt_call, Point, undefined);\n\
         \x20 }\n\
         \x20 get norm() {\n\
         \x20   var [__tt_call] = H.enter(\"m.js:48\");\n\
         \x20   return H.exit(__tt_call, Object.getOwnPropertyDescriptor(Object.getPrototypeOf(this), \"norm\")?.get, this.x);\n\
         \x20 }\n\
         \x20 static make() {\n\
         \x20   var [__tt_call] = H.enter(\"m.js:79\");\n\
         \x20   return H.exit(__tt_call, this?.make, new Point(1));\n\
         \x20 }\n\
         }\n"
    );
}

#[test]
fn test_anonymous_class_and_private_members() {
    let out = with_h("const C = class { #m() { return 1 } constructor() {} };");
    assert!(out.contains("H.exit(__tt_call, this?.#m, 1)"), "{out}");
    assert!(out.contains("H.exit(__tt_call, undefined, undefined)"), "{out}");
}

#[test]
fn test_object_literal_members() {
    let out = with_h("const o = { m() { return 1 }, set v(x) {}, f: function () {} };");
    assert!(out.starts_with("var __tt_f0;\n"), "{out}");
    assert!(out.contains("H.exit(__tt_call, this?.m, 1)"), "{out}");
    assert!(
        out.contains("Object.getOwnPropertyDescriptor(this, \"v\")?.set"),
        "{out}"
    );
    assert!(out.contains("f: __tt_f0 = function () {"), "{out}");
}

// ==================== Locations ====================

#[test]
fn test_exports_key_at_export_keyword() {
    assert_eq!(
        with_h("export function f() {}\nexport default () => 1;\n"),
        "export function f() {\n\
         \x20 var [__tt_call] = H.enter(\"m.js:0\");\n\
         \x20 return H.exit(__tt_call, f, undefined);\n\
         }\n\
         export default () => {\n\
         \x20 var [__tt_call] = H.enter(\"m.js:23\");\n\
         \x20 return H.exit(__tt_call, undefined, 1);\n\
         };\n"
    );
}

#[test]
fn test_async_arrow_keys_at_async() {
    let out = with_h("const g = async x => x;");
    assert!(out.contains("H.enter(\"m.js:10\", __tt_p0)"), "{out}");
}

// ==================== Naming ====================

#[test]
fn test_prefix_avoids_collisions() {
    assert_eq!(
        with_h("function f(__tt) { return __tt }"),
        "function f(__tt1_p0) {\n\
         \x20 var [__tt1_call, __tt] = H.enter(\"m.js:0\", __tt1_p0);\n\
         \x20 return H.exit(__tt1_call, f, __tt);\n\
         }\n"
    );
}

#[test]
fn test_output_is_deterministic() {
    let source = "export const api = { list: async (page = 1) => fetch(page) };";
    assert_eq!(with_h(source), with_h(source));
}

// ==================== Failures ====================

#[test]
fn test_parse_failure_names_module() {
    let err = instrument("function (", "bad.js").unwrap_err();
    match err {
        TraceError::Parse { module, .. } => assert_eq!(module, "bad.js"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_invalid_hook_binding() {
    assert!(matches!(
        Instrumenter::with_options("globalThis['hooks']"),
        Err(TraceError::Config(_))
    ));
    let config = Config {
        hooks: "window.tt".to_string(),
        ..Config::default()
    };
    let out = Instrumenter::from_config(&config)
        .unwrap()
        .instrument("function f() {}", "m.js")
        .unwrap();
    assert!(out.contains("window.tt.enter(\"m.js:0\")"), "{out}");
}

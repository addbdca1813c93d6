//! Instrument a module, drive its hooks the way the host would, and read
//! the inferred signatures back

mod common;

use std::rc::Rc;

use common::{declared, entry_keys, first_arg, returns_nothing, signature_at};
use pretty_assertions::assert_eq;
use typetrace::{
    instrument, Collector, Config, Location, NoLocations, OutputMode, Session, SourceLocation,
    StaticLocations, TraceError,
};
use typetrace_runtime::{FunctionRef, IteratorRef, ObjectRef, Value};

fn single_key(source: &str, module: &str) -> String {
    let keys = entry_keys(&instrument(source, module).unwrap());
    assert_eq!(keys.len(), 1, "expected one function in {source:?}");
    keys.into_iter().next().unwrap_or_default()
}

// ==================== Scenarios ====================

#[test]
fn test_number_argument_without_return() {
    let c = Collector::default();
    let key = single_key("function f(x) {}\nf(1);\n", "app.js");
    assert_eq!(key, "app.js:0");
    let f = declared(&c, "f", &key, returns_nothing);
    f.call(&Value::Undefined, vec![Value::from(1)]).unwrap();

    let sig = c.signature(&SourceLocation::new("app.js", 0)).unwrap().unwrap();
    assert_eq!(sig.params, vec!["number".to_string()]);
    assert_eq!(sig.returns, None);
    assert_eq!(sig.to_string(), "(arg0: number)");
}

#[test]
fn test_object_argument() {
    let c = Collector::default();
    let key = single_key("function f(o) {}\nf({a: 1});\n", "app.js");
    let f = declared(&c, "f", &key, returns_nothing);
    let arg = ObjectRef::from_entries([("a", Value::from(1))]);
    f.call(&Value::Undefined, vec![Value::from(arg)]).unwrap();
    assert_eq!(signature_at(&c, &key), "(arg0: { a: number })");
}

#[test]
fn test_array_argument() {
    let c = Collector::default();
    let key = single_key("function f(xs) {}\nf([1, 2, 3]);\n", "app.js");
    let f = declared(&c, "f", &key, returns_nothing);
    f.call(&Value::Undefined, vec![Value::from(vec![1, 2, 3])]).unwrap();
    assert_eq!(signature_at(&c, &key), "(arg0: number[])");
}

#[test]
fn test_calls_unify_across_observations() {
    let c = Collector::default();
    let key = single_key("const pick = (o) => o.a;", "app.js");
    let pick = declared(&c, "pick", &key, |args| {
        let o = args.into_iter().next().unwrap_or(Value::Undefined);
        Ok(o.as_object().map(|o| o.get("a")).unwrap_or(Value::Undefined))
    });
    let with_b = ObjectRef::from_entries([("a", Value::from(1)), ("b", Value::from("x"))]);
    let without_b = ObjectRef::from_entries([("a", Value::from("one"))]);
    pick.call(&Value::Undefined, vec![Value::from(with_b)]).unwrap();
    pick.call(&Value::Undefined, vec![Value::from(without_b)]).unwrap();
    assert_eq!(
        signature_at(&c, &key),
        "(arg0: { a: number|string, b?: string }): number|string"
    );
}

#[test]
fn test_callbacks_are_inferred_through_the_caller() {
    let c = Collector::default();
    let key = single_key("function apply(fn, x) { return fn(x) }", "app.js");
    let apply = declared(&c, "apply", &key, |args| {
        let mut args = args.into_iter();
        let callback = args.next().unwrap_or(Value::Undefined);
        let x = args.next().unwrap_or(Value::Undefined);
        callback.call(&Value::Undefined, vec![x])
    });
    let double = FunctionRef::native("double", |_, args| {
        Ok(Value::from(args.first().and_then(Value::as_number).unwrap_or(0.0) * 2.0))
    });
    apply
        .call(&Value::Undefined, vec![Value::from(double), Value::from(2)])
        .unwrap();
    assert_eq!(
        signature_at(&c, &key),
        "(arg0: (arg0: number) => number, arg1: number): number"
    );
}

#[test]
fn test_generator_signature() {
    let c = Collector::default();
    let key = single_key("function* count() { yield 1; yield 2; return \"done\" }", "gen.js");
    let (call, _) = c.enter(&key, Vec::new()).unwrap();
    c.yield_value(call, Value::from(1)).unwrap();
    c.yield_value(call, Value::from(2)).unwrap();
    c.exit(call, &Value::Undefined, Value::from("done")).unwrap();
    assert_eq!(signature_at(&c, &key), "(): Generator<number, string>");
}

#[test]
fn test_delegated_yields_are_captured() {
    let c = Collector::default();
    let key = single_key("function* outer() { return yield* inner() }", "gen.js");
    let (call, _) = c.enter(&key, Vec::new()).unwrap();
    let inner = IteratorRef::generator(vec![Value::from("a"), Value::from("b")], Value::from(3));
    let delegated = c.delegate_yield(call, &Value::from(inner)).unwrap();
    let (yielded, completion) = delegated.collect().unwrap();
    assert_eq!(yielded.len(), 2);
    c.exit(call, &Value::Undefined, completion).unwrap();
    assert_eq!(signature_at(&c, &key), "(): Generator<string, number>");
}

#[test]
fn test_self_reference_ties_location_to_function() {
    let c = Collector::default();
    let key = single_key("function id(x) { return x }", "app.js");
    let id = declared(&c, "id", &key, first_arg);
    id.call(&Value::Undefined, vec![Value::from(true)]).unwrap();
    assert!(c.shares_trace(&SourceLocation::new("app.js", 0), &id));
    assert_eq!(c.function_trace(&id).map(|set| set.len()), Some(1));
}

// ==================== Session ====================

#[tokio::test]
async fn test_session_prints_report() {
    let mut session = Session::new(Config::default(), Rc::new(NoLocations)).unwrap();
    let out = session
        .load_module("export function area(w, h) { return w * h }\n", "shapes.js")
        .unwrap();
    session.load_module("function unused() {}\n", "other.js").unwrap();
    let key = entry_keys(&out).remove(0);
    let area = declared(session.collector(), "area", &key, |args| {
        let product: f64 = args.iter().filter_map(Value::as_number).product();
        Ok(Value::from(product))
    });
    area.call(&Value::Undefined, vec![Value::from(2), Value::from(3)])
        .unwrap();

    let report = session.finish().await.unwrap();
    assert_eq!(
        report.render(OutputMode::Print).unwrap(),
        "shapes.js\nshapes.js:0 (arg0: number, arg1: number): number\n---\nother.js\n---\n"
    );
    assert!(matches!(
        report.render(OutputMode::Diff),
        Err(TraceError::NotImplemented(_))
    ));
}

#[tokio::test]
async fn test_session_skips_configured_modules() {
    let config = Config {
        skip: vec!["vendor/".to_string()],
        ..Config::default()
    };
    let mut session = Session::new(config, Rc::new(NoLocations)).unwrap();
    let out = session
        .load_module("function dep(x) { return x }\n", "vendor/dep.js")
        .unwrap();
    let key = entry_keys(&out).remove(0);
    let dep = declared(session.collector(), "dep", &key, first_arg);
    dep.call(&Value::Undefined, vec![Value::from(1)]).unwrap();

    let report = session.finish().await.unwrap();
    assert!(report.is_empty());
    assert_eq!(
        report.render(OutputMode::Print).unwrap(),
        "vendor/dep.js\n---\n"
    );
}

#[tokio::test]
async fn test_session_resolves_function_locations() {
    let location = Location {
        file: "/srv/app.js".to_string(),
        line: 1,
        column: 1,
    };
    let resolver = StaticLocations::new().with("main", location.clone());
    let mut session = Session::new(Config::default(), Rc::new(resolver)).unwrap();
    let out = session.load_module("function main() {}\n", "app.js").unwrap();
    let key = entry_keys(&out).remove(0);
    let collector = session.collector().clone();
    let main = declared(&collector, "main", &key, returns_nothing);
    main.call(&Value::Undefined, Vec::new()).unwrap();
    assert!(collector.pending_lookups() > 0);

    session.finish().await.unwrap();
    assert_eq!(collector.pending_lookups(), 0);
    assert_eq!(collector.function_location(&main), Some(location));
}

#[test]
fn test_session_rejects_bad_hook_binding() {
    let config = Config {
        hooks: "not a path".to_string(),
        ..Config::default()
    };
    let err = Session::new(config, Rc::new(NoLocations)).unwrap_err();
    assert!(matches!(err, TraceError::Config(_)));
}

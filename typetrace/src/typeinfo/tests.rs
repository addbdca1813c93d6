use pretty_assertions::assert_eq;
use typetrace_runtime::{ArrayRef, ClassRef, FunctionRef, IteratorRef, ObjectRef, Symbol, Value};

use super::*;
use crate::error::TraceError;
use crate::trace::CallRecord;

fn sig_of(store: &mut TypeStore, value: &Value) -> String {
    let ty = store.compute_typeinfo(value);
    signature(store, &ty)
}

fn render(store: &mut TypeStore, ty: &TypeInfo) -> String {
    Renderer::new(store, &NoTraces).render(ty).unwrap()
}

fn number() -> TypeInfo {
    TypeInfo::Primitive(PrimitiveKind::Number)
}

fn string() -> TypeInfo {
    TypeInfo::Primitive(PrimitiveKind::String)
}

// ==================== Classification ====================

#[test]
fn test_primitive_classification() {
    let mut store = TypeStore::new();
    let cases = [
        (Value::Undefined, "undefined"),
        (Value::Null, "null"),
        (Value::from(true), "boolean"),
        (Value::from(1.5), "number"),
        (Value::BigInt(7), "bigint"),
        (Value::from("s"), "string"),
        (Value::from(Symbol::new(None)), "symbol"),
    ];
    for (value, expected) in cases {
        assert_eq!(sig_of(&mut store, &value), expected);
    }
}

#[test]
fn test_generator_objects_are_nominal() {
    let mut store = TypeStore::new();
    let it = IteratorRef::generator(vec![Value::from(1)], Value::Undefined);
    let ty = store.compute_typeinfo(&Value::from(it));
    assert!(matches!(ty, TypeInfo::Class(_)));
    assert_eq!(render(&mut store, &ty), "Generator");
}

#[test]
fn test_class_instances_render_by_name() {
    let mut store = TypeStore::new();
    let point = ClassRef::new("Point");
    let p1 = Value::from(point.instantiate([("x", Value::from(1))]));
    let p2 = Value::from(point.instantiate([("x", Value::from("one"))]));
    let t1 = store.compute_typeinfo(&p1);
    let t2 = store.compute_typeinfo(&p2);
    assert_eq!(t1, t2);
    assert_eq!(signature(&store, &t1), "Point#0");
    assert_eq!(render(&mut store, &t1), "Point");
}

#[test]
fn test_same_function_same_identity() {
    let mut store = TypeStore::new();
    let f = FunctionRef::native("f", |_, _| Ok(Value::Undefined));
    let g = FunctionRef::native("g", |_, _| Ok(Value::Undefined));
    let a = store.compute_typeinfo(&Value::from(f.clone()));
    let b = store.compute_typeinfo(&Value::from(f));
    let c = store.compute_typeinfo(&Value::from(g));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(signature(&store, &c), "fn#1");
}

// ==================== Signatures ====================

#[test]
fn test_self_cycle_signature() {
    let mut store = TypeStore::new();
    let o = ObjectRef::new();
    o.set("self", Value::from(o.clone())).unwrap();
    assert_eq!(sig_of(&mut store, &Value::from(o)), "<ref *0>{self:<Circular *0>}");
}

#[test]
fn test_nested_cycle_signature() {
    let mut store = TypeStore::new();
    let inner = ObjectRef::new();
    inner.set("o", Value::from(inner.clone())).unwrap();
    let outer = ObjectRef::from_entries([("O", Value::from(inner))]);
    assert_eq!(
        sig_of(&mut store, &Value::from(outer)),
        "{O:<ref *0>{o:<Circular *0>}}"
    );
}

#[test]
fn test_shared_node_is_numbered() {
    let mut store = TypeStore::new();
    let shared = ObjectRef::from_entries([("n", Value::from(1))]);
    let outer = ObjectRef::from_entries([
        ("a", Value::from(shared.clone())),
        ("b", Value::from(shared)),
    ]);
    assert_eq!(
        sig_of(&mut store, &Value::from(outer)),
        "{a:<ref *0>{n:number},b:<Circular *0>}"
    );
}

#[test]
fn test_array_signatures() {
    let mut store = TypeStore::new();
    let nums = Value::from(vec![1, 2, 3]);
    let mixed = Value::from(vec![Value::from(1), Value::from("a"), Value::from(2)]);
    let empty = Value::from(ArrayRef::new(Vec::new()));
    assert_eq!(sig_of(&mut store, &nums), "number[]");
    assert_eq!(sig_of(&mut store, &mixed), "(number|string)[]");
    assert_eq!(sig_of(&mut store, &empty), "[]");
}

#[test]
fn test_cyclic_array_terminates() {
    let mut store = TypeStore::new();
    let arr = ArrayRef::new(vec![Value::from(1)]);
    arr.push(Value::from(arr.clone()));
    assert_eq!(sig_of(&mut store, &Value::from(arr)), "(number|[])[]");
}

#[test]
fn test_signature_is_stable() {
    let mut store = TypeStore::new();
    let o = ObjectRef::from_entries([("a", Value::from(1)), ("b", Value::from("x"))]);
    let ty = store.compute_typeinfo(&Value::from(o));
    assert_eq!(signature(&store, &ty), signature(&store, &ty));
    assert_eq!(signature(&store, &ty), "{a:number,b:string}");
}

#[test]
fn test_record_signature() {
    let store = TypeStore::new();
    let text = record_signature(&store, &[number(), string()], &[], &TypeInfo::UNDEFINED);
    assert_eq!(text, "[number,string],[],undefined");
}

// ==================== Combination ====================

#[test]
fn test_combine_empty_is_undefined() {
    let mut store = TypeStore::new();
    assert_eq!(combine_types(&mut store, Vec::new()), TypeInfo::UNDEFINED);
}

#[test]
fn test_combine_identical_returns_first() {
    let mut store = TypeStore::new();
    let a = store.compute_typeinfo(&Value::from(ObjectRef::from_entries([("a", Value::from(1))])));
    let b = store.compute_typeinfo(&Value::from(ObjectRef::from_entries([("a", Value::from(2))])));
    assert_ne!(a, b);
    assert_eq!(combine_types(&mut store, vec![a.clone(), b]), a);
}

#[test]
fn test_combine_flattens_unions() {
    let mut store = TypeStore::new();
    let union = TypeInfo::Union(vec![number(), string()]);
    let combined = combine_types(
        &mut store,
        vec![union, TypeInfo::Primitive(PrimitiveKind::Boolean), number()],
    );
    assert_eq!(signature(&store, &combined), "number|string|boolean");
    assert!(combined
        .members()
        .iter()
        .all(|m| !matches!(m, TypeInfo::Union(_))));
}

#[test]
fn test_missing_fields_become_optional() {
    let mut store = TypeStore::new();
    let a = store.compute_typeinfo(&Value::from(ObjectRef::from_entries([
        ("a", Value::from(1)),
        ("b", Value::from("x")),
    ])));
    let b = store.compute_typeinfo(&Value::from(ObjectRef::from_entries([("a", Value::from(2))])));
    let combined = combine_types(&mut store, vec![a, b]);
    assert_eq!(render(&mut store, &combined), "{ a: number, b?: string }");
}

#[test]
fn test_repeated_observation_folds_into_one_shape() {
    let mut store = TypeStore::new();
    let o = ObjectRef::from_entries([("a", Value::from(1))]);
    let first = store.compute_typeinfo(&Value::from(o.clone()));
    o.set("b", Value::from("late")).unwrap();
    let second = store.compute_typeinfo(&Value::from(o));
    assert_eq!(first, second);
    assert_eq!(render(&mut store, &second), "{ a: number, b?: string }");
}

#[test]
fn test_merging_cyclic_shapes_terminates() {
    let mut store = TypeStore::new();
    let mut types = Vec::new();
    for x in [Value::from(1), Value::from("one")] {
        let o = ObjectRef::from_entries([("x", x)]);
        o.set("self", Value::from(o.clone())).unwrap();
        types.push(store.compute_typeinfo(&Value::from(o)));
    }
    let combined = combine_types(&mut store, types);
    assert_eq!(
        signature(&store, &combined),
        "<ref *0>{x:number|string,self:<Circular *0>}"
    );
    assert_eq!(render(&mut store, &combined), "{ x: number|string, self: object }");
}

#[test]
fn test_combine_traces() {
    let mut store = TypeStore::new();
    let records = vec![
        CallRecord {
            args: vec![number()],
            yields: Vec::new(),
            returns: number(),
        },
        CallRecord {
            args: vec![string(), number()],
            yields: Vec::new(),
            returns: number(),
        },
    ];
    let combined = combine_traces(&mut store, &records);
    assert_eq!(signature(&store, &combined.args[0]), "number|string");
    assert_eq!(signature(&store, &combined.args[1]), "undefined|number");
    assert!(combined.yields.is_empty());
    assert_eq!(combined.returns, number());
}

#[test]
fn test_arrays_of_different_elements_stay_separate() {
    let mut store = TypeStore::new();
    let numbers = store.compute_typeinfo(&Value::from(vec![1]));
    let strings = store.compute_typeinfo(&Value::from(vec!["x"]));
    let again = store.compute_typeinfo(&Value::from(vec![2, 3]));
    let combined = combine_types(&mut store, vec![numbers, strings, again]);
    assert_eq!(signature(&store, &combined), "number[]|string[]");
    assert_eq!(render(&mut store, &combined), "number[]|string[]");
}

#[test]
fn test_combine_traces_flattens_yields() {
    let mut store = TypeStore::new();
    let records = vec![
        CallRecord {
            args: Vec::new(),
            yields: vec![number(), string()],
            returns: TypeInfo::UNDEFINED,
        },
        CallRecord {
            args: Vec::new(),
            yields: Vec::new(),
            returns: TypeInfo::UNDEFINED,
        },
        CallRecord {
            args: Vec::new(),
            yields: vec![number()],
            returns: TypeInfo::UNDEFINED,
        },
    ];
    let combined = combine_traces(&mut store, &records);
    assert_eq!(combined.yields.len(), 1);
    assert_eq!(signature(&store, &combined.yields[0]), "number|string");
}

// ==================== Rendering ====================

#[test]
fn test_render_arrays() {
    let mut store = TypeStore::new();
    let empty = TypeInfo::Array(Vec::new());
    let mixed = TypeInfo::Array(vec![number(), string()]);
    assert_eq!(render(&mut store, &empty), "unknown[]");
    assert_eq!(render(&mut store, &mixed), "(number|string)[]");
    assert_eq!(render(&mut store, &TypeInfo::Array(vec![number(), number()])), "number[]");
}

#[test]
fn test_render_quotes_odd_keys() {
    let mut store = TypeStore::new();
    let o = ObjectRef::from_entries([("content-type", Value::from("a"))]);
    let ty = store.compute_typeinfo(&Value::from(o));
    assert_eq!(render(&mut store, &ty), "{ \"content-type\": string }");
}

#[test]
fn test_render_symbol_is_not_implemented() {
    let mut store = TypeStore::new();
    let ty = TypeInfo::Primitive(PrimitiveKind::Symbol);
    let err = Renderer::new(&mut store, &NoTraces).render(&ty).unwrap_err();
    assert!(matches!(err, TraceError::NotImplemented(_)));
}

#[test]
fn test_untraced_function_renders_as_function() {
    let mut store = TypeStore::new();
    let f = FunctionRef::native("f", |_, _| Ok(Value::Undefined));
    let ty = store.compute_typeinfo(&Value::from(f));
    assert_eq!(render(&mut store, &ty), "Function");
}

#[test]
fn test_generator_signature_annotation() {
    let mut store = TypeStore::new();
    let records = vec![CallRecord {
        args: Vec::new(),
        yields: vec![number(), number()],
        returns: TypeInfo::UNDEFINED,
    }];
    let sig = Renderer::new(&mut store, &NoTraces).signature(&records).unwrap();
    assert_eq!(sig.return_annotation().as_deref(), Some("Generator<number>"));
    assert_eq!(sig.to_string(), "(): Generator<number>");
}

//! Instrumentation output over whole modules

mod common;

use common::entry_keys;
use pretty_assertions::assert_eq;
use typetrace::{instrument, Instrumenter, TraceError};

const MODULE: &str = r#""use strict";
import { helper } from "./helper.js";

export function total(items, [first, ...others] = [], { scale = 1 } = {}) {
  return items.reduce((sum, item) => sum + item * scale, first ?? 0);
}

export default class Cart {
  #items = [];
  constructor(owner) { this.owner = owner }
  add(item) { this.#items.push(item); return this }
  get size() { return this.#items.length }
  static empty() { return new Cart(null) }
  *[Symbol.iterator]() { yield* this.#items }
}

const api = {
  async load(id) { return helper(id) },
  format: function (value) { return `${value}` },
};
"#;

#[test]
fn test_every_function_reports_its_location() {
    let out = instrument(MODULE, "src/cart.js").unwrap();
    let keys = entry_keys(&out);
    let expected: Vec<String> = [
        MODULE.find("export function").unwrap(),
        MODULE.find("(sum, item)").unwrap(),
        MODULE.find("constructor").unwrap(),
        MODULE.find("add(item)").unwrap(),
        MODULE.find("get size").unwrap(),
        MODULE.find("static empty").unwrap(),
        MODULE.find("*[Symbol").unwrap(),
        MODULE.find("async load").unwrap(),
        MODULE.find("function (value)").unwrap(),
    ]
    .iter()
    .map(|offset| format!("src/cart.js:{offset}"))
    .collect();
    let mut sorted = keys.clone();
    sorted.sort_by_key(|k| k.rsplit(':').next().and_then(|o| o.parse::<usize>().ok()));
    assert_eq!(sorted, expected);
}

#[test]
fn test_output_reparses() {
    let out = instrument(MODULE, "src/cart.js").unwrap();
    assert!(typetrace_parser::parse(&out).is_ok(), "{out}");
    let twice = instrument(&out, "src/cart.js").unwrap();
    assert!(typetrace_parser::parse(&twice).is_ok(), "{twice}");
}

#[test]
fn test_output_is_stable() {
    assert_eq!(
        instrument(MODULE, "src/cart.js").unwrap(),
        instrument(MODULE, "src/cart.js").unwrap()
    );
}

#[test]
fn test_directives_and_temporaries_lead_the_module() {
    let out = instrument(MODULE, "src/cart.js").unwrap();
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("\"use strict\";"));
    assert_eq!(lines.next(), Some("var __tt_f0, __tt_f1;"));
    assert_eq!(lines.next(), Some("import {helper} from \"./helper.js\";"));
}

#[test]
fn test_self_references() {
    let out = Instrumenter::with_options("T")
        .unwrap()
        .instrument(MODULE, "src/cart.js")
        .unwrap();
    for expected in [
        "T.exit(__tt_call, total, ",
        "T.exit(__tt_call, Cart, undefined)",
        "T.exit(__tt_call, this?.add, this)",
        "Object.getOwnPropertyDescriptor(Object.getPrototypeOf(this), \"size\")?.get",
        "T.exit(__tt_call, this?.empty, new Cart(null))",
        "T.exit(__tt_call, undefined, undefined)",
        "T.exit(__tt_call, this?.load, helper(id))",
        "format: __tt_f1 = function (__tt_p0) {",
    ] {
        assert!(out.contains(expected), "missing {expected:?} in\n{out}");
    }
}

#[test]
fn test_destructured_params_expand() {
    let out = Instrumenter::with_options("T")
        .unwrap()
        .instrument(MODULE, "src/cart.js")
        .unwrap();
    assert!(
        out.contains("export function total(__tt_p0, __tt_p1 = [], __tt_p4 = {}) {"),
        "{out}"
    );
    assert!(out.contains("var [__tt_p2, ...__tt_p3] = __tt_p1;"), "{out}");
    assert!(
        out.contains("var [__tt_call, items, first, others, {scale = 1}] = T.enter("),
        "{out}"
    );
}

#[test]
fn test_generator_member_yields_are_hooked() {
    let out = Instrumenter::with_options("T")
        .unwrap()
        .instrument(MODULE, "src/cart.js")
        .unwrap();
    assert!(out.contains("yield* T.delegateYield(__tt_call, this.#items);"), "{out}");
}

#[test]
fn test_parse_errors_are_fatal() {
    let err = instrument("const = 1;", "broken.js").unwrap_err();
    assert!(matches!(err, TraceError::Parse { ref module, .. } if module == "broken.js"));
    assert!(err.to_string().starts_with("failed to parse broken.js"));
}

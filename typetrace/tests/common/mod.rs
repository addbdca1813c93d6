//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use typetrace::{Collector, SourceLocation};
use typetrace_runtime::{FunctionRef, RuntimeResult, Value, WeakFunction};

/// Location keys passed to the entry hook, in output order
pub fn entry_keys(instrumented: &str) -> Vec<String> {
    let marker = ".enter(\"";
    let mut keys = Vec::new();
    let mut rest = instrumented;
    while let Some(start) = rest.find(marker) {
        let after = &rest[start + marker.len()..];
        let Some(end) = after.find('"') else { break };
        keys.push(after[..end].to_string());
        rest = &after[end..];
    }
    keys
}

/// Stand-in for the host running an instrumented declaration: enters with
/// `key`, runs `body` on the bound arguments and exits with the function
/// itself as the self reference.
pub fn declared<F>(collector: &Collector, name: &str, key: &str, body: F) -> FunctionRef
where
    F: Fn(Vec<Value>) -> RuntimeResult<Value> + 'static,
{
    let slot: Rc<RefCell<Option<WeakFunction>>> = Rc::new(RefCell::new(None));
    let me = slot.clone();
    let collector = collector.clone();
    let key = key.to_string();
    let f = FunctionRef::native(name, move |_, args| {
        let (call, args) = collector.enter(&key, args)?;
        let ret = body(args)?;
        let this_fn = me
            .borrow()
            .as_ref()
            .and_then(WeakFunction::upgrade)
            .map(Value::from)
            .unwrap_or(Value::Undefined);
        Ok(collector.exit(call, &this_fn, ret)?)
    });
    *slot.borrow_mut() = Some(f.downgrade());
    f
}

pub fn returns_nothing(_args: Vec<Value>) -> RuntimeResult<Value> {
    Ok(Value::Undefined)
}

pub fn first_arg(args: Vec<Value>) -> RuntimeResult<Value> {
    Ok(args.into_iter().next().unwrap_or(Value::Undefined))
}

pub fn signature_at(collector: &Collector, key: &str) -> String {
    let location = SourceLocation::parse(key).expect("valid location key");
    collector
        .signature(&location)
        .expect("signature renders")
        .expect("location was traced")
        .to_string()
}

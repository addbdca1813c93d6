//! Tracing wrappers
//!
//! Functions are wrapped in an intercepting shim that records every call
//! into the function's own trace set; plain objects are wrapped in a proxy
//! whose writes fold into the object's shape. Wrapping a wrapper is a no-op.

use std::fmt;
use std::rc::{Rc, Weak};

use typetrace_runtime::{
    CallInterceptor, FunctionRef, HostIterator, IterStep, IteratorRef, ObjectRef, PropertyObserver,
    RuntimeResult, Value,
};

use super::collector::{Collector, Inner, Owner};
use super::record::CallId;
use crate::typeinfo::{FunctionId, TypeInfo};

/// Wrap a value whose TypeInfo is `ty` so its future use is observed
pub(crate) fn wrap(collector: &Collector, value: Value, ty: &TypeInfo) -> Value {
    match (value, ty) {
        (Value::Function(f), TypeInfo::Function(id)) if !f.is_intercepted() => {
            collector.ensure_function_set(*id);
            let tracer = FunctionTracer {
                collector: collector.downgrade(),
                function: *id,
            };
            Value::Function(FunctionRef::intercepted(&f, Rc::new(tracer)))
        }
        (Value::Object(o), TypeInfo::Object(_)) if !o.is_proxy() => {
            let observer = ShapeObserver {
                collector: collector.downgrade(),
            };
            Value::Object(ObjectRef::proxy(&o, Rc::new(observer)))
        }
        (value, _) => value,
    }
}

/// Records calls made through a wrapped function
struct FunctionTracer {
    collector: Weak<Inner>,
    function: FunctionId,
}

impl CallInterceptor for FunctionTracer {
    fn call(&self, target: &FunctionRef, this: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
        let Some(inner) = self.collector.upgrade() else {
            return target.call(this, args);
        };
        let collector = Collector::from_inner(inner);
        let (call, args) = collector.open_call(Owner::Function(self.function), args);
        let result = match target.call(this, args) {
            Ok(result) => result,
            Err(err) => {
                collector.abandon(call);
                return Err(err);
            }
        };
        match result {
            Value::Iterator(it) if target.is_generator() => {
                let class = it.class().clone();
                let traced = TracedGenerator {
                    collector: self.collector.clone(),
                    call,
                    inner: it,
                    finished: false,
                };
                Ok(Value::Iterator(IteratorRef::new(class, Box::new(traced))))
            }
            result => Ok(collector.exit(Some(call), &Value::Undefined, result)?),
        }
    }
}

impl fmt::Debug for FunctionTracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTracer")
            .field("function", &self.function)
            .finish()
    }
}

/// Generator returned by a wrapped generator function; the call is
/// committed when it completes
struct TracedGenerator {
    collector: Weak<Inner>,
    call: CallId,
    inner: IteratorRef,
    finished: bool,
}

impl HostIterator for TracedGenerator {
    fn next(&mut self, sent: Value) -> RuntimeResult<IterStep> {
        let step = self.inner.next(sent)?;
        let collector = match self.collector.upgrade() {
            Some(inner) if !self.finished => Collector::from_inner(inner),
            _ => return Ok(step),
        };
        Ok(match step {
            IterStep::Yield(value) => IterStep::Yield(collector.yield_value(Some(self.call), value)?),
            IterStep::Done(value) => {
                self.finished = true;
                IterStep::Done(collector.exit(Some(self.call), &Value::Undefined, value)?)
            }
        })
    }
}

/// Folds writes through a proxy into the target's shape
struct ShapeObserver {
    collector: Weak<Inner>,
}

impl PropertyObserver for ShapeObserver {
    fn on_set(&self, target: &ObjectRef, key: &str, value: &Value) -> RuntimeResult<()> {
        if let Some(inner) = self.collector.upgrade() {
            Collector::from_inner(inner).observe_write(target, key, value);
        }
        Ok(())
    }
}

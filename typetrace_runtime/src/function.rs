//! Callable values
//!
//! A function is either native (a Rust closure standing in for compiled
//! code) or intercepted: a shim that hands every call to a
//! [`CallInterceptor`] together with the function it wraps.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::RuntimeResult;
use crate::value::{HeapId, Value};

/// Signature of native function bodies: `(this, args) -> result`
pub type NativeFn = dyn Fn(&Value, Vec<Value>) -> RuntimeResult<Value>;

/// Hook receiving calls made through an intercepted function
pub trait CallInterceptor {
    fn call(&self, target: &FunctionRef, this: &Value, args: Vec<Value>) -> RuntimeResult<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Normal,
    /// Calling it returns a generator iterator
    Generator,
    Async,
}

enum FunctionRepr {
    Native(Box<NativeFn>),
    Intercepted {
        target: FunctionRef,
        interceptor: Rc<dyn CallInterceptor>,
    },
}

struct FunctionInner {
    id: HeapId,
    name: Rc<str>,
    kind: FunctionKind,
    repr: FunctionRepr,
}

/// Handle to a function value
#[derive(Clone)]
pub struct FunctionRef(Rc<FunctionInner>);

/// Non-owning handle to a function
#[derive(Clone)]
pub struct WeakFunction(Weak<FunctionInner>);

impl FunctionRef {
    /// A native function
    pub fn native<F>(name: &str, body: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        Self::with_kind(name, FunctionKind::Normal, body)
    }

    /// A native generator function; `body` must return an iterator
    pub fn generator<F>(name: &str, body: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        Self::with_kind(name, FunctionKind::Generator, body)
    }

    pub fn with_kind<F>(name: &str, kind: FunctionKind, body: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        FunctionRef(Rc::new(FunctionInner {
            id: HeapId::fresh(),
            name: Rc::from(name),
            kind,
            repr: FunctionRepr::Native(Box::new(body)),
        }))
    }

    /// A shim with the same name and kind as `target` that routes calls to
    /// `interceptor`
    pub fn intercepted(target: &FunctionRef, interceptor: Rc<dyn CallInterceptor>) -> Self {
        FunctionRef(Rc::new(FunctionInner {
            id: HeapId::fresh(),
            name: target.0.name.clone(),
            kind: target.0.kind,
            repr: FunctionRepr::Intercepted {
                target: target.clone(),
                interceptor,
            },
        }))
    }

    pub fn call(&self, this: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
        match &self.0.repr {
            FunctionRepr::Native(body) => body(this, args),
            FunctionRepr::Intercepted {
                target,
                interceptor,
            } => interceptor.call(target, this, args),
        }
    }

    /// Identity of this handle (a shim has its own)
    pub fn id(&self) -> HeapId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.0.kind
    }

    pub fn is_generator(&self) -> bool {
        self.0.kind == FunctionKind::Generator
    }

    pub fn is_intercepted(&self) -> bool {
        matches!(self.0.repr, FunctionRepr::Intercepted { .. })
    }

    /// The function behind any number of interception layers
    pub fn original(&self) -> FunctionRef {
        let mut current = self.clone();
        loop {
            let next = match &current.0.repr {
                FunctionRepr::Native(_) => return current,
                FunctionRepr::Intercepted { target, .. } => target.clone(),
            };
            current = next;
        }
    }

    pub fn downgrade(&self) -> WeakFunction {
        WeakFunction(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &FunctionRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl WeakFunction {
    pub fn upgrade(&self) -> Option<FunctionRef> {
        self.0.upgrade().map(FunctionRef)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRef")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("kind", &self.0.kind)
            .field("intercepted", &self.is_intercepted())
            .finish()
    }
}

impl fmt::Debug for WeakFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakFunction")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting(Cell<usize>);

    impl CallInterceptor for Counting {
        fn call(
            &self,
            target: &FunctionRef,
            this: &Value,
            args: Vec<Value>,
        ) -> RuntimeResult<Value> {
            self.0.set(self.0.get() + 1);
            target.call(this, args)
        }
    }

    fn add() -> FunctionRef {
        FunctionRef::native("add", |_, args| {
            let a = args.first().and_then(Value::as_number).unwrap_or(0.0);
            let b = args.get(1).and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::from(a + b))
        })
    }

    #[test]
    fn test_native_call() {
        let result = add()
            .call(&Value::Undefined, vec![Value::from(1), Value::from(2)])
            .unwrap();
        assert_eq!(result.as_number(), Some(3.0));
    }

    #[test]
    fn test_interceptor_sees_calls_and_original_is_recoverable() {
        let f = add();
        let counter = Rc::new(Counting(Cell::new(0)));
        let shim = FunctionRef::intercepted(&f, counter.clone());
        let twice = FunctionRef::intercepted(&shim, counter.clone());

        let result = twice.call(&Value::Undefined, vec![Value::from(2), Value::from(2)]);
        assert_eq!(result.unwrap().as_number(), Some(4.0));
        assert_eq!(counter.0.get(), 2);
        assert!(twice.original().ptr_eq(&f));
        assert_eq!(twice.name(), "add");
    }
}

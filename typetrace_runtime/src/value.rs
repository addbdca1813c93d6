//! Dynamic Value type
//!
//! This module provides the `Value` enum the collector observes. Primitive
//! values are stored inline; heap values are shared handles carrying a
//! [`HeapId`] assigned at allocation, so identity survives cloning.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::array::ArrayRef;
use crate::class::InstanceRef;
use crate::error::{RuntimeError, RuntimeResult};
use crate::function::FunctionRef;
use crate::iter::IteratorRef;
use crate::object::ObjectRef;

/// Identity of a heap allocation, unique for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapId(u64);

impl HeapId {
    /// Allocate a fresh identity
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        HeapId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HeapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique symbol value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: HeapId,
    description: Option<Rc<str>>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: HeapId::fresh(),
            description: description.map(Rc::from),
        }
    }

    pub fn id(&self) -> HeapId {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Dynamic value
#[derive(Debug, Clone)]
pub enum Value {
    // ========== Primitive Types ==========
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(Rc<str>),
    Symbol(Symbol),

    // ========== Heap-Allocated Types ==========
    Array(ArrayRef),
    /// Plain object (or a proxy around one)
    Object(ObjectRef),
    Function(FunctionRef),
    /// Instance of a nominal class
    Instance(InstanceRef),
    Iterator(IteratorRef),
}

impl Value {
    /// Result of `typeof` for this value
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Function(_) => "function",
            Value::Array(_) | Value::Object(_) | Value::Instance(_) | Value::Iterator(_) => {
                "object"
            }
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Function(f) => format!("function {}", f.name()),
            Value::Instance(i) => format!("{} instance", i.class().name()),
            Value::Iterator(it) => it.class().name().to_string(),
            Value::Array(_) => "array".to_string(),
            other => other.type_of().to_string(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_iterator(&self) -> Option<&IteratorRef> {
        match self {
            Value::Iterator(it) => Some(it),
            _ => None,
        }
    }

    /// Call this value as a function
    pub fn call(&self, this: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
        match self {
            Value::Function(f) => f.call(this, args),
            other => Err(RuntimeError::not_callable(other.describe())),
        }
    }

    /// Start iterating this value (`for..of`, spread, `yield*`)
    pub fn iterate(&self) -> RuntimeResult<IteratorRef> {
        match self {
            Value::Array(array) => Ok(IteratorRef::over_array(array.clone())),
            Value::String(s) => Ok(IteratorRef::over_string(s)),
            Value::Iterator(it) => Ok(it.clone()),
            other => Err(RuntimeError::not_iterable(other.describe())),
        }
    }

    /// Identity comparison for heap values, `SameValueZero` for primitives
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.id() == b.id(),
            (Value::Object(a), Value::Object(b)) => a.id() == b.id(),
            (Value::Function(a), Value::Function(b)) => a.id() == b.id(),
            (Value::Instance(a), Value::Instance(b)) => a.id() == b.id(),
            (Value::Iterator(a), Value::Iterator(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

// ========== From implementations ==========

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Rc::from(v))
    }
}

impl From<Symbol> for Value {
    fn from(v: Symbol) -> Self {
        Value::Symbol(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(ArrayRef::new(v.into_iter().map(Into::into).collect()))
    }
}

impl From<ArrayRef> for Value {
    fn from(v: ArrayRef) -> Self {
        Value::Array(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

impl From<FunctionRef> for Value {
    fn from(v: FunctionRef) -> Self {
        Value::Function(v)
    }
}

impl From<InstanceRef> for Value {
    fn from(v: InstanceRef) -> Self {
        Value::Instance(v)
    }
}

impl From<IteratorRef> for Value {
    fn from(v: IteratorRef) -> Self {
        Value::Iterator(v)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

// ========== Display implementation ==========

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Number(v) => {
                if v.fract() == 0.0 && v.abs() < 1e21 {
                    write!(f, "{:.0}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::BigInt(v) => write!(f, "{}n", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Symbol(s) => write!(f, "Symbol({})", s.description().unwrap_or("")),
            Value::Array(array) => {
                for (i, v) in array.to_vec().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if !v.is_nullish() {
                        write!(f, "{}", v)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) | Value::Instance(_) => write!(f, "[object Object]"),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
            Value::Iterator(it) => write!(f, "[object {}]", it.class().name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_primitives() {
        assert!(matches!(Value::from(42), Value::Number(n) if n == 42.0));
        assert!(matches!(Value::from(true), Value::Bool(true)));
        assert!(matches!(Value::from("hello"), Value::String(_)));
        assert!(matches!(Value::from(()), Value::Undefined));
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::from(1.5).type_of(), "number");
        assert_eq!(Value::BigInt(3).type_of(), "bigint");
        assert_eq!(Value::from(Symbol::new(None)).type_of(), "symbol");
        assert_eq!(Value::from(vec![1, 2]).type_of(), "object");
    }

    #[test]
    fn test_same_value_uses_identity_for_heap_values() {
        let a = Value::from(vec![1]);
        let b = Value::from(vec![1]);
        assert!(a.same_value(&a.clone()));
        assert!(!a.same_value(&b));
        assert!(Value::from(f64::NAN).same_value(&Value::from(f64::NAN)));
    }

    #[test]
    fn test_iterate_rejects_numbers() {
        let err = Value::from(1).iterate().unwrap_err();
        assert_eq!(err, RuntimeError::not_iterable("number"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::from(42)), "42");
        assert_eq!(format!("{}", Value::from(2.5)), "2.5");
        assert_eq!(format!("{}", Value::from(vec![1, 2])), "1,2");
        assert_eq!(format!("{}", Value::BigInt(7)), "7n");
    }
}

//! typetrace runtime value model
//!
//! This crate provides the host values traced code operates on:
//!
//! - `Value` for dynamic typing
//! - plain objects and property-observing proxies
//! - arrays, functions, class instances, iterators and generators
//! - `RuntimeError` for error handling
//!
//! Every heap value carries a `HeapId` so identity tables can key by integer
//! and keep only weak references.

pub mod array;
pub mod class;
pub mod error;
pub mod function;
pub mod iter;
pub mod object;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use typetrace_runtime::prelude::*;
///
/// let point = ObjectRef::from_entries([("x", Value::from(1))]);
/// assert_eq!(point.get("x").as_number(), Some(1.0));
/// ```
pub mod prelude {
    pub use super::array::ArrayRef;
    pub use super::class::{ClassRef, InstanceRef, WeakClass};
    pub use super::error::{RuntimeError, RuntimeResult};
    pub use super::function::{CallInterceptor, FunctionKind, FunctionRef, WeakFunction};
    pub use super::iter::{HostIterator, IterStep, IteratorRef};
    pub use super::object::{ObjectRef, PropertyObserver, WeakObject};
    pub use super::value::{HeapId, Symbol, Value};
}

pub use prelude::*;

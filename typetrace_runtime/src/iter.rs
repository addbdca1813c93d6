//! Iterators and generator objects
//!
//! An iterator is a stateful [`HostIterator`] behind a shared handle. Each
//! iterator belongs to a builtin class (`Generator` for generator objects),
//! which is how the collector classifies it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::array::ArrayRef;
use crate::class::ClassRef;
use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{HeapId, Value};

/// One step of iteration
#[derive(Debug, Clone)]
pub enum IterStep {
    /// `{ value, done: false }`
    Yield(Value),
    /// `{ value, done: true }`; the generator's return value
    Done(Value),
}

impl IterStep {
    pub fn value(&self) -> &Value {
        match self {
            IterStep::Yield(v) | IterStep::Done(v) => v,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, IterStep::Done(_))
    }
}

/// Iteration protocol implemented by iterator sources
pub trait HostIterator {
    /// Advance, passing `sent` as the result of the paused `yield`
    fn next(&mut self, sent: Value) -> RuntimeResult<IterStep>;
}

struct FnIterator<F>(F);

impl<F> HostIterator for FnIterator<F>
where
    F: FnMut(Value) -> RuntimeResult<IterStep>,
{
    fn next(&mut self, sent: Value) -> RuntimeResult<IterStep> {
        (self.0)(sent)
    }
}

struct IteratorInner {
    id: HeapId,
    class: ClassRef,
    state: RefCell<Box<dyn HostIterator>>,
}

/// Handle to an iterator
#[derive(Clone)]
pub struct IteratorRef(Rc<IteratorInner>);

impl IteratorRef {
    pub fn new(class: ClassRef, source: Box<dyn HostIterator>) -> Self {
        IteratorRef(Rc::new(IteratorInner {
            id: HeapId::fresh(),
            class,
            state: RefCell::new(source),
        }))
    }

    /// Iterator of class `class` driven by a closure
    pub fn from_fn<F>(class: ClassRef, step: F) -> Self
    where
        F: FnMut(Value) -> RuntimeResult<IterStep> + 'static,
    {
        Self::new(class, Box::new(FnIterator(step)))
    }

    /// Generator object yielding `yields` in order, then returning `returns`
    pub fn generator(yields: Vec<Value>, returns: Value) -> Self {
        let mut pending = yields.into_iter();
        let mut returns = Some(returns);
        Self::from_fn(ClassRef::builtin("Generator"), move |_| {
            Ok(match pending.next() {
                Some(value) => IterStep::Yield(value),
                None => IterStep::Done(returns.take().unwrap_or(Value::Undefined)),
            })
        })
    }

    /// Live iterator over an array's elements
    pub fn over_array(array: ArrayRef) -> Self {
        let mut index = 0;
        Self::from_fn(ClassRef::builtin("Array Iterator"), move |_| {
            if index < array.len() {
                index += 1;
                Ok(IterStep::Yield(array.get(index - 1)))
            } else {
                Ok(IterStep::Done(Value::Undefined))
            }
        })
    }

    /// Iterator over a string's characters
    pub fn over_string(s: &str) -> Self {
        let mut chars: Vec<Value> = s.chars().map(|c| Value::from(c.to_string())).collect();
        chars.reverse();
        Self::from_fn(ClassRef::builtin("String Iterator"), move |_| {
            Ok(match chars.pop() {
                Some(c) => IterStep::Yield(c),
                None => IterStep::Done(Value::Undefined),
            })
        })
    }

    pub fn id(&self) -> HeapId {
        self.0.id
    }

    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    /// Advance the iterator. Re-entering an iterator from its own step is
    /// a type error, like a running generator.
    pub fn next(&self, sent: Value) -> RuntimeResult<IterStep> {
        let mut state = self
            .0
            .state
            .try_borrow_mut()
            .map_err(|_| RuntimeError::type_error("generator is already running"))?;
        state.next(sent)
    }

    /// Drain remaining yields; returns them with the completion value
    pub fn collect(&self) -> RuntimeResult<(Vec<Value>, Value)> {
        let mut yields = Vec::new();
        loop {
            match self.next(Value::Undefined)? {
                IterStep::Yield(v) => yields.push(v),
                IterStep::Done(v) => return Ok((yields, v)),
            }
        }
    }
}

impl fmt::Debug for IteratorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratorRef")
            .field("id", &self.0.id)
            .field("class", &self.0.class.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_yields_then_returns() {
        let it = IteratorRef::generator(vec![Value::from(1), Value::from(2)], Value::from("end"));
        let (yields, done) = it.collect().unwrap();
        assert_eq!(yields.len(), 2);
        assert_eq!(done.as_str(), Some("end"));
        assert!(it.next(Value::Undefined).unwrap().is_done());
        assert_eq!(it.class().name(), "Generator");
    }

    #[test]
    fn test_string_iterates_characters() {
        let (chars, _) = Value::from("ab").iterate().unwrap().collect().unwrap();
        let chars: Vec<_> = chars.iter().filter_map(|c| c.as_str().map(String::from)).collect();
        assert_eq!(chars, vec!["a", "b"]);
    }

    #[test]
    fn test_reentrant_step_is_an_error() {
        let slot: Rc<RefCell<Option<IteratorRef>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let it = IteratorRef::from_fn(ClassRef::builtin("Generator"), move |_| {
            let me = inner.borrow().clone();
            match me {
                Some(me) => me.next(Value::Undefined),
                None => Ok(IterStep::Done(Value::Undefined)),
            }
        });
        *slot.borrow_mut() = Some(it.clone());
        assert!(matches!(
            it.next(Value::Undefined),
            Err(RuntimeError::TypeError(_))
        ));
    }
}

//! Shared mutable arrays

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::{HeapId, Value};

struct ArrayInner {
    id: HeapId,
    items: RefCell<Vec<Value>>,
}

/// Handle to a shared array
///
/// Accessors copy values out instead of returning borrows, so no borrow is
/// held while callers run other code.
#[derive(Clone)]
pub struct ArrayRef(Rc<ArrayInner>);

impl ArrayRef {
    pub fn new(items: Vec<Value>) -> Self {
        ArrayRef(Rc::new(ArrayInner {
            id: HeapId::fresh(),
            items: RefCell::new(items),
        }))
    }

    pub fn id(&self) -> HeapId {
        self.0.id
    }

    pub fn len(&self) -> usize {
        self.0.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, `Undefined` past the end
    pub fn get(&self, index: usize) -> Value {
        self.0
            .items
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    /// Store at `index`, padding with `Undefined` as needed
    pub fn set(&self, index: usize, value: Value) {
        let mut items = self.0.items.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value;
    }

    pub fn push(&self, value: Value) {
        self.0.items.borrow_mut().push(value);
    }

    /// Snapshot of the current elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRef")
            .field("id", &self.0.id)
            .field("len", &self.len())
            .finish()
    }
}

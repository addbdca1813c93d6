//! Nominal classes and their instances
//!
//! Any object whose constructor is not the plain `Object` constructor is an
//! instance of a [`ClassRef`]. Builtin iterator classes (`Generator`,
//! `Array Iterator`, ...) are shared per thread so every iterator of one
//! kind reports the same class identity.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::value::{HeapId, Value};

struct ClassInner {
    id: HeapId,
    name: Rc<str>,
    builtin: bool,
}

/// Handle to a class (its constructor identity)
#[derive(Clone)]
pub struct ClassRef(Rc<ClassInner>);

/// Non-owning handle to a class
#[derive(Clone)]
pub struct WeakClass(Weak<ClassInner>);

thread_local! {
    static BUILTINS: RefCell<Vec<ClassRef>> = const { RefCell::new(Vec::new()) };
}

impl ClassRef {
    /// A user-defined class; anonymous classes have an empty name
    pub fn new(name: &str) -> Self {
        ClassRef(Rc::new(ClassInner {
            id: HeapId::fresh(),
            name: Rc::from(name),
            builtin: false,
        }))
    }

    /// The shared builtin class called `name`
    pub fn builtin(name: &str) -> Self {
        BUILTINS.with(|builtins| {
            let mut builtins = builtins.borrow_mut();
            if let Some(class) = builtins.iter().find(|c| c.name() == name) {
                return class.clone();
            }
            let class = ClassRef(Rc::new(ClassInner {
                id: HeapId::fresh(),
                name: Rc::from(name),
                builtin: true,
            }));
            builtins.push(class.clone());
            class
        })
    }

    pub fn id(&self) -> HeapId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Builtin classes have no source declaration
    pub fn is_builtin(&self) -> bool {
        self.0.builtin
    }

    /// Create an instance with the given own fields
    pub fn instantiate<K: AsRef<str>>(&self, fields: impl IntoIterator<Item = (K, Value)>) -> InstanceRef {
        InstanceRef(Rc::new(InstanceInner {
            id: HeapId::fresh(),
            class: self.clone(),
            fields: RefCell::new(
                fields
                    .into_iter()
                    .map(|(k, v)| (Rc::from(k.as_ref()), v))
                    .collect(),
            ),
        }))
    }

    pub fn downgrade(&self) -> WeakClass {
        WeakClass(Rc::downgrade(&self.0))
    }
}

impl WeakClass {
    pub fn upgrade(&self) -> Option<ClassRef> {
        self.0.upgrade().map(ClassRef)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

struct InstanceInner {
    id: HeapId,
    class: ClassRef,
    fields: RefCell<Vec<(Rc<str>, Value)>>,
}

/// Handle to a class instance
#[derive(Clone)]
pub struct InstanceRef(Rc<InstanceInner>);

impl InstanceRef {
    pub fn id(&self) -> HeapId {
        self.0.id
    }

    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    pub fn get(&self, key: &str) -> Value {
        self.0
            .fields
            .borrow()
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Undefined)
    }

    pub fn set(&self, key: &str, value: Value) {
        let mut fields = self.0.fields.borrow_mut();
        match fields.iter_mut().find(|(k, _)| &**k == key) {
            Some(slot) => slot.1 = value,
            None => fields.push((Rc::from(key), value)),
        }
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .finish()
    }
}

impl fmt::Debug for WeakClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakClass")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl fmt::Debug for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRef")
            .field("id", &self.0.id)
            .field("class", &self.0.class.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classes_are_shared() {
        let a = ClassRef::builtin("Generator");
        let b = ClassRef::builtin("Generator");
        assert_eq!(a.id(), b.id());
        assert!(a.is_builtin());
        assert_ne!(ClassRef::new("Generator").id(), a.id());
    }

    #[test]
    fn test_instance_fields() {
        let point = ClassRef::new("Point");
        let p = point.instantiate([("x", Value::from(1))]);
        p.set("y", Value::from(2));
        assert_eq!(p.get("y").as_number(), Some(2.0));
        assert_eq!(p.class().name(), "Point");
    }
}

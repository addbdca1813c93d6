//! Plain objects and property-observing proxies
//!
//! A plain object stores its own properties in insertion order. A proxy
//! forwards every access to a target object and reports writes to a
//! [`PropertyObserver`] before they land.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::RuntimeResult;
use crate::value::{HeapId, Value};

/// Observer notified of writes made through a proxy
pub trait PropertyObserver {
    /// Called before `value` is stored under `key` on `target`
    fn on_set(&self, target: &ObjectRef, key: &str, value: &Value) -> RuntimeResult<()>;
}

enum ObjectRepr {
    Plain(RefCell<Vec<(Rc<str>, Value)>>),
    Proxy {
        target: ObjectRef,
        observer: Rc<dyn PropertyObserver>,
    },
}

struct ObjectInner {
    id: HeapId,
    repr: ObjectRepr,
}

/// Handle to a plain object or a proxy around one
#[derive(Clone)]
pub struct ObjectRef(Rc<ObjectInner>);

/// Non-owning handle to an object
#[derive(Clone)]
pub struct WeakObject(Weak<ObjectInner>);

impl ObjectRef {
    /// An empty plain object
    pub fn new() -> Self {
        Self::from_entries(std::iter::empty::<(&str, Value)>())
    }

    /// A plain object with the given properties, in order
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut props: Vec<(Rc<str>, Value)> = Vec::new();
        for (key, value) in entries {
            let key = key.as_ref();
            match props.iter_mut().find(|(k, _)| &**k == key) {
                Some(slot) => slot.1 = value,
                None => props.push((Rc::from(key), value)),
            }
        }
        ObjectRef(Rc::new(ObjectInner {
            id: HeapId::fresh(),
            repr: ObjectRepr::Plain(RefCell::new(props)),
        }))
    }

    /// A proxy forwarding to `target` and reporting writes to `observer`
    pub fn proxy(target: &ObjectRef, observer: Rc<dyn PropertyObserver>) -> Self {
        ObjectRef(Rc::new(ObjectInner {
            id: HeapId::fresh(),
            repr: ObjectRepr::Proxy {
                target: target.clone(),
                observer,
            },
        }))
    }

    /// Identity of this handle (a proxy has its own)
    pub fn id(&self) -> HeapId {
        self.0.id
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self.0.repr, ObjectRepr::Proxy { .. })
    }

    /// The plain object behind any number of proxies
    pub fn target(&self) -> ObjectRef {
        let mut current = self.clone();
        loop {
            let next = match &current.0.repr {
                ObjectRepr::Plain(_) => return current,
                ObjectRepr::Proxy { target, .. } => target.clone(),
            };
            current = next;
        }
    }

    /// Observer of the outermost proxy layer
    pub fn observer(&self) -> Option<Rc<dyn PropertyObserver>> {
        match &self.0.repr {
            ObjectRepr::Plain(_) => None,
            ObjectRepr::Proxy { observer, .. } => Some(observer.clone()),
        }
    }

    /// Property value, `Undefined` when absent
    pub fn get(&self, key: &str) -> Value {
        match &self.0.repr {
            ObjectRepr::Plain(props) => props
                .borrow()
                .iter()
                .find(|(k, _)| &**k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Undefined),
            ObjectRepr::Proxy { target, .. } => target.get(key),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        match &self.0.repr {
            ObjectRepr::Plain(props) => props.borrow().iter().any(|(k, _)| &**k == key),
            ObjectRepr::Proxy { target, .. } => target.has(key),
        }
    }

    /// Store a property. Writes through a proxy notify its observer first;
    /// an observer error aborts the write.
    pub fn set(&self, key: &str, value: Value) -> RuntimeResult<()> {
        match &self.0.repr {
            ObjectRepr::Plain(props) => {
                let mut props = props.borrow_mut();
                match props.iter_mut().find(|(k, _)| &**k == key) {
                    Some(slot) => slot.1 = value,
                    None => props.push((Rc::from(key), value)),
                }
                Ok(())
            }
            ObjectRepr::Proxy { target, observer } => {
                observer.on_set(target, key, &value)?;
                target.set(key, value)
            }
        }
    }

    /// Own property names in insertion order
    pub fn keys(&self) -> Vec<Rc<str>> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }

    /// Snapshot of own properties in insertion order
    pub fn entries(&self) -> Vec<(Rc<str>, Value)> {
        match &self.0.repr {
            ObjectRepr::Plain(props) => props.borrow().clone(),
            ObjectRepr::Proxy { target, .. } => target.entries(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.0.repr {
            ObjectRepr::Plain(props) => props.borrow().len(),
            ObjectRepr::Proxy { target, .. } => target.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn downgrade(&self) -> WeakObject {
        WeakObject(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl WeakObject {
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.repr {
            ObjectRepr::Plain(props) => f
                .debug_struct("ObjectRef")
                .field("id", &self.0.id)
                .field(
                    "keys",
                    &props.borrow().iter().map(|(k, _)| k.clone()).collect::<Vec<_>>(),
                )
                .finish(),
            ObjectRepr::Proxy { target, .. } => f
                .debug_struct("ObjectRef")
                .field("id", &self.0.id)
                .field("proxy_of", &target.id())
                .finish(),
        }
    }
}

impl fmt::Debug for WeakObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObject")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl PropertyObserver for Recorder {
        fn on_set(&self, _target: &ObjectRef, key: &str, value: &Value) -> RuntimeResult<()> {
            self.0.borrow_mut().push(format!("{}={}", key, value));
            Ok(())
        }
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let obj = ObjectRef::from_entries([("b", Value::from(1)), ("a", Value::from(2))]);
        obj.set("c", Value::from(3)).unwrap();
        obj.set("b", Value::from(4)).unwrap();
        let keys: Vec<String> = obj.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(obj.get("b").as_number(), Some(4.0));
    }

    #[test]
    fn test_proxy_reports_writes_and_forwards() {
        let target = ObjectRef::from_entries([("a", Value::from(1))]);
        let recorder = Rc::new(Recorder::default());
        let proxy = ObjectRef::proxy(&target, recorder.clone());

        assert_eq!(proxy.get("a").as_number(), Some(1.0));
        proxy.set("b", Value::from("x")).unwrap();

        assert_eq!(target.get("b").as_str(), Some("x"));
        assert_eq!(*recorder.0.borrow(), vec!["b=x".to_string()]);
        assert!(proxy.target().ptr_eq(&target));
        assert_ne!(proxy.id(), target.id());
    }

    #[test]
    fn test_weak_handle_tracks_liveness() {
        let obj = ObjectRef::new();
        let weak = obj.downgrade();
        assert!(weak.is_alive());
        drop(obj);
        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
    }
}

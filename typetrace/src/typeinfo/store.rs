//! Shape arena and identity tables
//!
//! The store assigns durable identities to runtime values on first sight:
//! one shape node per object, one [`FunctionId`] per unwrapped function and
//! one [`ClassId`] per constructor. Tables key by [`HeapId`] and hold weak
//! handles only, so traced values are never kept alive by the collector.

use std::collections::{HashMap, HashSet};

use tracing::trace;
use typetrace_runtime::{
    ClassRef, FunctionRef, HeapId, ObjectRef, Value, WeakClass, WeakFunction, WeakObject,
};

use super::combine::combine_types;
use super::types::{ClassId, ClassInfo, FunctionId, FunctionInfo, PrimitiveKind, Shape, ShapeId, TypeInfo};
use crate::locate::{LocateTarget, Location, TargetKey};

/// Counts of identity entries released by [`TypeStore::sweep`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub objects: usize,
    pub functions: usize,
    pub classes: usize,
}

#[derive(Debug, Default)]
pub struct TypeStore {
    shapes: Vec<Shape>,
    objects: HashMap<HeapId, (WeakObject, ShapeId)>,
    functions: HashMap<HeapId, (WeakFunction, FunctionId)>,
    function_info: Vec<FunctionInfo>,
    classes: HashMap<HeapId, (WeakClass, ClassId)>,
    class_info: Vec<ClassInfo>,
    /// First sightings waiting for location resolution
    pending: Vec<(TargetKey, LocateTarget)>,
}

/// Per-computation state: nodes already entered during this computation
#[derive(Default)]
struct Visit {
    objects: HashMap<HeapId, ShapeId>,
    arrays: HashSet<HeapId>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Shapes ====================

    pub fn shape(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.0]
    }

    pub(crate) fn shape_mut(&mut self, id: ShapeId) -> &mut Shape {
        &mut self.shapes[id.0]
    }

    /// Allocate a detached shape node
    pub fn alloc_shape(&mut self, shape: Shape) -> ShapeId {
        self.shapes.push(shape);
        ShapeId(self.shapes.len() - 1)
    }

    /// Durable shape of an object, if it has been observed
    pub fn shape_of(&self, object: &ObjectRef) -> Option<ShapeId> {
        self.objects.get(&object.target().id()).map(|(_, s)| *s)
    }

    /// Fold a write into a shape: the new type is unioned with the previous
    /// field type, or with `undefined` when the field was not seen before.
    pub fn fold_field(&mut self, shape: ShapeId, key: &str, ty: TypeInfo) {
        let previous = self
            .shape(shape)
            .field(key)
            .cloned()
            .unwrap_or(TypeInfo::UNDEFINED);
        let combined = combine_types(self, vec![ty, previous]);
        self.shape_mut(shape).set_field(key, combined);
    }

    // ==================== Identities ====================

    /// Identity of a function, looking through every wrapper
    pub fn function_id(&mut self, function: &FunctionRef) -> FunctionId {
        let original = function.original();
        if let Some((_, id)) = self.functions.get(&original.id()) {
            return *id;
        }
        let id = FunctionId(self.function_info.len() as u32);
        self.function_info.push(FunctionInfo {
            name: original.name().into(),
            is_generator: original.is_generator(),
            location: None,
        });
        self.functions
            .insert(original.id(), (original.downgrade(), id));
        self.pending
            .push((TargetKey::Function(id), LocateTarget::Function(original)));
        trace!(function = %id, "new function identity");
        id
    }

    /// Identity already assigned to a function, without creating one
    pub fn known_function_id(&self, function: &FunctionRef) -> Option<FunctionId> {
        self.functions
            .get(&function.original().id())
            .map(|(_, id)| *id)
    }

    pub fn function_info(&self, id: FunctionId) -> &FunctionInfo {
        &self.function_info[id.0 as usize]
    }

    pub fn class_id(&mut self, class: &ClassRef) -> ClassId {
        if let Some((_, id)) = self.classes.get(&class.id()) {
            return *id;
        }
        let id = ClassId(self.class_info.len() as u32);
        self.class_info.push(ClassInfo {
            name: class.name().into(),
            builtin: class.is_builtin(),
            location: None,
        });
        self.classes.insert(class.id(), (class.downgrade(), id));
        if !class.is_builtin() {
            self.pending
                .push((TargetKey::Class(id), LocateTarget::Class(class.clone())));
        }
        id
    }

    pub fn class_info(&self, id: ClassId) -> &ClassInfo {
        &self.class_info[id.0 as usize]
    }

    /// Take the first sightings queued since the last call
    pub(crate) fn take_pending(&mut self) -> Vec<(TargetKey, LocateTarget)> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn set_location(&mut self, key: TargetKey, location: Option<Location>) {
        match key {
            TargetKey::Function(id) => self.function_info[id.0 as usize].location = location,
            TargetKey::Class(id) => self.class_info[id.0 as usize].location = location,
        }
    }

    /// Release identity entries whose values have been dropped. Shapes and
    /// infos stay, since recorded TypeInfos still point at them.
    pub fn sweep(&mut self) -> SweepStats {
        let (objects, functions, classes) =
            (self.objects.len(), self.functions.len(), self.classes.len());
        self.objects.retain(|_, (weak, _)| weak.is_alive());
        self.functions.retain(|_, (weak, _)| weak.is_alive());
        self.classes.retain(|_, (weak, _)| weak.is_alive());
        SweepStats {
            objects: objects - self.objects.len(),
            functions: functions - self.functions.len(),
            classes: classes - self.classes.len(),
        }
    }

    /// Whether the function behind `id` is still alive
    pub fn function_alive(&self, id: FunctionId) -> bool {
        self.functions.values().any(|(weak, fid)| *fid == id && weak.is_alive())
    }

    // ==================== Classification ====================

    /// Compute the TypeInfo of a runtime value
    pub fn compute_typeinfo(&mut self, value: &Value) -> TypeInfo {
        let mut visit = Visit::default();
        self.compute(value, &mut visit)
    }

    fn compute(&mut self, value: &Value, visit: &mut Visit) -> TypeInfo {
        match value {
            Value::Undefined => TypeInfo::Primitive(PrimitiveKind::Undefined),
            Value::Null => TypeInfo::Primitive(PrimitiveKind::Null),
            Value::Bool(_) => TypeInfo::Primitive(PrimitiveKind::Boolean),
            Value::Number(_) => TypeInfo::Primitive(PrimitiveKind::Number),
            Value::BigInt(_) => TypeInfo::Primitive(PrimitiveKind::BigInt),
            Value::String(_) => TypeInfo::Primitive(PrimitiveKind::String),
            Value::Symbol(_) => TypeInfo::Primitive(PrimitiveKind::Symbol),
            Value::Function(f) => TypeInfo::Function(self.function_id(f)),
            Value::Instance(instance) => TypeInfo::Class(self.class_id(instance.class())),
            Value::Iterator(it) => TypeInfo::Class(self.class_id(it.class())),
            Value::Array(array) => {
                // An array nested in itself contributes no element types
                if !visit.arrays.insert(array.id()) {
                    return TypeInfo::Array(Vec::new());
                }
                let elems = array
                    .to_vec()
                    .iter()
                    .map(|v| self.compute(v, visit))
                    .collect();
                visit.arrays.remove(&array.id());
                TypeInfo::Array(elems)
            }
            Value::Object(object) => self.compute_object(object, visit),
        }
    }

    fn compute_object(&mut self, object: &ObjectRef, visit: &mut Visit) -> TypeInfo {
        let target = object.target();
        let id = target.id();
        if let Some(shape) = visit.objects.get(&id) {
            return TypeInfo::Object(*shape);
        }

        match self.objects.get(&id).map(|(_, s)| *s) {
            Some(shape) => {
                // Repeated observation: fold current fields into the node
                visit.objects.insert(id, shape);
                for (key, value) in target.entries() {
                    let ty = self.compute(&value, visit);
                    self.fold_field(shape, &key, ty);
                }
                TypeInfo::Object(shape)
            }
            None => {
                let shape = self.alloc_shape(Shape::default());
                self.objects.insert(id, (target.downgrade(), shape));
                visit.objects.insert(id, shape);
                let fields = target
                    .entries()
                    .into_iter()
                    .map(|(key, value)| {
                        let ty = self.compute(&value, visit);
                        (key, ty)
                    })
                    .collect();
                self.shape_mut(shape).fields = fields;
                TypeInfo::Object(shape)
            }
        }
    }
}

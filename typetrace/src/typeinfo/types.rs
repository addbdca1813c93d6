//! TypeInfo variants and the handles they point through

use std::fmt;
use std::rc::Rc;

use crate::locate::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Undefined,
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Undefined => "undefined",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Number => "number",
            PrimitiveKind::BigInt => "bigint",
            PrimitiveKind::String => "string",
            PrimitiveKind::Symbol => "symbol",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a node of the shape arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) usize);

/// Durable identity of a function value, shared by all of its wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) u32);

/// Durable identity of a class (constructor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural description of an observed value
///
/// `Object` points into the shape arena of a
/// [`TypeStore`](super::TypeStore), so object graphs may be cyclic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    Primitive(PrimitiveKind),
    /// One entry per observed element
    Array(Vec<TypeInfo>),
    Object(ShapeId),
    Function(FunctionId),
    Class(ClassId),
    /// Deduplicated members, never containing another union
    Union(Vec<TypeInfo>),
}

impl TypeInfo {
    pub const UNDEFINED: TypeInfo = TypeInfo::Primitive(PrimitiveKind::Undefined);

    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeInfo::Primitive(kind)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, TypeInfo::Primitive(PrimitiveKind::Undefined))
    }

    /// Whether `undefined` is one of the possible values
    pub fn includes_undefined(&self) -> bool {
        match self {
            TypeInfo::Union(members) => members.iter().any(TypeInfo::is_undefined),
            other => other.is_undefined(),
        }
    }

    /// Members of a union, or the type itself
    pub fn members(&self) -> &[TypeInfo] {
        match self {
            TypeInfo::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }
}

/// Ordered fields of an object node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub fields: Vec<(Rc<str>, TypeInfo)>,
}

impl Shape {
    pub fn field(&self, key: &str) -> Option<&TypeInfo> {
        self.fields
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, t)| t)
    }

    pub fn set_field(&mut self, key: &str, ty: TypeInfo) {
        match self.fields.iter_mut().find(|(k, _)| &**k == key) {
            Some(slot) => slot.1 = ty,
            None => self.fields.push((Rc::from(key), ty)),
        }
    }
}

/// What the store knows about a function identity
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: Rc<str>,
    pub is_generator: bool,
    pub location: Option<Location>,
}

/// Nominal class: its name and, once resolved, declaration location
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: Rc<str>,
    pub builtin: bool,
    pub location: Option<Location>,
}

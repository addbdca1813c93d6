//! Canonical signatures
//!
//! A signature is a deterministic string form of a TypeInfo used for
//! equality and deduplication. Object graphs may be cyclic, so
//! serialization runs in two passes: the first marks every shape reachable
//! through more than one path, the second emits `<ref *i>{...}` on the first
//! visit of a marked shape and `<Circular *i>` afterwards.

use std::collections::{HashMap, HashSet};

use super::store::TypeStore;
use super::types::{ShapeId, TypeInfo};

/// Canonical signature of one TypeInfo
pub fn signature(store: &TypeStore, ty: &TypeInfo) -> String {
    let mut marker = Marker::default();
    marker.visit(store, ty);
    let mut writer = Writer {
        store,
        shared: marker.shared,
        numbered: HashMap::new(),
        out: String::new(),
    };
    writer.write(ty);
    writer.out
}

/// Signature of a call record: `[<args>],[<yields>],<return>`
///
/// Every slot is serialized on its own, so reference numbering restarts
/// per slot.
pub fn record_signature(
    store: &TypeStore,
    args: &[TypeInfo],
    yields: &[TypeInfo],
    returns: &TypeInfo,
) -> String {
    let join = |types: &[TypeInfo]| {
        types
            .iter()
            .map(|t| signature(store, t))
            .collect::<Vec<_>>()
            .join(",")
    };
    format!("[{}],[{}],{}", join(args), join(yields), signature(store, returns))
}

/// Array elements equal by value are visited once
fn distinct(elems: &[TypeInfo]) -> Vec<&TypeInfo> {
    let mut out: Vec<&TypeInfo> = Vec::with_capacity(elems.len());
    for elem in elems {
        if !out.contains(&elem) {
            out.push(elem);
        }
    }
    out
}

// ==================== First pass ====================

#[derive(Default)]
struct Marker {
    seen: HashSet<ShapeId>,
    shared: HashSet<ShapeId>,
}

impl Marker {
    fn visit(&mut self, store: &TypeStore, ty: &TypeInfo) {
        match ty {
            TypeInfo::Object(id) => {
                if !self.seen.insert(*id) {
                    self.shared.insert(*id);
                    return;
                }
                for (_, field) in &store.shape(*id).fields {
                    self.visit(store, field);
                }
            }
            TypeInfo::Array(elems) => {
                for elem in distinct(elems) {
                    self.visit(store, elem);
                }
            }
            TypeInfo::Union(members) => {
                for member in members {
                    self.visit(store, member);
                }
            }
            TypeInfo::Primitive(_) | TypeInfo::Function(_) | TypeInfo::Class(_) => {}
        }
    }
}

// ==================== Second pass ====================

struct Writer<'a> {
    store: &'a TypeStore,
    shared: HashSet<ShapeId>,
    numbered: HashMap<ShapeId, usize>,
    out: String,
}

impl Writer<'_> {
    fn write(&mut self, ty: &TypeInfo) {
        match ty {
            TypeInfo::Primitive(kind) => self.out.push_str(kind.as_str()),
            TypeInfo::Function(id) => {
                self.out.push_str("fn#");
                self.out.push_str(&id.to_string());
            }
            TypeInfo::Class(id) => {
                let info = self.store.class_info(*id);
                self.out.push_str(&info.name);
                self.out.push('#');
                self.out.push_str(&id.to_string());
            }
            TypeInfo::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.out.push('|');
                    }
                    self.write(member);
                }
            }
            TypeInfo::Array(elems) => self.write_array(elems),
            TypeInfo::Object(id) => self.write_object(*id),
        }
    }

    fn write_array(&mut self, elems: &[TypeInfo]) {
        let mut sigs: Vec<String> = Vec::new();
        for elem in distinct(elems) {
            let start = self.out.len();
            self.write(elem);
            let sig = self.out.split_off(start);
            if !sigs.contains(&sig) {
                sigs.push(sig);
            }
        }
        match sigs.len() {
            0 => self.out.push_str("[]"),
            1 => {
                self.out.push_str(&sigs[0]);
                self.out.push_str("[]");
            }
            _ => {
                self.out.push('(');
                self.out.push_str(&sigs.join("|"));
                self.out.push_str(")[]");
            }
        }
    }

    fn write_object(&mut self, id: ShapeId) {
        if self.shared.contains(&id) {
            if let Some(n) = self.numbered.get(&id) {
                self.out.push_str(&format!("<Circular *{n}>"));
                return;
            }
            let n = self.numbered.len();
            self.numbered.insert(id, n);
            self.out.push_str(&format!("<ref *{n}>"));
        }
        let store = self.store;
        self.out.push('{');
        for (i, (key, field)) in store.shape(id).fields.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push_str(key);
            self.out.push(':');
            self.write(field);
        }
        self.out.push('}');
    }
}

//! Trace sets and their aliases
//!
//! A trace set can be reached by declaration location, by function
//! identity, or both. Sets merged after the fact leave a forwarding slot
//! behind so every alias keeps resolving to the survivor.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::record::{CallRecord, TraceSet};
use crate::location::SourceLocation;
use crate::typeinfo::{FunctionId, ShapeId, TraceLookup, TypeInfo, TypeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SetId(usize);

#[derive(Debug)]
enum Slot {
    Live(TraceSet),
    Forwarded(SetId),
    Released,
}

#[derive(Debug, Default)]
pub struct TraceTable {
    slots: Vec<Slot>,
    by_location: BTreeMap<SourceLocation, SetId>,
    by_function: HashMap<FunctionId, SetId>,
}

impl TraceTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, mut id: SetId) -> SetId {
        while let Slot::Forwarded(next) = self.slots[id.0] {
            id = next;
        }
        id
    }

    fn alloc(&mut self) -> SetId {
        self.slots.push(Slot::Live(TraceSet::new()));
        SetId(self.slots.len() - 1)
    }

    fn set(&self, id: SetId) -> Option<&TraceSet> {
        match &self.slots[self.resolve(id).0] {
            Slot::Live(set) => Some(set),
            Slot::Forwarded(_) | Slot::Released => None,
        }
    }

    fn set_mut(&mut self, id: SetId) -> Option<&mut TraceSet> {
        let id = self.resolve(id);
        match &mut self.slots[id.0] {
            Slot::Live(set) => Some(set),
            Slot::Forwarded(_) | Slot::Released => None,
        }
    }

    // ==================== Lookup ====================

    pub fn for_location(&self, location: &SourceLocation) -> Option<&TraceSet> {
        self.by_location.get(location).and_then(|id| self.set(*id))
    }

    pub fn for_function(&self, function: FunctionId) -> Option<&TraceSet> {
        self.by_function.get(&function).and_then(|id| self.set(*id))
    }

    /// Locations with a trace set, in module/offset order
    pub fn locations(&self) -> impl Iterator<Item = &SourceLocation> {
        self.by_location.keys()
    }

    /// Whether a location and a function currently share one set
    pub fn aliased(&self, location: &SourceLocation, function: FunctionId) -> bool {
        match (self.by_location.get(location), self.by_function.get(&function)) {
            (Some(l), Some(f)) => self.resolve(*l) == self.resolve(*f),
            _ => false,
        }
    }

    // ==================== Binding ====================

    /// Set owned by a function identity, created on first sighting
    pub(crate) fn function_set(&mut self, function: FunctionId) -> SetId {
        if let Some(id) = self.by_function.get(&function) {
            return self.resolve(*id);
        }
        let id = self.alloc();
        self.by_function.insert(function, id);
        debug!(function = %function, "trace set created for function");
        id
    }

    fn location_set(&mut self, location: &SourceLocation) -> SetId {
        if let Some(id) = self.by_location.get(location) {
            return self.resolve(*id);
        }
        let id = self.alloc();
        self.by_location.insert(location.clone(), id);
        debug!(location = %location, "trace set created for location");
        id
    }

    /// Resolve the set a declaration's exit hook records into. With a self
    /// reference, the location and the function converge on one set; when
    /// both already own different sets the location set survives.
    pub(crate) fn bind(&mut self, location: &SourceLocation, function: Option<FunctionId>) -> SetId {
        let Some(function) = function else {
            return self.location_set(location);
        };
        let by_location = self.by_location.get(location).map(|id| self.resolve(*id));
        let by_function = self.by_function.get(&function).map(|id| self.resolve(*id));
        match (by_location, by_function) {
            (None, None) => {
                let id = self.location_set(location);
                self.by_function.insert(function, id);
                id
            }
            (Some(id), None) => {
                self.by_function.insert(function, id);
                id
            }
            (None, Some(id)) => {
                self.by_location.insert(location.clone(), id);
                id
            }
            (Some(survivor), Some(other)) if survivor == other => survivor,
            (Some(survivor), Some(other)) => {
                self.merge(survivor, other);
                debug!(location = %location, function = %function, "trace sets merged");
                survivor
            }
        }
    }

    fn merge(&mut self, survivor: SetId, other: SetId) {
        let taken = std::mem::replace(&mut self.slots[other.0], Slot::Forwarded(survivor));
        if let (Slot::Live(records), Some(set)) = (taken, self.set_mut(survivor)) {
            set.absorb(records);
        }
    }

    /// Insert into a set; false for duplicates
    pub(crate) fn insert(&mut self, id: SetId, store: &TypeStore, record: CallRecord) -> bool {
        match self.set_mut(id) {
            Some(set) => set.add(store, record),
            None => false,
        }
    }

    // ==================== Sweeping ====================

    /// Drop function aliases whose function is gone and whose set cannot be
    /// reached from any location. Returns the number of sets released.
    pub(crate) fn sweep(&mut self, store: &TypeStore) -> usize {
        let mut reachable: HashSet<SetId> = HashSet::new();
        let mut functions: HashSet<FunctionId> = HashSet::new();
        let mut queue: Vec<SetId> = self.by_location.values().map(|id| self.resolve(*id)).collect();
        while let Some(id) = queue.pop() {
            if !reachable.insert(id) {
                continue;
            }
            let Some(set) = self.set(id) else { continue };
            let mut found = HashSet::new();
            for record in set.records() {
                for ty in record.args.iter().chain(&record.yields).chain([&record.returns]) {
                    functions_in(store, ty, &mut found, &mut HashSet::new());
                }
            }
            for function in found {
                if functions.insert(function) {
                    if let Some(next) = self.by_function.get(&function) {
                        queue.push(self.resolve(*next));
                    }
                }
            }
        }

        self.by_function
            .retain(|function, _| functions.contains(function) || store.function_alive(*function));

        let mut referenced: HashSet<SetId> = reachable;
        for id in self.by_function.values() {
            referenced.insert(self.resolve(*id));
        }
        let mut released = 0;
        for index in 0..self.slots.len() {
            let id = SetId(index);
            if matches!(self.slots[index], Slot::Live(_)) && !referenced.contains(&id) {
                self.slots[index] = Slot::Released;
                released += 1;
            }
        }
        released
    }
}

impl TraceLookup for TraceTable {
    fn function_records(&self, id: FunctionId) -> Option<Vec<CallRecord>> {
        self.for_function(id).map(|set| set.records().to_vec())
    }
}

fn functions_in(
    store: &TypeStore,
    ty: &TypeInfo,
    found: &mut HashSet<FunctionId>,
    shapes: &mut HashSet<ShapeId>,
) {
    match ty {
        TypeInfo::Function(id) => {
            found.insert(*id);
        }
        TypeInfo::Array(members) | TypeInfo::Union(members) => {
            for member in members {
                functions_in(store, member, found, shapes);
            }
        }
        TypeInfo::Object(shape) => {
            if shapes.insert(*shape) {
                for (_, field) in &store.shape(*shape).fields {
                    functions_in(store, field, found, shapes);
                }
            }
        }
        TypeInfo::Primitive(_) | TypeInfo::Class(_) => {}
    }
}

//! Unification of observations
//!
//! `combine_types` folds several observations of one slot into a single
//! TypeInfo. Objects merge into one shape; every other member, arrays
//! included, is kept once per distinct signature. Unions are never nested.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::signature::signature;
use super::store::TypeStore;
use super::types::{Shape, ShapeId, TypeInfo};
use crate::trace::CallRecord;

/// Shapes already merged during one top-level combination, keyed by the
/// sorted ids of their inputs
type MergeMemo = HashMap<Vec<ShapeId>, ShapeId>;

/// Combine observations of one slot
pub fn combine_types(store: &mut TypeStore, types: Vec<TypeInfo>) -> TypeInfo {
    let mut memo = MergeMemo::new();
    combine_with(store, types, &mut memo)
}

fn combine_with(store: &mut TypeStore, types: Vec<TypeInfo>, memo: &mut MergeMemo) -> TypeInfo {
    let Some(first) = types.first() else {
        return TypeInfo::UNDEFINED;
    };
    let first_sig = signature(store, first);
    if types[1..].iter().all(|t| signature(store, t) == first_sig) {
        return types.into_iter().next().unwrap_or(TypeInfo::UNDEFINED);
    }

    let mut members: Vec<TypeInfo> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut objects: Vec<ShapeId> = Vec::new();
    let mut object_slot = None;

    for ty in &types {
        for member in ty.members() {
            if !seen.insert(signature(store, member)) {
                continue;
            }
            match member {
                TypeInfo::Object(id) => {
                    if objects.is_empty() {
                        object_slot = Some(members.len());
                        members.push(member.clone());
                    }
                    objects.push(*id);
                }
                other => members.push(other.clone()),
            }
        }
    }

    if objects.len() > 1 {
        if let Some(slot) = object_slot {
            members[slot] = TypeInfo::Object(merge_shapes(store, objects, memo));
        }
    }

    if members.len() == 1 {
        members.pop().unwrap_or(TypeInfo::UNDEFINED)
    } else {
        TypeInfo::Union(members)
    }
}

/// Merge several shapes into a new one. Fields missing from any input get
/// `undefined` unioned in.
fn merge_shapes(store: &mut TypeStore, mut ids: Vec<ShapeId>, memo: &mut MergeMemo) -> ShapeId {
    ids.sort();
    ids.dedup();
    if let Some(merged) = memo.get(&ids) {
        return *merged;
    }
    let merged = store.alloc_shape(Shape::default());
    memo.insert(ids.clone(), merged);

    let mut names: Vec<Rc<str>> = Vec::new();
    for id in &ids {
        for (key, _) in &store.shape(*id).fields {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let mut fields = Vec::with_capacity(names.len());
    for name in names {
        let observed: Vec<TypeInfo> = ids
            .iter()
            .map(|id| {
                store
                    .shape(*id)
                    .field(&name)
                    .cloned()
                    .unwrap_or(TypeInfo::UNDEFINED)
            })
            .collect();
        let ty = combine_with(store, observed, memo);
        fields.push((name, ty));
    }
    store.shape_mut(merged).fields = fields;
    merged
}

/// Produce one representative record from a trace set
pub fn combine_traces(store: &mut TypeStore, records: &[CallRecord]) -> CallRecord {
    let arity = records.iter().map(|r| r.args.len()).max().unwrap_or(0);
    let args = (0..arity)
        .map(|i| {
            let slot = records
                .iter()
                .map(|r| r.args.get(i).cloned().unwrap_or(TypeInfo::UNDEFINED))
                .collect();
            combine_types(store, slot)
        })
        .collect();

    // Records that never yielded contribute nothing to the element type
    let yielded: Vec<TypeInfo> = records.iter().flat_map(|r| r.yields.iter().cloned()).collect();
    let yields = if yielded.is_empty() {
        Vec::new()
    } else {
        vec![combine_types(store, yielded)]
    };

    let returns = combine_types(store, records.iter().map(|r| r.returns.clone()).collect());
    CallRecord {
        args,
        yields,
        returns,
    }
}

//! Structural type representation and unification.
//!
//! Every value observed by the collector is classified into a [`TypeInfo`].
//! Object graphs live in the shape arena of a [`TypeStore`] so they may be
//! cyclic; functions and classes are referenced by durable identities.
//!
//! # Module Organization
//!
//! - `types.rs`: TypeInfo, PrimitiveKind, shape nodes and identity handles
//! - `store.rs`: TypeStore, the shape arena and weak identity tables
//! - `signature.rs`: canonical signatures, cycle-safe via `<ref *i>` numbering
//! - `combine.rs`: combine_types, shape merging and combine_traces
//! - `render.rs`: annotation text and InferredSignature

mod combine;
mod render;
mod signature;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use combine::{combine_traces, combine_types};
pub use render::{InferredSignature, NoTraces, Renderer, TraceLookup};
pub use signature::{record_signature, signature};
pub use store::{SweepStats, TypeStore};
pub use types::{ClassId, ClassInfo, FunctionId, FunctionInfo, PrimitiveKind, Shape, ShapeId, TypeInfo};

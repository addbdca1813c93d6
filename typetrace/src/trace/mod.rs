//! Runtime trace collection.
//!
//! # Module Organization
//!
//! - `record.rs`: CallId, CallRecord and the deduplicated TraceSet
//! - `identity.rs`: TraceTable, location and function aliases of trace sets
//! - `collector.rs`: the Collector service and its four hooks
//! - `wrap.rs`: tracing wrappers for functions, generators and objects

mod collector;
mod identity;
mod record;
mod wrap;


pub use collector::{Collector, SweepSummary};
pub use identity::TraceTable;
pub use record::{CallId, CallRecord, TraceSet};

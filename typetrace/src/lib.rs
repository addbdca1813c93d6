//! typetrace
//!
//! Runtime type inference for JavaScript modules. Modules are rewritten so
//! every function call reports its arguments, yields and return value to a
//! [`Collector`]; repeated observations are merged per declaration site
//! into structural [`TypeInfo`] descriptions and rendered as signatures.
//!
//! # Example
//!
//! ```
//! let out = typetrace::instrument("const id = x => x;", "id.js").unwrap();
//! assert!(out.contains("globalThis.__typetrace.enter(\"id.js:11\""));
//! ```

// Libraries never print; hosts install a tracing subscriber.
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

pub mod config;
pub mod error;
pub mod instrument;
pub mod locate;
pub mod location;
pub mod pipeline;
pub mod report;
pub mod trace;
pub mod typeinfo;

// Re-exports
pub use config::{Config, OutputMode};
pub use error::{TraceError, TraceResult};
pub use instrument::{instrument, Instrumenter};
pub use locate::{
    LocateTarget, Location, LocationResolver, NoLocations, StaticLocations, TargetKey,
};
pub use location::SourceLocation;
pub use pipeline::Session;
pub use report::{ModuleReport, Report, ReportEntry};
pub use trace::{CallId, CallRecord, Collector, SweepSummary, TraceSet};
pub use typeinfo::{InferredSignature, TypeInfo, TypeStore};

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

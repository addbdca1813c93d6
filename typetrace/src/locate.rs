//! Declaration locations of runtime functions and classes
//!
//! Looking up where a live function was declared is an external,
//! asynchronous service. The collector queues one lookup per first-seen
//! function or class and drains them before final state is read.

use std::collections::HashMap;
use std::fmt;

use futures::future::{self, FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};
use typetrace_runtime::{ClassRef, FunctionRef};

use crate::typeinfo::{ClassId, FunctionId};

/// A resolved declaration position (1-based line and column)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Runtime value whose declaration is being looked up
#[derive(Debug, Clone)]
pub enum LocateTarget {
    Function(FunctionRef),
    Class(ClassRef),
}

impl LocateTarget {
    pub fn name(&self) -> &str {
        match self {
            LocateTarget::Function(f) => f.name(),
            LocateTarget::Class(c) => c.name(),
        }
    }
}

/// Store entry receiving a resolved location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Function(FunctionId),
    Class(ClassId),
}

pub trait LocationResolver {
    /// Resolve the declaration of `target`; `None` when it cannot be found
    fn locate(&self, target: LocateTarget) -> LocalBoxFuture<'static, Option<Location>>;
}

/// Resolver that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocations;

impl LocationResolver for NoLocations {
    fn locate(&self, _target: LocateTarget) -> LocalBoxFuture<'static, Option<Location>> {
        future::ready(None).boxed_local()
    }
}

/// Resolver answering from a fixed table keyed by function or class name
#[derive(Debug, Clone, Default)]
pub struct StaticLocations {
    by_name: HashMap<String, Location>,
}

impl StaticLocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, location: Location) -> Self {
        self.by_name.insert(name.to_string(), location);
        self
    }
}

impl LocationResolver for StaticLocations {
    fn locate(&self, target: LocateTarget) -> LocalBoxFuture<'static, Option<Location>> {
        future::ready(self.by_name.get(target.name()).cloned()).boxed_local()
    }
}

//! Completed calls and their deduplicated sets

use std::collections::HashSet;
use std::fmt;

use crate::typeinfo::{record_signature, TypeInfo, TypeStore};

/// Id of one in-flight invocation; never reused within a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(pub(crate) u64);

impl CallId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Argument, yield and return types of one completed invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub args: Vec<TypeInfo>,
    pub yields: Vec<TypeInfo>,
    pub returns: TypeInfo,
}

impl CallRecord {
    pub fn new(args: Vec<TypeInfo>) -> Self {
        Self {
            args,
            yields: Vec::new(),
            returns: TypeInfo::UNDEFINED,
        }
    }

    pub fn signature(&self, store: &TypeStore) -> String {
        record_signature(store, &self.args, &self.yields, &self.returns)
    }
}

/// Records deduplicated by signature, in insertion order
///
/// Signatures are taken when a record is added; later folds into the
/// shapes it points at do not re-key it.
#[derive(Debug, Clone, Default)]
pub struct TraceSet {
    records: Vec<CallRecord>,
    keys: Vec<String>,
    signatures: HashSet<String>,
}

impl TraceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record; returns false when an equal record is present
    pub fn add(&mut self, store: &TypeStore, record: CallRecord) -> bool {
        let key = record.signature(store);
        self.add_keyed(key, record)
    }

    fn add_keyed(&mut self, key: String, record: CallRecord) -> bool {
        if !self.signatures.insert(key.clone()) {
            return false;
        }
        self.keys.push(key);
        self.records.push(record);
        true
    }

    pub fn contains(&self, store: &TypeStore, record: &CallRecord) -> bool {
        self.signatures.contains(&record.signature(store))
    }

    /// Move every record of `other` in, skipping duplicates
    pub(crate) fn absorb(&mut self, other: TraceSet) {
        for (key, record) in other.keys.into_iter().zip(other.records) {
            self.add_keyed(key, record);
        }
    }

    /// Signatures in insertion order
    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

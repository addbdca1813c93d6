//! The trace collector service
//!
//! Instrumented code reaches the collector through four hooks: `enter`,
//! `exit`, `yield_value` and `delegate_yield`. Hooks are synchronous and
//! fully re-entrant: no internal borrow is held while user code runs, so
//! calls may nest or interleave in any order.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::{debug, trace};
use typetrace_runtime::{
    FunctionRef, HostIterator, IterStep, IteratorRef, ObjectRef, RuntimeResult, Value,
};

use super::identity::TraceTable;
use super::record::{CallId, CallRecord, TraceSet};
use super::wrap::wrap;
use crate::config::Config;
use crate::error::{TraceError, TraceResult};
use crate::locate::{Location, LocationResolver, NoLocations, TargetKey};
use crate::location::SourceLocation;
use crate::typeinfo::{FunctionId, InferredSignature, Renderer, SweepStats, TypeInfo, TypeStore};

/// Who a call context records into
#[derive(Debug, Clone)]
pub(crate) enum Owner {
    Location(SourceLocation),
    Function(FunctionId),
}

#[derive(Debug)]
struct CallContext {
    owner: Owner,
    record: CallRecord,
}

#[derive(Debug, Default)]
struct State {
    store: TypeStore,
    traces: TraceTable,
    inflight: HashMap<CallId, CallContext>,
    next_call: u64,
}

type Lookup = LocalBoxFuture<'static, (TargetKey, Option<Location>)>;

pub(crate) struct Inner {
    state: RefCell<State>,
    skip: Vec<String>,
    resolver: Rc<dyn LocationResolver>,
    lookups: RefCell<Vec<Lookup>>,
}

/// What [`Collector::sweep`] released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub identities: SweepStats,
    pub trace_sets: usize,
}

/// Handle to the runtime trace collector; clones share state
#[derive(Clone)]
pub struct Collector(Rc<Inner>);

impl Default for Collector {
    fn default() -> Self {
        Self::new(Vec::new(), Rc::new(NoLocations))
    }
}

impl Collector {
    /// Collector skipping modules whose path contains any of `skip`
    pub fn new(skip: Vec<String>, resolver: Rc<dyn LocationResolver>) -> Self {
        Collector(Rc::new(Inner {
            state: RefCell::new(State::default()),
            skip,
            resolver,
            lookups: RefCell::new(Vec::new()),
        }))
    }

    pub fn with_config(config: &Config, resolver: Rc<dyn LocationResolver>) -> Self {
        Self::new(config.skip.clone(), resolver)
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_inner(inner: Rc<Inner>) -> Self {
        Collector(inner)
    }

    pub fn is_skipped(&self, module: &str) -> bool {
        self.0.skip.iter().any(|s| !s.is_empty() && module.contains(s.as_str()))
    }

    // ==================== Hooks ====================

    /// Entry hook: open a call context for the declaration at `key`
    ///
    /// Returns the call id (`None` for skipped modules) and the arguments
    /// to bind, wrapped where they are functions or plain objects.
    pub fn enter(&self, key: &str, args: Vec<Value>) -> TraceResult<(Option<CallId>, Vec<Value>)> {
        let location = SourceLocation::parse(key)
            .ok_or_else(|| TraceError::invariant(key, "malformed location key"))?;
        if self.is_skipped(&location.module) {
            return Ok((None, args));
        }
        trace!(location = %location, "enter");
        let (id, args) = self.open_call(Owner::Location(location), args);
        Ok((Some(id), args))
    }

    /// Exit hook: record the return value and commit the call
    pub fn exit(&self, call: Option<CallId>, self_ref: &Value, value: Value) -> TraceResult<Value> {
        let Some(id) = call else {
            return Ok(value);
        };
        trace!(call = %id, "exit");
        let ty = {
            let mut state = self.0.state.borrow_mut();
            let state = &mut *state;
            let Some(mut context) = state.inflight.remove(&id) else {
                // A `return` inside `finally` exits a call a second time
                if id.0 <= state.next_call {
                    trace!(call = %id, "exit after commit");
                    return Ok(value);
                }
                return Err(TraceError::UnknownCall(id));
            };
            let ty = state.store.compute_typeinfo(&value);
            context.record.returns = ty.clone();
            let set = match &context.owner {
                Owner::Location(location) => {
                    let function = self_ref.as_function().map(|f| state.store.function_id(f));
                    state.traces.bind(location, function)
                }
                Owner::Function(function) => state.traces.function_set(*function),
            };
            state.traces.insert(set, &state.store, context.record);
            ty
        };
        self.queue_lookups();
        Ok(wrap(self, value, &ty))
    }

    /// Yield hook: record one yielded value
    pub fn yield_value(&self, call: Option<CallId>, value: Value) -> TraceResult<Value> {
        let Some(id) = call else {
            return Ok(value);
        };
        trace!(call = %id, "yield");
        let ty = {
            let mut state = self.0.state.borrow_mut();
            let state = &mut *state;
            let ty = state.store.compute_typeinfo(&value);
            let context = state.inflight.get_mut(&id).ok_or(TraceError::UnknownCall(id))?;
            context.record.yields.push(ty.clone());
            ty
        };
        self.queue_lookups();
        Ok(wrap(self, value, &ty))
    }

    /// Delegated-yield hook: an iterator forwarding to `iterable` that
    /// records every element as a yield and its completion as the return
    pub fn delegate_yield(&self, call: Option<CallId>, iterable: &Value) -> TraceResult<IteratorRef> {
        let inner = iterable.iterate()?;
        let Some(id) = call else {
            return Ok(inner);
        };
        if !self.0.state.borrow().inflight.contains_key(&id) {
            return Err(TraceError::UnknownCall(id));
        }
        trace!(call = %id, "delegate yield");
        let class = inner.class().clone();
        Ok(IteratorRef::new(
            class,
            Box::new(Delegate {
                collector: self.downgrade(),
                call: id,
                inner,
            }),
        ))
    }

    // ==================== Call contexts ====================

    pub(crate) fn open_call(&self, owner: Owner, args: Vec<Value>) -> (CallId, Vec<Value>) {
        let (id, types) = {
            let mut state = self.0.state.borrow_mut();
            let types: Vec<TypeInfo> = args.iter().map(|a| state.store.compute_typeinfo(a)).collect();
            state.next_call += 1;
            let id = CallId(state.next_call);
            state.inflight.insert(
                id,
                CallContext {
                    owner,
                    record: CallRecord::new(types.clone()),
                },
            );
            (id, types)
        };
        self.queue_lookups();
        let args = args
            .into_iter()
            .zip(&types)
            .map(|(arg, ty)| wrap(self, arg, ty))
            .collect();
        (id, args)
    }

    /// Drop a context whose call failed
    pub(crate) fn abandon(&self, call: CallId) {
        self.0.state.borrow_mut().inflight.remove(&call);
    }

    /// Record a completion value as the return slot without committing
    fn set_return_slot(&self, call: CallId, value: &Value) -> TraceResult<TypeInfo> {
        let mut state = self.0.state.borrow_mut();
        let state = &mut *state;
        let ty = state.store.compute_typeinfo(value);
        let context = state.inflight.get_mut(&call).ok_or(TraceError::UnknownCall(call))?;
        context.record.returns = ty.clone();
        Ok(ty)
    }

    /// Calls entered but not yet exited
    pub fn in_flight(&self) -> usize {
        self.0.state.borrow().inflight.len()
    }

    // ==================== Identities ====================

    pub(crate) fn ensure_function_set(&self, function: FunctionId) {
        self.0.state.borrow_mut().traces.function_set(function);
    }

    /// Fold a property write into the written object's shape
    pub(crate) fn observe_write(&self, target: &ObjectRef, key: &str, value: &Value) {
        {
            let mut state = self.0.state.borrow_mut();
            let ty = state.store.compute_typeinfo(value);
            let shape = match state.store.shape_of(target) {
                Some(shape) => Some(shape),
                None => match state.store.compute_typeinfo(&Value::from(target.clone())) {
                    TypeInfo::Object(shape) => Some(shape),
                    _ => None,
                },
            };
            if let Some(shape) = shape {
                state.store.fold_field(shape, key, ty);
            }
        }
        self.queue_lookups();
    }

    pub fn function_id(&self, function: &FunctionRef) -> FunctionId {
        let id = self.0.state.borrow_mut().store.function_id(function);
        self.queue_lookups();
        id
    }

    // ==================== Location resolution ====================

    fn queue_lookups(&self) {
        let pending = self.0.state.borrow_mut().store.take_pending();
        if pending.is_empty() {
            return;
        }
        let futures: Vec<Lookup> = pending
            .into_iter()
            .map(|(key, target)| self.0.resolver.locate(target).map(move |loc| (key, loc)).boxed_local())
            .collect();
        self.0.lookups.borrow_mut().extend(futures);
    }

    /// Number of location lookups not yet drained
    pub fn pending_lookups(&self) -> usize {
        self.0.lookups.borrow().len()
    }

    /// Resolve queued locations, giving up after `timeout`. Lookups still
    /// pending then are dropped and their targets keep no location.
    /// Returns the number of lookups that completed.
    pub async fn drain_locations(&self, timeout: Duration) -> usize {
        let queued = std::mem::take(&mut *self.0.lookups.borrow_mut());
        let total = queued.len();
        let mut lookups: FuturesUnordered<Lookup> = queued.into_iter().collect();
        let resolved = Cell::new(0);
        let drain = async {
            while let Some((key, location)) = lookups.next().await {
                self.0.state.borrow_mut().store.set_location(key, location);
                resolved.set(resolved.get() + 1);
            }
        };
        match tokio::time::timeout(timeout, drain).await {
            Ok(()) => debug!(resolved = resolved.get(), "location lookups drained"),
            Err(_) => debug!(
                resolved = resolved.get(),
                dropped = total - resolved.get(),
                "location lookups timed out"
            ),
        }
        resolved.get()
    }

    // ==================== Reading ====================

    /// Trace set recorded for a declaration location
    pub fn trace(&self, location: &SourceLocation) -> Option<TraceSet> {
        self.0.state.borrow().traces.for_location(location).cloned()
    }

    /// Trace set recorded for a function value, through any wrapper
    pub fn function_trace(&self, function: &FunctionRef) -> Option<TraceSet> {
        let state = self.0.state.borrow();
        let id = state.store.known_function_id(function)?;
        state.traces.for_function(id).cloned()
    }

    /// Whether a location's set and a function's set have converged
    pub fn shares_trace(&self, location: &SourceLocation, function: &FunctionRef) -> bool {
        let state = self.0.state.borrow();
        match state.store.known_function_id(function) {
            Some(id) => state.traces.aliased(location, id),
            None => false,
        }
    }

    /// Inferred signature for a declaration location
    pub fn signature(&self, location: &SourceLocation) -> TraceResult<Option<InferredSignature>> {
        let mut state = self.0.state.borrow_mut();
        let State { store, traces, .. } = &mut *state;
        let Some(records) = traces.for_location(location).map(|set| set.records().to_vec()) else {
            return Ok(None);
        };
        Renderer::new(store, &*traces).signature(&records).map(Some)
    }

    /// Canonical signatures of a location's records, in insertion order
    pub fn record_signatures(&self, location: &SourceLocation) -> Vec<String> {
        self.0
            .state
            .borrow()
            .traces
            .for_location(location)
            .map(|set| set.signatures().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Resolved declaration location of a function, after draining
    pub fn function_location(&self, function: &FunctionRef) -> Option<Location> {
        let state = self.0.state.borrow();
        let id = state.store.known_function_id(function)?;
        state.store.function_info(id).location.clone()
    }

    /// Traced locations in module/offset order
    pub fn locations(&self) -> Vec<SourceLocation> {
        self.0.state.borrow().traces.locations().cloned().collect()
    }

    /// Release identity entries of dropped values
    pub fn sweep(&self) -> SweepSummary {
        let mut state = self.0.state.borrow_mut();
        let state = &mut *state;
        let identities = state.store.sweep();
        let trace_sets = state.traces.sweep(&state.store);
        debug!(
            objects = identities.objects,
            functions = identities.functions,
            classes = identities.classes,
            trace_sets,
            "swept identity tables"
        );
        SweepSummary {
            identities,
            trace_sets,
        }
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.state.try_borrow();
        let mut d = f.debug_struct("Collector");
        d.field("skip", &self.0.skip);
        if let Ok(state) = state {
            d.field("in_flight", &state.inflight.len())
                .field("locations", &state.traces.locations().count());
        }
        d.field("pending_lookups", &self.0.lookups.borrow().len()).finish()
    }
}

// ==================== Delegated iteration ====================

struct Delegate {
    collector: Weak<Inner>,
    call: CallId,
    inner: IteratorRef,
}

impl HostIterator for Delegate {
    fn next(&mut self, sent: Value) -> RuntimeResult<IterStep> {
        let step = self.inner.next(sent)?;
        let Some(inner) = self.collector.upgrade() else {
            return Ok(step);
        };
        let collector = Collector::from_inner(inner);
        Ok(match step {
            IterStep::Yield(value) => IterStep::Yield(collector.yield_value(Some(self.call), value)?),
            IterStep::Done(value) => {
                let ty = collector.set_return_slot(self.call, &value)?;
                IterStep::Done(wrap(&collector, value, &ty))
            }
        })
    }
}

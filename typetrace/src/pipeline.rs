//! Session pipeline
//!
//! Ties the instrumenter and the collector together:
//! module source → instrument → (host runs the module against the hooks)
//! → drain locations → report.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::Config;
use crate::error::TraceResult;
use crate::instrument::Instrumenter;
use crate::locate::LocationResolver;
use crate::report::Report;
use crate::trace::Collector;

/// One profiling run over a set of modules
pub struct Session {
    config: Config,
    instrumenter: Instrumenter,
    collector: Collector,
    modules: Vec<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(config: Config, resolver: Rc<dyn LocationResolver>) -> TraceResult<Self> {
        let instrumenter = Instrumenter::from_config(&config)?;
        let collector = Collector::with_config(&config, resolver);
        Ok(Self {
            config,
            instrumenter,
            collector,
            modules: Vec::new(),
        })
    }

    /// Session configured from the environment
    pub fn from_env(resolver: Rc<dyn LocationResolver>) -> TraceResult<Self> {
        Self::new(Config::from_env()?, resolver)
    }

    /// Instrument a module and remember it for the report. Returns the
    /// rewritten source for the host to run.
    pub fn load_module(&mut self, source: &str, path: &str) -> TraceResult<String> {
        let rewritten = self.instrumenter.instrument(source, path)?;
        if !self.modules.iter().any(|m| m == path) {
            self.modules.push(path.to_string());
        }
        Ok(rewritten)
    }

    /// Hook service the instrumented modules call into
    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Drain pending location lookups and read the final state
    pub async fn finish(self) -> TraceResult<Report> {
        let resolved = self
            .collector
            .drain_locations(self.config.resolve_timeout())
            .await;
        let in_flight = self.collector.in_flight();
        debug!(
            modules = self.modules.len(),
            resolved, in_flight, "session finished"
        );
        Report::collect(&self.collector, &self.modules)
    }
}

//! End-of-session report of inferred signatures

use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use crate::config::OutputMode;
use crate::error::{TraceError, TraceResult};
use crate::location::SourceLocation;
use crate::trace::Collector;

/// One traced declaration and what was inferred for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub location: SourceLocation,
    pub signature: String,
    /// Distinct call records observed
    pub calls: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub entries: Vec<ReportEntry>,
}

/// Inferred signatures for every loaded module, in load order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub modules: Vec<ModuleReport>,
}

impl Report {
    /// Read the collector's final state for `modules`
    pub fn collect(collector: &Collector, modules: &[String]) -> TraceResult<Self> {
        let locations = collector.locations();
        let mut report = Report::default();
        for module in modules {
            let mut entries = Vec::new();
            for location in locations.iter().filter(|l| &*l.module == module.as_str()) {
                let signature = match collector.signature(location) {
                    Ok(Some(signature)) => signature.to_string(),
                    Ok(None) => continue,
                    // One unrenderable declaration must not hide the others
                    Err(error @ TraceError::NotImplemented(_)) => {
                        warn!(location = %location, "{error}");
                        format!("<{error}>")
                    }
                    Err(error) => return Err(error),
                };
                let calls = collector.trace(location).map_or(0, |set| set.len());
                entries.push(ReportEntry {
                    location: location.clone(),
                    signature,
                    calls,
                });
            }
            report.modules.push(ModuleReport {
                module: module.clone(),
                entries,
            });
        }
        Ok(report)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.iter().all(|m| m.entries.is_empty())
    }

    /// Render for `mode`. Only printing is supported.
    pub fn render(&self, mode: OutputMode) -> TraceResult<String> {
        match mode {
            OutputMode::Print => Ok(self.print()),
            other => Err(TraceError::not_implemented(format!("{other} output"))),
        }
    }

    fn print(&self) -> String {
        let mut out = String::new();
        for module in &self.modules {
            let _ = writeln!(out, "{}", module.module);
            for entry in &module.entries {
                let _ = writeln!(out, "{} {}", entry.location, entry.signature);
            }
            out.push_str("---\n");
        }
        out
    }

    pub fn to_json(&self) -> TraceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

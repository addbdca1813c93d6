//! Session configuration
//!
//! Read from a TOML file (`TYPETRACE_CONFIG`) with environment overrides:
//!
//! ```toml
//! output = "print"
//! hooks = "globalThis.__typetrace"
//! skip = ["node_modules"]
//! resolve_timeout_ms = 2000
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TraceError, TraceResult};

pub const CONFIG_ENV: &str = "TYPETRACE_CONFIG";
pub const OUTPUT_ENV: &str = "TYPETRACE_OUTPUT";
pub const DEFAULT_HOOKS: &str = "globalThis.__typetrace";

/// What to do with inferred signatures once the session finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Print,
    Diff,
    Write,
    Copy,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Print => "print",
            OutputMode::Diff => "diff",
            OutputMode::Write => "write",
            OutputMode::Copy => "copy",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "print" => Ok(OutputMode::Print),
            "diff" => Ok(OutputMode::Diff),
            "write" => Ok(OutputMode::Write),
            "copy" => Ok(OutputMode::Copy),
            other => Err(TraceError::config(format!("unknown output mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputMode,
    /// Expression the instrumented code reaches the hooks through
    pub hooks: String,
    /// Module path substrings whose functions are not profiled
    pub skip: Vec<String>,
    pub resolve_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputMode::Print,
            hooks: DEFAULT_HOOKS.to_string(),
            skip: vec!["node_modules".to_string()],
            resolve_timeout_ms: 2000,
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> TraceResult<Self> {
        toml::from_str(source).map_err(|e| TraceError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> TraceResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
            .map_err(|e| TraceError::config(format!("{}: {}", path.display(), e)))
    }

    /// Configuration from `TYPETRACE_CONFIG` and `TYPETRACE_OUTPUT`
    pub fn from_env() -> TraceResult<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with variables looked up through `var`
    pub fn from_vars<F>(var: F) -> TraceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match var(CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(output) = var(OUTPUT_ENV).filter(|o| !o.trim().is_empty()) {
            config.output = output.parse()?;
        }
        Ok(config)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output, OutputMode::Print);
        assert_eq!(config.hooks, DEFAULT_HOOKS);
        assert_eq!(config.skip, vec!["node_modules"]);
        assert_eq!(config.resolve_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("output = \"diff\"\nskip = []\n").unwrap();
        assert_eq!(config.output, OutputMode::Diff);
        assert!(config.skip.is_empty());
        assert_eq!(config.resolve_timeout_ms, 2000);
    }

    #[test]
    fn test_unknown_keys_and_modes_are_errors() {
        assert!(matches!(
            Config::from_toml_str("colour = true"),
            Err(TraceError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("output = \"email\""),
            Err(TraceError::Config(_))
        ));
        assert!(matches!("email".parse::<OutputMode>(), Err(TraceError::Config(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output = \"write\"\nresolve_timeout_ms = 50").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = Config::from_vars(|name| match name {
            CONFIG_ENV => Some(path.clone()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.output, OutputMode::Write);
        assert_eq!(config.resolve_timeout_ms, 50);

        let config = Config::from_vars(|name| match name {
            CONFIG_ENV => Some(path.clone()),
            OUTPUT_ENV => Some("Copy".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.output, OutputMode::Copy);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let err = Config::from_vars(|name| {
            (name == CONFIG_ENV).then(|| "/nonexistent/typetrace.toml".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
    }
}

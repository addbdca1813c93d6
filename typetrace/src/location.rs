//! Declaration-site keys

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TraceError;

/// `(module path, offset)` of a function-like declaration
///
/// The textual form `<module>:<offset>` is what instrumented code passes to
/// the entry hook. Ordering is by module path, then offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub module: Rc<str>,
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(module: &str, offset: usize) -> Self {
        Self {
            module: Rc::from(module),
            offset,
        }
    }

    /// Parse `<module>:<offset>`, splitting at the last colon so module
    /// paths may contain colons themselves
    pub fn parse(key: &str) -> Option<Self> {
        let (module, offset) = key.rsplit_once(':')?;
        let offset = offset.parse().ok()?;
        Some(Self::new(module, offset))
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.offset)
    }
}

impl FromStr for SourceLocation {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TraceError::config(format!("invalid location key '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_at_last_colon() {
        let loc = SourceLocation::parse("file:///src/a.js:42").unwrap();
        assert_eq!(&*loc.module, "file:///src/a.js");
        assert_eq!(loc.offset, 42);
        assert_eq!(loc.to_string(), "file:///src/a.js:42");
    }

    #[test]
    fn test_parse_rejects_missing_offset() {
        assert!(SourceLocation::parse("a.js").is_none());
        assert!(SourceLocation::parse("a.js:x").is_none());
        assert!("a.js".parse::<SourceLocation>().is_err());
    }

    #[test]
    fn test_ordering_is_module_then_offset() {
        let mut locs = vec![
            SourceLocation::new("b.js", 1),
            SourceLocation::new("a.js", 30),
            SourceLocation::new("a.js", 4),
        ];
        locs.sort();
        let keys: Vec<_> = locs.iter().map(SourceLocation::key).collect();
        assert_eq!(keys, vec!["a.js:4", "a.js:30", "b.js:1"]);
    }
}

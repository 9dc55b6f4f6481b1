//! Extract referenced method names from consumer source text

use crate::{AnalyzerError, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// Dotted access on an `operations` member, e.g. `personsConfig.operations.list`
pub const DEFAULT_USAGE_PATTERN: &str = r"\boperations\.([A-Za-z_$][A-Za-z0-9_$]*)";

/// A compiled usage pattern whose single capture group is the method name
#[derive(Debug, Clone)]
pub struct UsagePattern {
    regex: Regex,
}

impl UsagePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() != 2 {
            return Err(AnalyzerError::PatternGroups(pattern.to_string()));
        }
        Ok(Self { regex })
    }

    /// Every distinct method name referenced in `source`
    pub fn extract(&self, source: &str) -> BTreeSet<String> {
        self.regex
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

//! Scan consumer source files for registry usage

use crate::{usage_pattern::UsagePattern, Result, DEFAULT_USAGE_PATTERN};
use opreg_common::{CompilerError, ServiceDefinition, UsageSource};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Source extensions considered by [`SourceScanner::unclaimed_sources`]
const SOURCE_EXTENSIONS: &[&str] = &["ts", "mts", "js", "mjs", "rs"];

/// Reads each service's consumer file from a directory
///
/// A service without a declared consumer file uses nothing. A declared file
/// that does not exist is an error, so a renamed consumer cannot silently
/// disable the check.
pub struct SourceScanner {
    root: PathBuf,
    pattern: UsagePattern,
}

impl SourceScanner {
    /// Scanner over `root` using [`DEFAULT_USAGE_PATTERN`]
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_pattern(root, DEFAULT_USAGE_PATTERN)
    }

    /// Scanner over `root` with a custom single-group usage pattern
    pub fn with_pattern(root: impl Into<PathBuf>, pattern: &str) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            pattern: UsagePattern::new(pattern)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern(&self) -> &UsagePattern {
        &self.pattern
    }

    /// Source files under the root that no service declares as its consumer
    pub fn unclaimed_sources(&self, services: &[ServiceDefinition]) -> Result<Vec<PathBuf>> {
        let claimed: BTreeSet<PathBuf> = services
            .iter()
            .filter_map(|s| s.consumer.as_ref())
            .map(|c| self.root.join(c))
            .collect();

        let mut unclaimed = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let is_source = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
            if is_source && !claimed.contains(path) {
                unclaimed.push(path.to_path_buf());
            }
        }

        Ok(unclaimed)
    }
}

impl UsageSource for SourceScanner {
    fn usage(&self, service: &ServiceDefinition) -> opreg_common::Result<BTreeSet<String>> {
        let Some(consumer) = service.consumer.as_deref() else {
            return Ok(BTreeSet::new());
        };

        let path = self.root.join(consumer);
        let source = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CompilerError::ConsumerMissing {
                service: service.name.clone(),
                path: path.display().to_string(),
            },
            _ => CompilerError::Io(e),
        })?;

        let used = self.pattern.extract(&source);
        debug!(
            service = %service.name,
            file = %path.display(),
            methods = used.len(),
            "scanned consumer"
        );
        Ok(used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_usage_reads_declared_consumer() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "persons.ts",
            "personsConfig.operations.list; personsConfig.operations.listFollowers;",
        );

        let scanner = SourceScanner::new(dir.path()).unwrap();
        let persons = ServiceDefinition::new("persons", "/persons").with_consumer("persons.ts");

        let used = scanner.usage(&persons).unwrap();
        assert!(used.contains("list"));
        assert!(used.contains("listFollowers"));
        assert_eq!(used.len(), 2);
    }

    #[test]
    fn test_service_without_consumer_uses_nothing() {
        let dir = TempDir::new().unwrap();
        let scanner = SourceScanner::new(dir.path()).unwrap();

        let used = scanner
            .usage(&ServiceDefinition::new("notes", "/notes"))
            .unwrap();
        assert!(used.is_empty());
    }

    #[test]
    fn test_missing_consumer_is_an_error() {
        let dir = TempDir::new().unwrap();
        let scanner = SourceScanner::new(dir.path()).unwrap();
        let deals = ServiceDefinition::new("deals", "/deals").with_consumer("deals.ts");

        match scanner.usage(&deals).unwrap_err() {
            CompilerError::ConsumerMissing { service, path } => {
                assert_eq!(service, "deals");
                assert!(path.ends_with("deals.ts"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unclaimed_sources() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "persons.ts", "");
        write(dir.path(), "leads.ts", "");
        write(dir.path(), "nested/helpers.ts", "");
        write(dir.path(), "README.md", "");

        let scanner = SourceScanner::new(dir.path()).unwrap();
        let services =
            vec![ServiceDefinition::new("persons", "/persons").with_consumer("persons.ts")];

        let unclaimed = scanner.unclaimed_sources(&services).unwrap();
        let names: Vec<String> = unclaimed
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["leads.ts", "nested/helpers.ts"]);
    }
}

//! Consumer analyzer for the opreg registry compiler
//!
//! Reads the hand-written service classes that consume the generated
//! registry and extracts the method names they reference, so the compiler
//! can fail when the registry drifts away from its consumers.
//!
//! # Examples
//!
//! ```no_run
//! use opreg_analyzer::SourceScanner;
//! use opreg_common::{ServiceDefinition, UsageSource};
//!
//! let scanner = SourceScanner::new("./src/services").expect("valid pattern");
//! let persons = ServiceDefinition::new("persons", "/persons").with_consumer("persons.ts");
//! let used = scanner.usage(&persons).expect("scan failed");
//!
//! println!("persons uses {} methods", used.len());
//! ```

mod scanner;
mod usage_pattern;

pub use scanner::SourceScanner;
pub use usage_pattern::{UsagePattern, DEFAULT_USAGE_PATTERN};

use opreg_common::CompilerError;
use thiserror::Error;

/// Errors that can occur during consumer analysis
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Failed to read consumer directory: {0}")]
    DirectoryRead(#[from] std::io::Error),

    #[error("Failed to walk consumer directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid usage pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Usage pattern '{0}' must have exactly one capture group")]
    PatternGroups(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

impl From<AnalyzerError> for CompilerError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::DirectoryRead(e) => CompilerError::Io(e),
            other => CompilerError::Parse(other.to_string()),
        }
    }
}

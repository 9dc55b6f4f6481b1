//! Common types and utilities for the opreg registry compiler
//!
//! This crate contains the intermediate representation shared by the
//! parser, registry, analyzer, generator, and CLI components, together with
//! the error taxonomy every stage reports through.

mod registry;
mod usage;

pub use registry::{OperationEntry, Registry, ServiceState};
pub use usage::{StaticUsage, UsageSource};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of unmapped operation ids quoted in a coverage error
pub const UNMAPPED_SAMPLE_SIZE: usize = 10;

/// Errors that can occur while compiling the operation registry
#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error(
        "Operation '{operation_id}' was matched to service '{service}' by prefix '{prefix}' but does not start with '{prefix}_'"
    )]
    PrefixMismatch {
        operation_id: String,
        prefix: String,
        service: String,
    },

    #[error("Operation '{operation_id}' has an empty method suffix after prefix '{prefix}_' (service '{service}')")]
    EmptySuffix {
        operation_id: String,
        prefix: String,
        service: String,
    },

    #[error(
        "Operation '{operation_id}' path '{path}' is outside base path '{base_path}' of service '{service}' and has no path override"
    )]
    PathOutsideBase {
        operation_id: String,
        path: String,
        service: String,
        base_path: String,
    },

    #[error(
        "Duplicate method '{method}' in service '{service}' (base path '{base_path}'): '{existing}' and '{operation_id}' resolve to the same name"
    )]
    DuplicateMethod {
        method: String,
        service: String,
        base_path: String,
        existing: String,
        operation_id: String,
    },

    #[error("{count} operation(s) could not be mapped to a service: {}", .sample.join(", "))]
    Unmapped { count: usize, sample: Vec<String> },

    #[error("Service '{service}' consumer references methods missing from the registry: {}", .missing.join(", "))]
    ConsumerDrift {
        service: String,
        missing: Vec<String>,
    },

    #[error("Consumer file for service '{service}' not found: {path}")]
    ConsumerMissing { service: String, path: String },

    #[error("Validation failed:\n{}", format_all(.0))]
    Validation(Vec<CompilerError>),

    #[error("Generated file {0} is out of date; run `opreg generate` to refresh it")]
    Stale(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_all(errors: &[CompilerError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompilerError>;

/// HTTP verbs that carry public operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// All recognized verbs, in emission order
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = CompilerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(CompilerError::Parse(format!(
                "Unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

/// One (path, verb) endpoint of the API description that carries an operation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub operation_id: String,
    pub http_method: HttpMethod,
    pub absolute_path: String,
}

impl OperationDescriptor {
    pub fn new(
        operation_id: impl Into<String>,
        http_method: HttpMethod,
        absolute_path: impl Into<String>,
    ) -> Self {
        Self {
            operation_id: operation_id.into(),
            http_method,
            absolute_path: absolute_path.into(),
        }
    }
}

/// A logical resource group of the API, as authored in the service catalog
///
/// Catalog order is significant: resolution scans definitions in declared
/// order and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Service name (e.g., "persons")
    pub name: String,

    /// Path segment shared by every endpoint of the service (e.g., "/persons")
    pub base_path: String,

    /// Operation id prefixes owned by this service
    #[serde(default)]
    pub prefixes: Vec<String>,

    /// Operation ids owned by this service regardless of prefix
    #[serde(default, rename = "operation_ids")]
    pub explicit_operation_ids: Vec<String>,

    /// Hand-written consumer source file, relative to the consumer directory
    #[serde(default)]
    pub consumer: Option<String>,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_path: base_path.into(),
            prefixes: Vec::new(),
            explicit_operation_ids: Vec::new(),
            consumer: None,
        }
    }

    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn with_operation_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit_operation_ids
            .extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_consumer(mut self, file: impl Into<String>) -> Self {
        self.consumer = Some(file.into());
        self
    }

    pub fn owns_prefix(&self, prefix: &str) -> bool {
        self.prefixes.iter().any(|p| p == prefix)
    }

    pub fn owns_operation_id(&self, operation_id: &str) -> bool {
        self.explicit_operation_ids.iter().any(|id| id == operation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parse() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("patch".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_http_method_serializes_uppercase() {
        let json = serde_json::to_string(&HttpMethod::Post).unwrap();
        assert_eq!(json, "\"POST\"");
    }

    #[test]
    fn test_unmapped_message_lists_sample() {
        let err = CompilerError::Unmapped {
            count: 12,
            sample: vec!["Foo_List".to_string(), "Bar_Get".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("12 operation(s)"));
        assert!(msg.contains("Foo_List, Bar_Get"));
    }

    #[test]
    fn test_validation_message_lists_every_failure() {
        let err = CompilerError::Validation(vec![
            CompilerError::Unmapped {
                count: 1,
                sample: vec!["Foo_List".to_string()],
            },
            CompilerError::ConsumerDrift {
                service: "persons".to_string(),
                missing: vec!["search".to_string()],
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Foo_List"));
        assert!(msg.contains("'persons'"));
        assert!(msg.contains("search"));
    }
}

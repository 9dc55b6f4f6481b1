//! Registry IR built by the compiler and consumed by the emitter

use crate::{CompilerError, HttpMethod, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry entry for one operation of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEntry {
    pub http_method: HttpMethod,
    pub operation_id: String,

    /// Path relative to the service base path; `None` means the base path itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
}

/// Per-service operation map under construction
///
/// Method names are keys of a `BTreeMap`, so iteration is always in
/// lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub name: String,
    pub base_path: String,
    pub operations: BTreeMap<String, OperationEntry>,
}

impl ServiceState {
    pub fn new(name: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_path: base_path.into(),
            operations: BTreeMap::new(),
        }
    }

    /// Register an operation under `method`
    ///
    /// Fails with [`CompilerError::DuplicateMethod`] when the name is taken;
    /// the existing entry is never overwritten.
    pub fn insert(&mut self, method: &str, entry: OperationEntry) -> Result<()> {
        if let Some(existing) = self.operations.get(method) {
            return Err(CompilerError::DuplicateMethod {
                method: method.to_string(),
                service: self.name.clone(),
                base_path: self.base_path.clone(),
                existing: existing.operation_id.clone(),
                operation_id: entry.operation_id,
            });
        }
        self.operations.insert(method.to_string(), entry);
        Ok(())
    }

    pub fn get(&self, method: &str) -> Option<&OperationEntry> {
        self.operations.get(method)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }
}

/// The compiled registry: one state per catalog service, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub services: Vec<ServiceState>,
}

impl Registry {
    pub fn service(&self, name: &str) -> Option<&ServiceState> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn operation_count(&self) -> usize {
        self.services.iter().map(|s| s.operations.len()).sum()
    }
}

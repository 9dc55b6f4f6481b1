//! Single-pass registry compilation

use crate::catalog::Catalog;
use crate::path::relative_path;
use crate::resolver::OperationResolver;
use crate::validator;
use opreg_common::{
    OperationDescriptor, OperationEntry, Registry, Result, ServiceState, UsageSource,
};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Turns operation descriptors into a validated [`Registry`]
///
/// Naming collisions and path mismatches abort immediately; unmapped
/// operations and consumer drift are collected and reported together once
/// every descriptor has been seen.
pub struct RegistryCompiler {
    catalog: Catalog,
}

impl RegistryCompiler {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Compiler over the built-in catalog
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Catalog::builtin()?))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Build and validate the registry
    ///
    /// `usage` supplies each service's consumer contract; `None` skips the
    /// usage check.
    pub fn compile(
        &self,
        operations: &[OperationDescriptor],
        usage: Option<&dyn UsageSource>,
    ) -> Result<Registry> {
        let (registry, unmapped) = self.build(operations)?;
        validator::validate(&self.catalog, &registry, &unmapped, usage)?;

        info!(
            services = registry.services.len(),
            operations = registry.operation_count(),
            "registry compiled"
        );
        Ok(registry)
    }

    /// Resolve, name and place every operation without running validation
    ///
    /// Returns the registry together with the ids no service claimed, in
    /// input order.
    pub fn build(&self, operations: &[OperationDescriptor]) -> Result<(Registry, Vec<String>)> {
        let resolver = OperationResolver::new(&self.catalog.services);
        let mut states: Vec<ServiceState> = self
            .catalog
            .services
            .iter()
            .map(|s| ServiceState::new(&s.name, &s.base_path))
            .collect();
        let mut unmapped = Vec::new();

        for op in operations {
            let Some(resolution) = resolver.resolve(&op.operation_id) else {
                debug!(operation_id = %op.operation_id, "unmapped operation");
                unmapped.push(op.operation_id.clone());
                continue;
            };

            let service = resolution.service;
            let method = self.catalog.aliases.method_name(
                &service.name,
                &op.operation_id,
                resolution.matched_prefix,
            )?;
            let relative_path = relative_path(&self.catalog.path_overrides, service, op)?;

            debug!(
                operation_id = %op.operation_id,
                service = %service.name,
                method = %method,
                path = relative_path.as_deref().unwrap_or(""),
                "resolved operation"
            );

            states[resolution.index].insert(
                &method,
                OperationEntry {
                    http_method: op.http_method,
                    operation_id: op.operation_id.clone(),
                    relative_path,
                },
            )?;
        }

        self.warn_unused_overrides(operations);

        Ok((Registry { services: states }, unmapped))
    }

    fn warn_unused_overrides(&self, operations: &[OperationDescriptor]) {
        let seen: BTreeSet<&str> = operations.iter().map(|o| o.operation_id.as_str()).collect();
        for id in self.catalog.path_overrides.operation_ids() {
            if !seen.contains(id) {
                warn!(operation_id = %id, "path override does not match any operation");
            }
        }
    }
}

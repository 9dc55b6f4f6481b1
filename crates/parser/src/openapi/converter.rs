//! Flattens an OpenAPI document into operation descriptors

use super::types::OpenApiSpec;
use opreg_common::OperationDescriptor;
use tracing::debug;

/// Collect one descriptor per (path, verb) pair that carries an operation id
///
/// Paths are visited in lexicographic order and verbs in GET, POST, PUT,
/// DELETE order, so the result is stable for a given document.
pub fn collect_operations(spec: &OpenApiSpec) -> Vec<OperationDescriptor> {
    let mut operations = Vec::new();

    for (path, path_item) in &spec.paths {
        for (method, op) in path_item.operations() {
            match op.operation_id.as_deref() {
                Some(id) if !id.is_empty() => {
                    operations.push(OperationDescriptor::new(id, method, path.as_str()));
                }
                _ => debug!(%method, path = %path, "skipping operation without operationId"),
            }
        }
    }

    debug!(count = operations.len(), "collected operations");
    operations
}

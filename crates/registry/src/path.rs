//! Relative path derivation

use opreg_common::{CompilerError, OperationDescriptor, Result, ServiceDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Explicit relative paths keyed by operation id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathOverrides {
    paths: BTreeMap<String, String>,
}

impl PathOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, operation_id: &str, path: &str) -> Self {
        self.paths
            .insert(operation_id.to_string(), path.to_string());
        self
    }

    pub fn get(&self, operation_id: &str) -> Option<&str> {
        self.paths.get(operation_id).map(String::as_str)
    }

    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Path template of `operation` relative to the base path of `service`
///
/// - an override for the operation id is returned verbatim
/// - a path equal to the base path yields `None`
/// - a path under `<base_path>/` yields the remainder, leading `/` included
/// - anything else is [`CompilerError::PathOutsideBase`]
pub fn relative_path(
    overrides: &PathOverrides,
    service: &ServiceDefinition,
    operation: &OperationDescriptor,
) -> Result<Option<String>> {
    if let Some(path) = overrides.get(&operation.operation_id) {
        return Ok(Some(path.to_string()));
    }

    let absolute = operation.absolute_path.as_str();
    let base = service.base_path.as_str();

    if absolute == base {
        return Ok(None);
    }

    match absolute.strip_prefix(base) {
        Some(rest) if rest.starts_with('/') => Ok(Some(rest.to_string())),
        _ => Err(CompilerError::PathOutsideBase {
            operation_id: operation.operation_id.clone(),
            path: operation.absolute_path.clone(),
            service: service.name.clone(),
            base_path: service.base_path.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opreg_common::HttpMethod;

    fn persons() -> ServiceDefinition {
        ServiceDefinition::new("persons", "/persons").with_prefixes(["Persons"])
    }

    fn op(id: &str, path: &str) -> OperationDescriptor {
        OperationDescriptor::new(id, HttpMethod::Get, path)
    }

    #[test]
    fn test_nested_path_keeps_leading_slash() {
        let path = relative_path(
            &PathOverrides::new(),
            &persons(),
            &op("Persons_Get", "/persons/{id}"),
        )
        .unwrap();
        assert_eq!(path.as_deref(), Some("/{id}"));

        let path = relative_path(
            &PathOverrides::new(),
            &persons(),
            &op("Persons_GetDeals", "/persons/{id}/deals"),
        )
        .unwrap();
        assert_eq!(path.as_deref(), Some("/{id}/deals"));
    }

    #[test]
    fn test_base_path_itself_has_no_relative_path() {
        let path = relative_path(
            &PathOverrides::new(),
            &persons(),
            &op("Persons_GetAll", "/persons"),
        )
        .unwrap();
        assert_eq!(path, None);
    }

    #[test]
    fn test_path_outside_base_is_fatal() {
        let err = relative_path(
            &PathOverrides::new(),
            &persons(),
            &op("Persons_Merge", "/people/{id}/merge"),
        )
        .unwrap_err();

        match err {
            CompilerError::PathOutsideBase {
                operation_id,
                service,
                base_path,
                ..
            } => {
                assert_eq!(operation_id, "Persons_Merge");
                assert_eq!(service, "persons");
                assert_eq!(base_path, "/persons");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sibling_path_sharing_text_prefix_is_fatal() {
        let err = relative_path(
            &PathOverrides::new(),
            &persons(),
            &op("Persons_GetFields", "/personsFields"),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_override_wins() {
        let overrides =
            PathOverrides::new().with("Persons_DeleteFollower", "/{id}/followers/{followerId}");

        let path = relative_path(
            &overrides,
            &persons(),
            &op(
                "Persons_DeleteFollower",
                "/persons/{id}/followers/{person_follower_id}",
            ),
        )
        .unwrap();
        assert_eq!(path.as_deref(), Some("/{id}/followers/{followerId}"));

        let path = relative_path(
            &PathOverrides::new().with("Persons_Legacy", "/legacy"),
            &persons(),
            &op("Persons_Legacy", "/v1/legacy/persons"),
        )
        .unwrap();
        assert_eq!(path.as_deref(), Some("/legacy"));
    }
}

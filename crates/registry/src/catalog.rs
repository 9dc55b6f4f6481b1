//! Service catalog
//!
//! The fixed table of services, aliases and path overrides that drives
//! resolution. The built-in catalog is compiled into the binary from
//! `catalog/builtin.yaml`; tests and library callers may build their own.

use crate::alias::AliasTable;
use crate::path::PathOverrides;
use opreg_common::{CompilerError, Result, ServiceDefinition};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const BUILTIN_CATALOG: &str = include_str!("../catalog/builtin.yaml");

/// Services in resolution order plus the static naming and path tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<ServiceDefinition>,

    #[serde(default)]
    pub aliases: AliasTable,

    #[serde(default)]
    pub path_overrides: PathOverrides,
}

impl Catalog {
    /// The catalog compiled into opreg
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Parse and check a catalog document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(yaml)
            .map_err(|e| CompilerError::Catalog(format!("Failed to parse catalog YAML: {}", e)))?;
        catalog.check()?;
        Ok(catalog)
    }

    pub fn new(services: Vec<ServiceDefinition>) -> Self {
        Self {
            services,
            ..Default::default()
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_path_overrides(mut self, overrides: PathOverrides) -> Self {
        self.path_overrides = overrides;
        self
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Check authoring rules the resolver relies on
    ///
    /// - service names are unique
    /// - no prefix is claimed by two services
    /// - no explicit operation id is claimed by two services
    /// - base paths start with `/` and do not end with one
    /// - per-service aliases only name known services
    pub fn check(&self) -> Result<()> {
        let mut problems = Vec::new();
        let mut names = BTreeSet::new();
        let mut prefix_owner: BTreeMap<&str, &str> = BTreeMap::new();
        let mut id_owner: BTreeMap<&str, &str> = BTreeMap::new();

        for service in &self.services {
            if !names.insert(service.name.as_str()) {
                problems.push(format!("service '{}' is declared twice", service.name));
            }

            if !service.base_path.starts_with('/')
                || (service.base_path.len() > 1 && service.base_path.ends_with('/'))
            {
                problems.push(format!(
                    "service '{}' has malformed base path '{}'",
                    service.name, service.base_path
                ));
            }

            for prefix in &service.prefixes {
                if let Some(owner) = prefix_owner.insert(prefix.as_str(), service.name.as_str()) {
                    problems.push(format!(
                        "prefix '{}' is claimed by both '{}' and '{}'",
                        prefix, owner, service.name
                    ));
                }
            }

            for id in &service.explicit_operation_ids {
                if let Some(owner) = id_owner.insert(id.as_str(), service.name.as_str()) {
                    problems.push(format!(
                        "operation id '{}' is claimed by both '{}' and '{}'",
                        id, owner, service.name
                    ));
                }
            }
        }

        for (suffix, rule) in self.aliases.rules() {
            if let crate::alias::AliasRule::PerService(map) = rule {
                for service in map.services.keys() {
                    if !names.contains(service.as_str()) {
                        problems.push(format!(
                            "alias for '{}' names unknown service '{}'",
                            suffix, service
                        ));
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CompilerError::Catalog(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.services.is_empty());
        assert_eq!(catalog.services[0].name, "persons");
        assert_eq!(
            catalog.service("search").map(|s| s.base_path.as_str()),
            Some("/itemSearch")
        );
        assert!(catalog
            .service("users")
            .unwrap()
            .owns_operation_id("getCurrentUser"));
        assert!(!catalog.aliases.is_empty());
        assert!(catalog
            .path_overrides
            .get("Persons_DeleteFollower")
            .is_some());
    }

    #[test]
    fn test_shared_prefix_is_rejected() {
        let catalog = Catalog::new(vec![
            ServiceDefinition::new("persons", "/persons").with_prefixes(["Persons"]),
            ServiceDefinition::new("people", "/people").with_prefixes(["Persons"]),
        ]);

        let err = catalog.check().unwrap_err();
        assert!(err.to_string().contains("prefix 'Persons'"));
    }

    #[test]
    fn test_duplicate_service_is_rejected() {
        let catalog = Catalog::new(vec![
            ServiceDefinition::new("deals", "/deals"),
            ServiceDefinition::new("deals", "/deals/v2"),
        ]);
        assert!(catalog.check().is_err());
    }

    #[test]
    fn test_malformed_base_path_is_rejected() {
        let catalog = Catalog::new(vec![ServiceDefinition::new("deals", "deals/")]);
        assert!(catalog.check().is_err());
    }

    #[test]
    fn test_alias_for_unknown_service_is_rejected() {
        let catalog = Catalog::new(vec![ServiceDefinition::new("deals", "/deals")])
            .with_aliases(AliasTable::new().with_service_name("Search", "nope", "items"));
        let err = catalog.check().unwrap_err();
        assert!(err.to_string().contains("unknown service 'nope'"));
    }

    #[test]
    fn test_catalog_yaml_shape() {
        let yaml = r#"
services:
  - name: persons
    base_path: /persons
    prefixes: [Persons]
    consumer: persons.ts
  - name: users
    base_path: /users
    prefixes: [Users]
    operation_ids: [getCurrentUser]
aliases:
  GetAll: list
path_overrides:
  Persons_DeleteFollower: /{id}/followers/{followerId}
"#;
        let catalog = Catalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.services.len(), 2);
        assert_eq!(catalog.services[0].consumer.as_deref(), Some("persons.ts"));
        assert_eq!(catalog.services[1].explicit_operation_ids, ["getCurrentUser"]);
        assert_eq!(catalog.aliases.lookup("persons", "GetAll"), Some("list"));
    }
}

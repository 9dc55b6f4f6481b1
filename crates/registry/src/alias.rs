//! Method name resolution
//!
//! Maps the suffix of an operation id (the part after `<prefix>_`) to the
//! method name a service exposes. Lookup is layered:
//! 1. the per-service entry of a suffix's alias map
//! 2. the map's `default` entry, or a plain alias string
//! 3. the suffix itself with its first character lower-cased

use opreg_common::{CompilerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alias for one suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasRule {
    /// Same method name for every service
    Name(String),

    /// Method name chosen per service
    PerService(ServiceAliases),
}

/// Per-service alias map with an optional fallback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAliases {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Service name to method name
    #[serde(flatten)]
    pub services: BTreeMap<String, String>,
}

/// Static suffix to method name table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    rules: BTreeMap<String, AliasRule>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain alias
    pub fn with_name(mut self, suffix: &str, name: &str) -> Self {
        self.rules
            .insert(suffix.to_string(), AliasRule::Name(name.to_string()));
        self
    }

    /// Add a per-service alias for `service`
    ///
    /// A plain alias already registered for `suffix` becomes the map's `default`.
    pub fn with_service_name(mut self, suffix: &str, service: &str, name: &str) -> Self {
        self.per_service(suffix)
            .services
            .insert(service.to_string(), name.to_string());
        self
    }

    /// Set the `default` entry of a suffix's per-service map
    pub fn with_default(mut self, suffix: &str, name: &str) -> Self {
        self.per_service(suffix).default = Some(name.to_string());
        self
    }

    fn per_service(&mut self, suffix: &str) -> &mut ServiceAliases {
        let rule = self
            .rules
            .entry(suffix.to_string())
            .or_insert_with(|| AliasRule::PerService(ServiceAliases::default()));
        if let AliasRule::Name(name) = rule {
            let default = Some(name.clone());
            *rule = AliasRule::PerService(ServiceAliases {
                default,
                services: BTreeMap::new(),
            });
        }
        match rule {
            AliasRule::PerService(map) => map,
            AliasRule::Name(_) => unreachable!("rule was just replaced"),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &AliasRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Alias for `suffix` in `service`, if any table layer provides one
    pub fn lookup(&self, service: &str, suffix: &str) -> Option<&str> {
        match self.rules.get(suffix)? {
            AliasRule::Name(name) => Some(name),
            AliasRule::PerService(map) => map
                .services
                .get(service)
                .or(map.default.as_ref())
                .map(String::as_str),
        }
    }

    /// Resolve `suffix` to a method name, falling back to lower camel case
    pub fn resolve_suffix(&self, service: &str, suffix: &str) -> String {
        self.lookup(service, suffix)
            .map(str::to_string)
            .unwrap_or_else(|| lower_first(suffix))
    }

    /// Method name for an operation resolved to `service`
    ///
    /// With no matched prefix (explicit id match) the operation id is the
    /// method name. Otherwise `<prefix>_` is stripped and the remaining
    /// suffix goes through the alias layers.
    pub fn method_name(
        &self,
        service: &str,
        operation_id: &str,
        matched_prefix: Option<&str>,
    ) -> Result<String> {
        let Some(prefix) = matched_prefix else {
            return Ok(operation_id.to_string());
        };

        let suffix = operation_id
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
            .ok_or_else(|| CompilerError::PrefixMismatch {
                operation_id: operation_id.to_string(),
                prefix: prefix.to_string(),
                service: service.to_string(),
            })?;

        if suffix.is_empty() {
            return Err(CompilerError::EmptySuffix {
                operation_id: operation_id.to_string(),
                prefix: prefix.to_string(),
                service: service.to_string(),
            });
        }

        Ok(self.resolve_suffix(service, suffix))
    }
}

/// Lower-case the first character (`GetAllowedTypes` -> `getAllowedTypes`)
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        AliasTable::new()
            .with_name("GetAll", "list")
            .with_service_name("GetChangelog", "deals", "getChangelog")
            .with_default("GetChangelog", "listChanges")
            .with_service_name("Search", "search", "items")
    }

    #[test]
    fn test_plain_alias() {
        assert_eq!(table().resolve_suffix("persons", "GetAll"), "list");
        assert_eq!(table().resolve_suffix("deals", "GetAll"), "list");
    }

    #[test]
    fn test_service_entry_beats_default() {
        let t = table();
        assert_eq!(t.resolve_suffix("deals", "GetChangelog"), "getChangelog");
        assert_eq!(t.resolve_suffix("persons", "GetChangelog"), "listChanges");
    }

    #[test]
    fn test_map_without_default_falls_through() {
        let t = table();
        assert_eq!(t.resolve_suffix("search", "Search"), "items");
        assert_eq!(t.resolve_suffix("persons", "Search"), "search");
    }

    #[test]
    fn test_structural_fallback() {
        assert_eq!(
            table().resolve_suffix("activities", "GetAllowedTypes"),
            "getAllowedTypes"
        );
        assert_eq!(lower_first("X"), "x");
        assert_eq!(lower_first(""), "");
        assert_eq!(lower_first("already"), "already");
    }

    #[test]
    fn test_explicit_match_keeps_operation_id() {
        let name = table()
            .method_name("users", "getCurrentUser", None)
            .unwrap();
        assert_eq!(name, "getCurrentUser");
    }

    #[test]
    fn test_prefix_is_stripped() {
        let name = table()
            .method_name("persons", "Persons_GetAll", Some("Persons"))
            .unwrap();
        assert_eq!(name, "list");
    }

    #[test]
    fn test_prefix_mismatch_is_fatal() {
        let err = table()
            .method_name("persons", "PersonsGetAll", Some("Persons"))
            .unwrap_err();
        assert!(matches!(err, CompilerError::PrefixMismatch { .. }));

        let err = table()
            .method_name("persons", "People_GetAll", Some("Persons"))
            .unwrap_err();
        assert!(matches!(err, CompilerError::PrefixMismatch { .. }));
    }

    #[test]
    fn test_empty_suffix_is_fatal() {
        let err = table()
            .method_name("persons", "Persons_", Some("Persons"))
            .unwrap_err();
        assert!(matches!(err, CompilerError::EmptySuffix { .. }));
    }

    #[test]
    fn test_deserialize_mixed_rules() {
        let yaml = r#"
GetAll: list
GetChangelog:
  default: listChanges
  deals: getChangelog
"#;
        let t: AliasTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.lookup("deals", "GetChangelog"), Some("getChangelog"));
        assert_eq!(t.lookup("notes", "GetChangelog"), Some("listChanges"));
        assert_eq!(t.lookup("notes", "GetAll"), Some("list"));
    }
}

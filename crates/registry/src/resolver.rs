//! Operation to service resolution

use opreg_common::ServiceDefinition;

/// Where an operation id landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Position of the service in the catalog
    pub index: usize,

    pub service: &'a ServiceDefinition,

    /// Prefix that matched; `None` for an explicit operation id match
    pub matched_prefix: Option<&'a str>,
}

/// Classifies operation ids against the catalog's services
///
/// Services are scanned in declared order and the first match wins, first
/// for explicit operation ids and then for the prefix before the first `_`.
pub struct OperationResolver<'a> {
    services: &'a [ServiceDefinition],
}

impl<'a> OperationResolver<'a> {
    pub fn new(services: &'a [ServiceDefinition]) -> Self {
        Self { services }
    }

    /// Resolve an operation id, or `None` when no service claims it
    ///
    /// # Examples
    /// ```
    /// use opreg_common::ServiceDefinition;
    /// use opreg_registry::OperationResolver;
    ///
    /// let services = vec![
    ///     ServiceDefinition::new("persons", "/persons").with_prefixes(["Persons"]),
    /// ];
    /// let resolver = OperationResolver::new(&services);
    ///
    /// let hit = resolver.resolve("Persons_GetAll").unwrap();
    /// assert_eq!(hit.service.name, "persons");
    /// assert_eq!(hit.matched_prefix, Some("Persons"));
    /// assert!(resolver.resolve("Deals_GetAll").is_none());
    /// ```
    pub fn resolve(&self, operation_id: &str) -> Option<Resolution<'a>> {
        if let Some((index, service)) = self
            .services
            .iter()
            .enumerate()
            .find(|(_, s)| s.owns_operation_id(operation_id))
        {
            return Some(Resolution {
                index,
                service,
                matched_prefix: None,
            });
        }

        let (candidate, _) = operation_id.split_once('_')?;

        self.services
            .iter()
            .enumerate()
            .find_map(|(index, service)| {
                service
                    .prefixes
                    .iter()
                    .find(|p| p.as_str() == candidate)
                    .map(|prefix| Resolution {
                        index,
                        service,
                        matched_prefix: Some(prefix.as_str()),
                    })
            })
    }
}

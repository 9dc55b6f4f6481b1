//! Consumer contract: the method names hand-written service classes rely on

use crate::{Result, ServiceDefinition};
use std::collections::{BTreeMap, BTreeSet};

/// Supplies the set of method names a service's consumer references
///
/// The registry validator only sees this trait, so it does not depend on the
/// syntax of whatever language the consumers are written in.
pub trait UsageSource {
    fn usage(&self, service: &ServiceDefinition) -> Result<BTreeSet<String>>;
}

/// Usage sets held as plain data, keyed by service name
#[derive(Debug, Clone, Default)]
pub struct StaticUsage {
    services: BTreeMap<String, BTreeSet<String>>,
}

impl StaticUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, service: &str, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services
            .entry(service.to_string())
            .or_default()
            .extend(methods.into_iter().map(Into::into));
        self
    }
}

impl UsageSource for StaticUsage {
    fn usage(&self, service: &ServiceDefinition) -> Result<BTreeSet<String>> {
        Ok(self.services.get(&service.name).cloned().unwrap_or_default())
    }
}

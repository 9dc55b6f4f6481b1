//! Registry validation
//!
//! Two independent passes run after every operation has been processed.
//! Both always run to completion so a single run reports everything it can;
//! any failure aborts the compile.

use crate::catalog::Catalog;
use opreg_common::{CompilerError, Registry, Result, UsageSource, UNMAPPED_SAMPLE_SIZE};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Coverage pass: every operation must have resolved to a service
pub fn check_coverage(unmapped: &[String]) -> Option<CompilerError> {
    if unmapped.is_empty() {
        return None;
    }

    Some(CompilerError::Unmapped {
        count: unmapped.len(),
        sample: unmapped
            .iter()
            .take(UNMAPPED_SAMPLE_SIZE)
            .cloned()
            .collect(),
    })
}

/// Usage pass: every method a consumer references must be registered
pub fn check_usage(
    catalog: &Catalog,
    registry: &Registry,
    usage: &dyn UsageSource,
) -> Vec<CompilerError> {
    let mut errors = Vec::new();

    for service in &catalog.services {
        let used = match usage.usage(service) {
            Ok(used) => used,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        let registered: BTreeSet<&str> = registry
            .service(&service.name)
            .map(|s| s.method_names().collect())
            .unwrap_or_default();

        let missing: Vec<String> = used
            .iter()
            .filter(|m| !registered.contains(m.as_str()))
            .cloned()
            .collect();

        debug!(
            service = %service.name,
            used = used.len(),
            missing = missing.len(),
            "checked consumer usage"
        );

        if !missing.is_empty() {
            errors.push(CompilerError::ConsumerDrift {
                service: service.name.clone(),
                missing,
            });
        }
    }

    errors
}

/// Run both passes and fold their failures into one error
///
/// Without a usage source the usage pass is skipped.
pub fn validate(
    catalog: &Catalog,
    registry: &Registry,
    unmapped: &[String],
    usage: Option<&dyn UsageSource>,
) -> Result<()> {
    let mut errors: Vec<CompilerError> = check_coverage(unmapped).into_iter().collect();

    match usage {
        Some(usage) => errors.extend(check_usage(catalog, registry, usage)),
        None => warn!("no consumer contract supplied; skipping usage check"),
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(CompilerError::Validation(errors)),
    }
}

//! Operation registry compiler
//!
//! Derives, for every service of the catalog, the mapping from short method
//! names to `{HTTP verb, operation id, relative path}` that hand-written
//! service classes consume at runtime.
//!
//! ## Pipeline
//!
//! 1. [`OperationResolver`] assigns each operation id to a service, by
//!    explicit id first and then by the prefix before the first `_`
//! 2. [`AliasTable`] turns the remaining suffix into a method name
//! 3. [`relative_path`] derives the path under the service base path
//! 4. [`ServiceState::insert`] registers the entry, rejecting collisions
//! 5. [`validator`] checks coverage and consumer usage
//!
//! [`ServiceState::insert`]: opreg_common::ServiceState::insert

pub mod alias;
pub mod catalog;
mod compiler;
pub mod path;
mod resolver;
pub mod validator;

pub use alias::{AliasRule, AliasTable, ServiceAliases};
pub use catalog::Catalog;
pub use compiler::RegistryCompiler;
pub use path::{relative_path, PathOverrides};
pub use resolver::{OperationResolver, Resolution};

use opreg_common::{OperationDescriptor, Registry, Result, UsageSource};

/// Compile `operations` against the built-in catalog
pub fn compile(
    operations: &[OperationDescriptor],
    usage: Option<&dyn UsageSource>,
) -> Result<Registry> {
    RegistryCompiler::builtin()?.compile(operations, usage)
}

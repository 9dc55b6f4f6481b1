//! API description loading
//!
//! This crate reads a machine-generated API description (OpenAPI 3, JSON or
//! YAML) and flattens it into the list of [`OperationDescriptor`]s the
//! registry compiler works on.
//!
//! ## Loading Strategy
//!
//! Only three facts are taken from each endpoint:
//! - the operation id
//! - the HTTP verb (GET, POST, PUT, DELETE)
//! - the absolute path
//!
//! Endpoints without an operation id are not part of the public contract and
//! are skipped. Absent or malformed sections are treated as empty.

pub mod openapi;

pub use openapi::{OpenApiParser, SpecFormat};

use opreg_common::{OperationDescriptor, Result};
use std::path::Path;

/// Load an API description file and return its operation descriptors
///
/// # Arguments
/// * `path` - Path to a `.json`, `.yaml` or `.yml` description
///
/// # Returns
/// * Descriptors sorted by path, then by verb
pub fn load_operations<P: AsRef<Path>>(path: P) -> Result<Vec<OperationDescriptor>> {
    let parser = OpenApiParser::from_file(path)?;
    Ok(parser.parse())
}

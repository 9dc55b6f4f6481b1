//! OpenAPI 3 description loader
//!
//! Parses OpenAPI documents into flat [`OperationDescriptor`] lists.
//!
//! ## Usage
//! ```rust,ignore
//! use opreg_parser::openapi::OpenApiParser;
//!
//! let parser = OpenApiParser::from_file("openapi/v2.yaml")?;
//! let operations = parser.parse();
//! ```
//!
//! [`OperationDescriptor`]: opreg_common::OperationDescriptor

mod converter;
mod parser;
mod types;

pub use parser::{OpenApiParser, SpecFormat};
pub use types::*;

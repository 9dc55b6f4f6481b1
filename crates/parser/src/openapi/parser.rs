//! OpenAPI description file parser

use super::types::OpenApiSpec;
use opreg_common::{CompilerError, OperationDescriptor, Result};
use std::fs;
use std::path::Path;

/// OpenAPI description parser
///
/// Reads an OpenAPI 3 document and flattens its paths into operation
/// descriptors.
pub struct OpenApiParser {
    /// Loaded OpenAPI document
    spec: OpenApiSpec,
}

/// Serialization of the description document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Pick the format from the file extension
    ///
    /// `.json` is JSON; everything else is read as YAML, which also accepts
    /// JSON content.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SpecFormat::Json,
            _ => SpecFormat::Yaml,
        }
    }
}

impl OpenApiParser {
    /// Load an OpenAPI document from a file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = OpenApiParser::from_file("openapi/v2.yaml")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CompilerError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.display(),
                e
            ))
        })?;

        match SpecFormat::from_path(path) {
            SpecFormat::Json => Self::from_json(&content),
            SpecFormat::Yaml => Self::from_yaml(&content),
        }
    }

    /// Parse an OpenAPI document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: OpenApiSpec = serde_json::from_str(json)
            .map_err(|e| CompilerError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;

        Ok(Self { spec })
    }

    /// Parse an OpenAPI document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: OpenApiSpec = serde_yaml::from_str(yaml)
            .map_err(|e| CompilerError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;

        Ok(Self { spec })
    }

    /// Flatten the document into operation descriptors
    pub fn parse(&self) -> Vec<OperationDescriptor> {
        super::converter::collect_operations(&self.spec)
    }

    /// Get reference to the underlying OpenAPI document
    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }
}

//! OpenAPI 3 type definitions
//!
//! Deliberately narrow: only what is needed to enumerate operations. Every
//! section is lenient, so a section of the wrong shape reads as absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// OpenAPI document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI version (e.g., "3.0.0")
    #[serde(default, deserialize_with = "lenient")]
    pub openapi: Option<String>,

    /// API metadata
    #[serde(default, deserialize_with = "lenient")]
    pub info: Option<Info>,

    /// API paths (endpoints), keyed by absolute path
    #[serde(default, deserialize_with = "lenient_map")]
    pub paths: BTreeMap<String, PathItem>,
}

/// API information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    #[serde(default)]
    pub title: Option<String>,

    /// API version
    #[serde(default)]
    pub version: Option<String>,
}

/// Path item (operations for a path)
///
/// PATCH, HEAD, OPTIONS and TRACE are not part of the client contract and
/// are ignored along with any other key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(default, deserialize_with = "lenient")]
    pub get: Option<Operation>,

    /// POST operation
    #[serde(default, deserialize_with = "lenient")]
    pub post: Option<Operation>,

    /// PUT operation
    #[serde(default, deserialize_with = "lenient")]
    pub put: Option<Operation>,

    /// DELETE operation
    #[serde(default, deserialize_with = "lenient")]
    pub delete: Option<Operation>,
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation ID (unique identifier)
    #[serde(rename = "operationId", default, deserialize_with = "lenient")]
    pub operation_id: Option<String>,

    /// Summary
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,

    /// Tags (for grouping)
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tags: Vec<String>,
}

/// Deserialize a value, reading anything of the wrong shape as `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Deserialize a map entry by entry, dropping entries of the wrong shape
fn lenient_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        return Ok(BTreeMap::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, entry)| serde_json::from_value(entry).ok().map(|v| (key, v)))
        .collect())
}

impl PathItem {
    /// Iterate the recognized verbs of this path in GET, POST, PUT, DELETE order
    pub fn operations(&self) -> impl Iterator<Item = (opreg_common::HttpMethod, &Operation)> {
        use opreg_common::HttpMethod;

        [
            (HttpMethod::Get, self.get.as_ref()),
            (HttpMethod::Post, self.post.as_ref()),
            (HttpMethod::Put, self.put.as_ref()),
            (HttpMethod::Delete, self.delete.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

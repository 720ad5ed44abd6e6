use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// HTTP method of a path-item entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// Upper-case form used for display badges.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case form as it appears as a path-item key.
    pub fn as_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// Map a path-item key to a method. Keys are case-sensitive, as in OpenAPI.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

impl Operation {
    /// The tag that classifies this operation; later tags are ignored.
    /// An empty first tag counts as no tag.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str).filter(|t| !t.is_empty())
    }
}

/// Key under which a path item declares shared parameters.
pub const PARAMETERS_KEY: &str = "parameters";

/// A path item: operations keyed by HTTP method, in declaration order.
///
/// `parameters` and other non-method keys (`summary`, `servers`, `$ref`,
/// extensions) are metadata and never become operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<serde_json::Value>,
    pub operations: IndexMap<HttpMethod, Operation>,
}

impl PathItem {
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        self.operations.iter().map(|(m, op)| (*m, op))
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: IndexMap<String, serde_json::Value> = IndexMap::deserialize(deserializer)?;
        let mut item = PathItem::default();

        for (key, value) in raw {
            match key.as_str() {
                PARAMETERS_KEY => {
                    item.parameters = serde_json::from_value(value)
                        .map_err(|e| de::Error::custom(format!("{PARAMETERS_KEY}: {e}")))?;
                }
                "summary" => {
                    item.summary = serde_json::from_value(value)
                        .map_err(|e| de::Error::custom(format!("summary: {e}")))?;
                }
                "description" => {
                    item.description = serde_json::from_value(value)
                        .map_err(|e| de::Error::custom(format!("description: {e}")))?;
                }
                other => {
                    let Some(method) = HttpMethod::from_key(other) else {
                        continue;
                    };
                    let operation: Operation = serde_json::from_value(value)
                        .map_err(|e| de::Error::custom(format!("{other}: {e}")))?;
                    item.operations.insert(method, operation);
                }
            }
        }

        Ok(item)
    }
}

impl Serialize for PathItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(summary) = &self.summary {
            map.serialize_entry("summary", summary)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        if !self.parameters.is_empty() {
            map.serialize_entry(PARAMETERS_KEY, &self.parameters)?;
        }
        for (method, operation) in &self.operations {
            map.serialize_entry(method.as_key(), operation)?;
        }
        map.end()
    }
}

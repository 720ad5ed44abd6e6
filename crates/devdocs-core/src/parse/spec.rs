use std::fmt;

use indexmap::IndexMap;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::components::Components;
use super::operation::PathItem;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "super::opt_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tag definition. The description doubles as the tag's display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tag {
    /// The description, or the name when the description is missing or empty.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Top-level OpenAPI 3.x specification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenApiSpec {
    #[serde(default, deserialize_with = "super::scalar_string")]
    pub openapi: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(
        default,
        deserialize_with = "deserialize_paths",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub paths: IndexMap<String, PathItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl OpenApiSpec {
    /// Whether the document declares at least one security scheme.
    pub fn has_security_schemes(&self) -> bool {
        self.components
            .as_ref()
            .is_some_and(|c| !c.security_schemes.is_empty())
    }

    pub fn schema_count(&self) -> usize {
        self.components.as_ref().map_or(0, |c| c.schemas.len())
    }
}

/// Prefix of specification extension keys, which are never paths.
pub const EXTENSION_PREFIX: &str = "x-";

/// Read the Paths object, skipping `x-` extensions whatever their value.
fn deserialize_paths<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, PathItem>, D::Error> {
    struct PathsVisitor;

    impl<'de> Visitor<'de> for PathsVisitor {
        type Value = IndexMap<String, PathItem>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of paths to path items")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut paths = IndexMap::new();
            while let Some(key) = map.next_key::<String>()? {
                if key.starts_with(EXTENSION_PREFIX) {
                    map.next_value::<IgnoredAny>()?;
                } else {
                    let item = map.next_value::<PathItem>()?;
                    paths.insert(key, item);
                }
            }
            Ok(paths)
        }
    }

    deserializer.deserialize_map(PathsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_skip_extensions() {
        let yaml = r#"
openapi: 3.0.0
paths:
  x-internal: true
  /a:
    get:
      summary: A
  x-owner:
    team: docs
"#;
        let spec: OpenApiSpec = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(spec.paths.keys().collect::<Vec<_>>(), vec!["/a"]);
    }

    #[test]
    fn test_tag_label_falls_back_on_empty_description() {
        let tag = Tag {
            name: "pets".into(),
            description: Some(String::new()),
        };
        assert_eq!(tag.label(), "pets");
    }
}

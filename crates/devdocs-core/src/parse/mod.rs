pub mod components;
pub mod operation;
pub mod spec;

use serde::{Deserialize, Deserializer};

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI spec, picking JSON when the document starts with `{`
/// and YAML otherwise.
pub fn from_str(input: &str) -> Result<OpenApiSpec, ParseError> {
    if looks_like_json(input) {
        from_json(input)
    } else {
        from_yaml(input)
    }
}

pub(crate) fn looks_like_json(input: &str) -> bool {
    input.trim_start().starts_with('{')
}

pub(crate) fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if spec.openapi.is_empty() {
        return Err(ParseError::MissingField("openapi".to_string()));
    }
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => format!("{n:?}"),
        }
    }
}

/// Accept a string or a bare number where a string is expected, so that
/// unquoted YAML like `version: 1.0` still reads as `"1.0"`.
pub(crate) fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Scalar::deserialize(deserializer)?.into_string())
}

pub(crate) fn opt_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

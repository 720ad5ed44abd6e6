use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Components object holding reusable definitions.
///
/// Schema bodies stay opaque: navigation and validation only need to know
/// which models exist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, serde_json::Value>,

    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecuritySchemeOrRef>,
}

/// Kind of a declared security scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeType {
    ApiKey,
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    OpenIdConnect,
    MutualTLS,
}

/// A security scheme; only the fields the authentication section shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

/// A reference or inline security scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecuritySchemeOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Scheme(SecurityScheme),
}

impl SecuritySchemeOrRef {
    /// The inline scheme, or `None` for a reference.
    pub fn scheme(&self) -> Option<&SecurityScheme> {
        match self {
            SecuritySchemeOrRef::Ref { .. } => None,
            SecuritySchemeOrRef::Scheme(scheme) => Some(scheme),
        }
    }
}

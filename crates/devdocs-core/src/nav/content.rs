use serde::{Deserialize, Serialize};

/// Icon used for content sections that do not declare one.
pub const DEFAULT_CONTENT_ICON: &str = "fa-file-lines";

/// A documentation section authored in the CMS and appended after the
/// OpenAPI-derived entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(
        rename = "contentId",
        alias = "contenidoId",
        deserialize_with = "crate::parse::scalar_string"
    )]
    pub content_id: String,

    #[serde(alias = "titulo")]
    pub title: String,

    #[serde(default, alias = "icono", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ContentSection {
    pub fn new(content_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            title: title.into(),
            icon: None,
        }
    }

    /// Menu id of this section; the rendered page uses the same id as anchor.
    pub fn menu_id(&self) -> String {
        format!("cms-section-{}", self.content_id)
    }
}

/// Load content sections from JSON or YAML text.
pub fn sections_from_str(input: &str) -> Result<Vec<ContentSection>, crate::error::ParseError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        Ok(serde_json::from_str(input)?)
    } else {
        Ok(serde_yaml_ng::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_content_id() {
        let sections = sections_from_str(r#"[{"contentId": 42, "title": "Guides"}]"#).unwrap();
        assert_eq!(sections[0].menu_id(), "cms-section-42");
        assert_eq!(sections[0].icon, None);
    }

    #[test]
    fn test_cms_field_aliases() {
        let yaml = "- contenidoId: '7'\n  titulo: Primeros pasos\n  icono: fa-rocket\n";
        let sections = sections_from_str(yaml).unwrap();
        assert_eq!(sections[0].content_id, "7");
        assert_eq!(sections[0].title, "Primeros pasos");
        assert_eq!(sections[0].icon.as_deref(), Some("fa-rocket"));
    }
}

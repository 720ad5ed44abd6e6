use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::content::{ContentSection, DEFAULT_CONTENT_ICON};
use super::grouping::{FALLBACK_TAG, group_by_tag_with_fallback};
use crate::error::MenuError;
use crate::parse::spec::OpenApiSpec;

/// A node of the documentation navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MenuEntry {
    Section(SectionEntry),
    Expandable(ExpandableEntry),
    Endpoint(EndpointEntry),
}

/// A plain link to a page section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether the section comes from the CMS rather than the OpenAPI document.
    #[serde(rename = "isCms", default)]
    pub is_cms: bool,
}

/// An entry that opens to reveal its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandableEntry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub children: Vec<MenuEntry>,
}

/// A single operation leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointEntry {
    pub id: String,
    pub title: String,
    pub path: String,
    pub method: String,
    #[serde(rename = "parentGroupId")]
    pub parent_group_id: String,
}

impl MenuEntry {
    pub fn id(&self) -> &str {
        match self {
            MenuEntry::Section(s) => &s.id,
            MenuEntry::Expandable(e) => &e.id,
            MenuEntry::Endpoint(e) => &e.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MenuEntry::Section(s) => &s.title,
            MenuEntry::Expandable(e) => &e.title,
            MenuEntry::Endpoint(e) => &e.title,
        }
    }

    pub fn icon(&self) -> Option<&str> {
        match self {
            MenuEntry::Section(s) => s.icon.as_deref(),
            MenuEntry::Expandable(e) => e.icon.as_deref(),
            MenuEntry::Endpoint(_) => None,
        }
    }

    pub fn children(&self) -> &[MenuEntry] {
        match self {
            MenuEntry::Expandable(e) => &e.children,
            _ => &[],
        }
    }
}

/// Ids of the expandable entries enclosing `id`, outermost first.
///
/// Empty when `id` is top-level or not in the tree.
pub fn ancestors_of(entries: &[MenuEntry], id: &str) -> Vec<String> {
    ancestor_index(entries).remove(id).unwrap_or_default()
}

/// Enclosing expandable ids, outermost first, for every nested entry.
/// Top-level entries have no key.
pub fn ancestor_index(entries: &[MenuEntry]) -> HashMap<String, Vec<String>> {
    fn walk(entries: &[MenuEntry], trail: &mut Vec<String>, out: &mut HashMap<String, Vec<String>>) {
        for entry in entries {
            if !trail.is_empty() {
                out.insert(entry.id().to_string(), trail.clone());
            }
            if let MenuEntry::Expandable(group) = entry {
                trail.push(group.id.clone());
                walk(&group.children, trail, out);
                trail.pop();
            }
        }
    }

    let mut out = HashMap::new();
    walk(entries, &mut Vec::new(), &mut out);
    out
}

/// Title and icon of one fixed menu section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub title: String,
    pub icon: String,
}

impl Label {
    fn new(title: &str, icon: &str) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Titles and icons of the OpenAPI-derived sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuLabels {
    pub info: Label,
    pub servers: Label,
    pub security: Label,
    pub endpoints: Label,
    pub schemas: Label,
}

impl Default for MenuLabels {
    fn default() -> Self {
        Self {
            info: Label::new("Information", "fa-info-circle"),
            servers: Label::new("Servers", "fa-server"),
            security: Label::new("Authentication", "fa-shield-halved"),
            endpoints: Label::new("Endpoints", "fa-plug"),
            schemas: Label::new("Models", "fa-cube"),
        }
    }
}

pub const INFO_SECTION_ID: &str = "info-section";
pub const SERVERS_SECTION_ID: &str = "servers-section";
pub const SECURITY_SECTION_ID: &str = "security-section";
pub const ENDPOINTS_SECTION_ID: &str = "endpoints-section";
pub const SCHEMAS_SECTION_ID: &str = "schemas-section";

/// Builds the navigation tree from an OpenAPI document and CMS sections.
#[derive(Debug, Clone)]
pub struct MenuBuilder {
    pub labels: MenuLabels,
    pub fallback_tag: String,
    pub content_icon: String,
}

impl Default for MenuBuilder {
    fn default() -> Self {
        Self {
            labels: MenuLabels::default(),
            fallback_tag: FALLBACK_TAG.to_string(),
            content_icon: DEFAULT_CONTENT_ICON.to_string(),
        }
    }
}

impl MenuBuilder {
    /// Build the full menu. Every call starts from scratch.
    pub fn build(
        &self,
        spec: Option<&OpenApiSpec>,
        sections: &[ContentSection],
    ) -> Result<Vec<MenuEntry>, MenuError> {
        let spec = spec.ok_or_else(|| {
            MenuError::InvalidInput("no specification document supplied".to_string())
        })?;

        let mut entries = Vec::new();

        if spec.info.is_some() {
            entries.push(self.section(INFO_SECTION_ID, &self.labels.info));
        }

        if !spec.servers.is_empty() {
            entries.push(self.section(SERVERS_SECTION_ID, &self.labels.servers));
        }

        if spec.has_security_schemes() {
            entries.push(self.section(SECURITY_SECTION_ID, &self.labels.security));
        }

        if !spec.paths.is_empty() {
            let groups = group_by_tag_with_fallback(&spec.paths, &spec.tags, &self.fallback_tag);
            entries.push(MenuEntry::Expandable(ExpandableEntry {
                id: ENDPOINTS_SECTION_ID.to_string(),
                title: self.labels.endpoints.title.clone(),
                icon: Some(self.labels.endpoints.icon.clone()),
                children: groups.into_iter().map(|g| g.into_entry()).collect(),
            }));
        }

        if spec.schema_count() > 0 {
            entries.push(self.section(SCHEMAS_SECTION_ID, &self.labels.schemas));
        }

        entries.extend(sections.iter().map(|s| {
            MenuEntry::Section(SectionEntry {
                id: s.menu_id(),
                title: s.title.clone(),
                icon: Some(s.icon.clone().unwrap_or_else(|| self.content_icon.clone())),
                is_cms: true,
            })
        }));

        debug!("menu built with {} top-level entries", entries.len());
        Ok(entries)
    }

    /// Build from an untyped document, rejecting anything that is not a
    /// structurally valid OpenAPI object.
    pub fn build_from_value(
        &self,
        document: &serde_json::Value,
        sections: &[ContentSection],
    ) -> Result<Vec<MenuEntry>, MenuError> {
        if !document.is_object() {
            return Err(MenuError::InvalidInput(
                "specification document must be an object".to_string(),
            ));
        }
        let spec: OpenApiSpec = serde_json::from_value(document.clone())
            .map_err(|e| MenuError::InvalidInput(e.to_string()))?;
        self.build(Some(&spec), sections)
    }

    fn section(&self, id: &str, label: &Label) -> MenuEntry {
        MenuEntry::Section(SectionEntry {
            id: id.to_string(),
            title: label.title.clone(),
            icon: Some(label.icon.clone()),
            is_cms: false,
        })
    }
}

/// Build a menu with the default labels.
pub fn build_menu(
    spec: Option<&OpenApiSpec>,
    sections: &[ContentSection],
) -> Result<Vec<MenuEntry>, MenuError> {
    MenuBuilder::default().build(spec, sections)
}

/// Build a menu with the default labels from an untyped document.
pub fn build_menu_from_value(
    document: &serde_json::Value,
    sections: &[ContentSection],
) -> Result<Vec<MenuEntry>, MenuError> {
    MenuBuilder::default().build_from_value(document, sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(id: &str) -> MenuEntry {
        MenuEntry::Endpoint(EndpointEntry {
            id: id.to_string(),
            title: id.to_string(),
            path: "/".to_string(),
            method: "GET".to_string(),
            parent_group_id: "tag-a".to_string(),
        })
    }

    fn tree() -> Vec<MenuEntry> {
        vec![
            MenuEntry::Section(SectionEntry {
                id: "info-section".into(),
                title: "Information".into(),
                icon: None,
                is_cms: false,
            }),
            MenuEntry::Expandable(ExpandableEntry {
                id: "endpoints-section".into(),
                title: "Endpoints".into(),
                icon: None,
                children: vec![MenuEntry::Expandable(ExpandableEntry {
                    id: "tag-a".into(),
                    title: "A".into(),
                    icon: None,
                    children: vec![endpoint("operation-get-a")],
                })],
            }),
        ]
    }

    #[test]
    fn test_ancestors_of_leaf() {
        assert_eq!(
            ancestors_of(&tree(), "operation-get-a"),
            vec!["endpoints-section".to_string(), "tag-a".to_string()]
        );
    }

    #[test]
    fn test_ancestors_of_group_and_top_level() {
        assert_eq!(ancestors_of(&tree(), "tag-a"), vec!["endpoints-section".to_string()]);
        assert!(ancestors_of(&tree(), "info-section").is_empty());
        assert!(ancestors_of(&tree(), "missing").is_empty());
    }

    #[test]
    fn test_ancestor_index_skips_top_level() {
        let index = ancestor_index(&tree());
        assert_eq!(index.len(), 2);
        assert_eq!(index["tag-a"], vec!["endpoints-section".to_string()]);
        assert!(!index.contains_key("endpoints-section"));
    }

    #[test]
    fn test_missing_document_is_invalid_input() {
        let err = build_menu(None, &[]).unwrap_err();
        assert!(matches!(err, MenuError::InvalidInput(_)));
    }

    #[test]
    fn test_non_object_document_is_invalid_input() {
        let builder = MenuBuilder::default();
        let err = builder
            .build_from_value(&serde_json::json!(["not", "a", "spec"]), &[])
            .unwrap_err();
        assert!(matches!(err, MenuError::InvalidInput(_)));

        let err = build_menu_from_value(&serde_json::json!({"servers": "nope"}), &[]).unwrap_err();
        assert!(matches!(err, MenuError::InvalidInput(_)));

        let menu = build_menu_from_value(&serde_json::json!({"info": {"title": "t"}}), &[]).unwrap();
        assert_eq!(menu.len(), 1);
    }

    #[test]
    fn test_entries_serialize_with_type_tag() {
        let value = serde_json::to_value(&tree()[0]).unwrap();
        assert_eq!(value["type"], "section");
        assert_eq!(value["isCms"], false);
    }
}

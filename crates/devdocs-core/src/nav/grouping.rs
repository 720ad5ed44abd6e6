use indexmap::IndexMap;
use log::debug;

use super::menu::{EndpointEntry, ExpandableEntry, MenuEntry};
use super::slug::slugify;
use crate::parse::operation::PathItem;
use crate::parse::spec::Tag;

/// Group name for operations that declare no tags.
pub const FALLBACK_TAG: &str = "General";

/// A tag group in the endpoints menu.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    pub id: String,
    pub title: String,
    pub endpoints: Vec<EndpointEntry>,
}

impl GroupEntry {
    /// Convert into an expandable menu entry holding the endpoints.
    pub fn into_entry(self) -> MenuEntry {
        MenuEntry::Expandable(ExpandableEntry {
            id: self.id,
            title: self.title,
            icon: None,
            children: self
                .endpoints
                .into_iter()
                .map(MenuEntry::Endpoint)
                .collect(),
        })
    }
}

/// Group operations by their first tag, untagged ones under [`FALLBACK_TAG`].
pub fn group_by_tag(paths: &IndexMap<String, PathItem>, tags: &[Tag]) -> Vec<GroupEntry> {
    group_by_tag_with_fallback(paths, tags, FALLBACK_TAG)
}

/// Group operations by their first tag.
///
/// Groups appear in the order their tag is first encountered while walking
/// paths and methods in declaration order; endpoints keep encounter order
/// inside their group.
pub fn group_by_tag_with_fallback(
    paths: &IndexMap<String, PathItem>,
    tags: &[Tag],
    fallback: &str,
) -> Vec<GroupEntry> {
    let labels: IndexMap<&str, &str> = tags.iter().map(|t| (t.name.as_str(), t.label())).collect();
    let mut groups: IndexMap<&str, GroupEntry> = IndexMap::new();

    for (path, item) in paths {
        for (method, operation) in item.operations() {
            let key = operation.primary_tag().unwrap_or(fallback);

            let group = groups.entry(key).or_insert_with(|| GroupEntry {
                id: format!("tag-{}", slugify(key)),
                title: labels.get(key).copied().unwrap_or(key).to_string(),
                endpoints: Vec::new(),
            });

            group.endpoints.push(EndpointEntry {
                id: format!("operation-{}-{}", method.as_key(), slugify(path)),
                title: operation
                    .summary
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| path.clone()),
                path: path.clone(),
                method: method.as_str().to_string(),
                parent_group_id: group.id.clone(),
            });
        }
    }

    debug!("grouped {} path(s) into {} tag group(s)", paths.len(), groups.len());
    groups.into_values().collect()
}

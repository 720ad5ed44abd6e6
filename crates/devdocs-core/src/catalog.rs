//! Project and repository catalog: kind filter, text search and view mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownFilter;

/// Queries shorter than this show the whole catalog.
pub const MIN_QUERY_LEN: usize = 2;

const PORTAL_ROOT: &str = "/devportal/dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Project,
    Repository,
}

impl ItemKind {
    fn collection(self) -> &'static str {
        match self {
            ItemKind::Project => "projects",
            ItemKind::Repository => "repositories",
        }
    }

    fn prefix(self) -> char {
        match self {
            ItemKind::Project => 'P',
            ItemKind::Repository => 'R',
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Project => f.write_str("project"),
            ItemKind::Repository => f.write_str("repository"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogItem {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Which kinds the catalog shows.
///
/// Written as `all`, `project` or `repository`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KindFilter {
    #[default]
    All,
    Only(ItemKind),
}

impl FromStr for KindFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(KindFilter::All),
            "project" => Ok(KindFilter::Only(ItemKind::Project)),
            "repository" => Ok(KindFilter::Only(ItemKind::Repository)),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

impl TryFrom<String> for KindFilter {
    type Error = UnknownFilter;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::All => f.write_str("all"),
            KindFilter::Only(kind) => kind.fmt(f),
        }
    }
}

impl From<KindFilter> for String {
    fn from(filter: KindFilter) -> Self {
        filter.to_string()
    }
}

impl KindFilter {
    pub fn admits(self, kind: ItemKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(wanted) => wanted == kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Why the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// A search is active and matched nothing.
    Search,
    /// Nothing passes the kind filter.
    NoItems,
}

/// Current view over the catalog items.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    items: Vec<CatalogItem>,
    filter: KindFilter,
    query: String,
    mode: ViewMode,
}

impl CatalogView {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.mode = match self.mode {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        };
        self.mode
    }

    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    /// Returns `false` when the filter was already selected.
    pub fn set_filter(&mut self, filter: KindFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    fn search_active(&self) -> bool {
        self.query.chars().count() >= MIN_QUERY_LEN
    }

    /// Items passing both the kind filter and the search, in catalog order.
    pub fn visible(&self) -> Vec<&CatalogItem> {
        let needle = self.search_active().then(|| self.query.to_lowercase());
        self.items
            .iter()
            .filter(|item| self.filter.admits(item.kind))
            .filter(|item| needle.as_deref().is_none_or(|n| item.matches(n)))
            .collect()
    }

    pub fn empty_state(&self) -> Option<EmptyReason> {
        if !self.visible().is_empty() {
            return None;
        }
        if self.search_active() {
            Some(EmptyReason::Search)
        } else {
            Some(EmptyReason::NoItems)
        }
    }
}

/// Portal URL of an item's detail page.
pub fn detail_path(owner: &str, kind: ItemKind, id: &str) -> String {
    format!(
        "{PORTAL_ROOT}/{owner}/{}/{}-{id}",
        kind.collection(),
        kind.prefix()
    )
}

pub fn edit_path(owner: &str, kind: ItemKind, id: &str) -> String {
    format!("{}/edit", detail_path(owner, kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, kind: ItemKind, title: &str, description: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    fn catalog() -> CatalogView {
        CatalogView::new(vec![
            item("1", ItemKind::Project, "Payments API", Some("Card processing")),
            item("2", ItemKind::Repository, "payments-sdk", None),
            item("3", ItemKind::Project, "Identity", Some("OAuth2 flows for PAYMENTS")),
            item("4", ItemKind::Repository, "docs-site", Some("Static docs")),
        ])
    }

    fn ids(view: &CatalogView) -> Vec<&str> {
        view.visible().into_iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_short_query_shows_everything() {
        let mut view = catalog();
        view.set_query("p");
        assert_eq!(ids(&view), vec!["1", "2", "3", "4"]);
        assert_eq!(view.empty_state(), None);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let mut view = catalog();
        view.set_query("Payments");
        assert_eq!(ids(&view), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_filter_and_search_combine() {
        let mut view = catalog();
        assert!(view.set_filter(KindFilter::Only(ItemKind::Project)));
        assert!(!view.set_filter(KindFilter::Only(ItemKind::Project)));
        view.set_query("pay");
        assert_eq!(ids(&view), vec!["1", "3"]);
    }

    #[test]
    fn test_empty_state_reason() {
        let mut view = catalog();
        view.set_query("zzz");
        assert_eq!(view.empty_state(), Some(EmptyReason::Search));

        let mut view = CatalogView::new(vec![item("9", ItemKind::Project, "Solo", None)]);
        view.set_filter(KindFilter::Only(ItemKind::Repository));
        assert_eq!(view.empty_state(), Some(EmptyReason::NoItems));
    }

    #[test]
    fn test_toggle_view() {
        let mut view = catalog();
        assert_eq!(view.mode(), ViewMode::Grid);
        assert_eq!(view.toggle_view(), ViewMode::List);
        assert_eq!(view.toggle_view(), ViewMode::Grid);
    }

    #[test]
    fn test_detail_paths() {
        assert_eq!(
            detail_path("ana", ItemKind::Project, "12"),
            "/devportal/dev/ana/projects/P-12"
        );
        assert_eq!(
            edit_path("ana", ItemKind::Repository, "7"),
            "/devportal/dev/ana/repositories/R-7/edit"
        );
    }

    #[test]
    fn test_filter_wire_form() {
        let all: KindFilter = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(all, KindFilter::All);
        let only: KindFilter = serde_json::from_str(r#""repository""#).unwrap();
        assert_eq!(only, KindFilter::Only(ItemKind::Repository));
        assert_eq!(serde_json::to_string(&only).unwrap(), r#""repository""#);
        assert!("projects".parse::<KindFilter>().is_err());
    }
}

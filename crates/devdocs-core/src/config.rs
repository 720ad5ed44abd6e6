use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::nav::{FALLBACK_TAG, MenuBuilder, MenuEntry, MenuLabels};
use crate::nav::content::DEFAULT_CONTENT_ICON;
use crate::spy::{ActiveSectionTracker, DEFAULT_FIXED_OFFSET, DEFAULT_HEADER_MARGIN};

/// Top-level project configuration loaded from `.devdocs.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevdocsConfig {
    /// OpenAPI document to build the navigation from.
    pub input: String,
    /// Optional CMS section list (JSON or YAML).
    pub sections: Option<String>,
    pub menu: MenuConfig,
    pub spy: SpyConfig,
    pub site: SiteConfig,
    pub store: StoreConfig,
}

impl Default for DevdocsConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            sections: None,
            menu: MenuConfig::default(),
            spy: SpyConfig::default(),
            site: SiteConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl DevdocsConfig {
    pub fn menu_builder(&self) -> MenuBuilder {
        MenuBuilder {
            labels: self.menu.labels.clone(),
            fallback_tag: self.menu.fallback_tag.clone(),
            content_icon: self.menu.content_icon.clone(),
        }
    }

    /// A scroll-spy tracker for `menu` with the configured geometry.
    pub fn tracker(&self, menu: &[MenuEntry]) -> ActiveSectionTracker {
        ActiveSectionTracker::with_offset(menu, self.spy.fixed_offset)
            .with_header_margin(self.spy.header_margin)
    }
}

/// Section labels and grouping defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub labels: MenuLabels,
    /// Group title for operations without tags.
    pub fallback_tag: String,
    /// Icon for CMS sections that do not set one.
    pub content_icon: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            labels: MenuLabels::default(),
            fallback_tag: FALLBACK_TAG.to_string(),
            content_icon: DEFAULT_CONTENT_ICON.to_string(),
        }
    }
}

/// Scroll-spy geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpyConfig {
    /// Added to the scroll position before locating the section.
    pub fixed_offset: f64,
    /// Gap left above a section when jumping to it.
    pub header_margin: f64,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            fixed_offset: DEFAULT_FIXED_OFFSET,
            header_margin: DEFAULT_HEADER_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Page URL used to build share links.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database the provisioning script switches to.
    pub database: Option<String>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".devdocs.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<DevdocsConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# devdocs configuration
input: openapi.yaml
# sections: sections.json     # CMS sections appended after the API sections

menu:
  fallback_tag: General       # group for operations without tags
  content_icon: fa-file-lines
  labels:
    info:      { title: Information,    icon: fa-info-circle }
    servers:   { title: Servers,        icon: fa-server }
    security:  { title: Authentication, icon: fa-shield-halved }
    endpoints: { title: Endpoints,      icon: fa-plug }
    schemas:   { title: Models,         icon: fa-cube }

spy:
  fixed_offset: 100           # fixed header height compensation
  header_margin: 80           # gap above a section after a menu jump

# site:
#   base_url: https://portal.example.com/docs/payments   # share links

# store:
#   database: devportal       # selected by the provisioning script
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DevdocsConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert!(config.sections.is_none());
        assert_eq!(config.menu.fallback_tag, "General");
        assert_eq!(config.menu.labels.schemas.title, "Models");
        assert_eq!(config.spy.fixed_offset, 100.0);
        assert_eq!(config.spy.header_margin, 80.0);
        assert!(config.site.base_url.is_none());
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config: DevdocsConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config, DevdocsConfig::default());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: contracts/payments.json
sections: cms.yaml
menu:
  fallback_tag: Misc
  labels:
    schemas:
      title: Schemas
      icon: fa-sitemap
spy:
  fixed_offset: 64
site:
  base_url: https://portal.example.com/docs
store:
  database: devportal
"#;
        let config: DevdocsConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "contracts/payments.json");
        assert_eq!(config.sections.as_deref(), Some("cms.yaml"));
        assert_eq!(config.menu.fallback_tag, "Misc");
        assert_eq!(config.menu.labels.schemas.icon, "fa-sitemap");
        // Untouched labels keep their defaults
        assert_eq!(config.menu.labels.info.title, "Information");
        assert_eq!(config.spy.fixed_offset, 64.0);
        assert_eq!(config.spy.header_margin, 80.0);
        assert_eq!(
            config.site.base_url,
            Some("https://portal.example.com/docs".to_string())
        );
        assert_eq!(config.store.database.as_deref(), Some("devportal"));
    }

    #[test]
    fn test_menu_builder_uses_config() {
        let mut config = DevdocsConfig::default();
        config.menu.fallback_tag = "Other".to_string();
        let builder = config.menu_builder();
        assert_eq!(builder.fallback_tag, "Other");
        assert_eq!(builder.content_icon, "fa-file-lines");
    }

    #[test]
    fn test_tracker_uses_spy_geometry() {
        let config: DevdocsConfig =
            serde_yaml_ng::from_str("spy:\n  fixed_offset: 60\n  header_margin: 24\n").unwrap();
        let mut tracker = config.tracker(&[]);
        assert_eq!(tracker.fixed_offset(), 60.0);
        assert_eq!(tracker.header_margin(), 24.0);

        let boundaries = vec![crate::spy::SectionBoundary::new("servers-section", 300.0, 200.0)];
        assert_eq!(tracker.jump_to("servers-section", &boundaries), Some(276.0));
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(load_config(&path).unwrap().is_none());

        std::fs::write(&path, "input: api.yaml\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.input, "api.yaml");
        assert_eq!(config.spy.fixed_offset, 100.0);

        std::fs::write(&path, "spy: fast\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

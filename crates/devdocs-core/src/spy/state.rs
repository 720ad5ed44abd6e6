use indexmap::IndexSet;

/// Active and expanded markings of the rendered navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    active: Option<String>,
    expanded: IndexSet<String>,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Expanded group ids, in the order they were first expanded.
    pub fn expanded(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    /// Replace the active marking. Only one entry is ever active.
    pub fn activate(&mut self, id: impl Into<String>) {
        self.active = Some(id.into());
    }

    pub fn expand(&mut self, id: impl Into<String>) {
        self.expanded.insert(id.into());
    }

    /// Flip a group open or closed, as a click on its header does.
    /// Returns whether the group is now expanded.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.shift_remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    /// Drop all markings, as when the menu is rebuilt.
    pub fn reset(&mut self) {
        self.active = None;
        self.expanded.clear();
    }
}

/// Shareable link to a section: `base` without its fragment, plus `#id`.
pub fn share_link(base: &str, section_id: &str) -> String {
    let base = base.split_once('#').map_or(base, |(head, _)| head);
    format!("{base}#{section_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_active_entry() {
        let mut state = NavState::new();
        state.activate("a");
        state.activate("b");
        assert!(state.is_active("b"));
        assert!(!state.is_active("a"));
    }

    #[test]
    fn test_toggle_expanded() {
        let mut state = NavState::new();
        assert!(state.toggle_expanded("endpoints-section"));
        assert!(state.is_expanded("endpoints-section"));
        assert!(!state.toggle_expanded("endpoints-section"));
        assert!(!state.is_expanded("endpoints-section"));
    }

    #[test]
    fn test_share_link_replaces_fragment() {
        assert_eq!(
            share_link("https://portal.example.com/docs/api/7#old", "tag-users"),
            "https://portal.example.com/docs/api/7#tag-users"
        );
        assert_eq!(share_link("/docs", "info-section"), "/docs#info-section");
    }
}

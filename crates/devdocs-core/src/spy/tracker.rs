use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::state::NavState;
use super::throttle::FrameThrottle;
use crate::nav::{MenuEntry, ancestor_index};

/// Distance added to the scroll position to compensate for the fixed header.
pub const DEFAULT_FIXED_OFFSET: f64 = 100.0;

/// Gap left above a section after a menu jump.
pub const DEFAULT_HEADER_MARGIN: f64 = 80.0;

/// Vertical extent of a rendered section, measured at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBoundary {
    pub id: String,
    #[serde(rename = "offsetTop")]
    pub offset_top: f64,
    pub height: f64,
}

impl SectionBoundary {
    pub fn new(id: impl Into<String>, offset_top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            offset_top,
            height,
        }
    }

    /// Half-open containment: the top edge is inside, the bottom edge is not.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.offset_top && position < self.offset_top + self.height
    }
}

/// The section containing `position`. When boundaries overlap, the last one
/// in document order wins.
pub fn locate_section(position: f64, boundaries: &[SectionBoundary]) -> Option<&SectionBoundary> {
    boundaries.iter().rfind(|b| b.contains(position))
}

/// Scroll position that brings a section's top just below the fixed header.
pub fn scroll_target(section_top: f64, header_margin: f64) -> f64 {
    section_top - header_margin
}

/// Tracks the active section and expands the groups that enclose it.
///
/// Starts with nothing active. A position outside every boundary leaves the
/// current state untouched, and groups are never collapsed by scrolling.
#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    fixed_offset: f64,
    header_margin: f64,
    ancestors: HashMap<String, Vec<String>>,
    state: NavState,
}

impl ActiveSectionTracker {
    pub fn new(menu: &[MenuEntry]) -> Self {
        Self::with_offset(menu, DEFAULT_FIXED_OFFSET)
    }

    pub fn with_offset(menu: &[MenuEntry], fixed_offset: f64) -> Self {
        Self {
            fixed_offset,
            header_margin: DEFAULT_HEADER_MARGIN,
            ancestors: ancestor_index(menu),
            state: NavState::new(),
        }
    }

    /// Point the tracker at a freshly built menu. Markings are dropped.
    pub fn set_menu(&mut self, menu: &[MenuEntry]) {
        self.ancestors = ancestor_index(menu);
        self.state.reset();
    }

    pub fn with_header_margin(mut self, header_margin: f64) -> Self {
        self.header_margin = header_margin;
        self
    }

    pub fn fixed_offset(&self) -> f64 {
        self.fixed_offset
    }

    pub fn header_margin(&self) -> f64 {
        self.header_margin
    }

    /// Handle a click on the menu entry `id`: activate it and return the
    /// scroll position that shows its section below the header. `None` when
    /// the section is not on the page; nothing changes then.
    pub fn jump_to(&mut self, id: &str, boundaries: &[SectionBoundary]) -> Option<f64> {
        let boundary = boundaries.iter().find(|b| b.id == id)?;
        self.activate(id);
        Some(scroll_target(boundary.offset_top, self.header_margin))
    }

    /// Evaluate the section under `scroll_y` and reconcile it with the
    /// active one. Returns the containing section, if any.
    pub fn evaluate(&mut self, scroll_y: f64, boundaries: &[SectionBoundary]) -> Option<String> {
        let position = scroll_y + self.fixed_offset;
        let found = locate_section(position, boundaries)?.id.clone();
        self.activate(&found);
        Some(found)
    }

    /// Make `id` the active section and expand its enclosing groups.
    /// Returns `false` when it was already active.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.state.is_active(id) {
            return false;
        }

        debug!(
            "active section {} -> {}",
            self.state.active().unwrap_or("<none>"),
            id
        );
        self.state.activate(id);
        if let Some(groups) = self.ancestors.get(id) {
            for group in groups {
                self.state.expand(group.clone());
            }
        }
        true
    }

    pub fn active(&self) -> Option<&str> {
        self.state.active()
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut NavState {
        &mut self.state
    }
}

/// A tracker driven by a scroll event stream, evaluated at most once per frame.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    tracker: ActiveSectionTracker,
    throttle: FrameThrottle,
    scroll_y: f64,
}

impl ScrollSpy {
    pub fn new(tracker: ActiveSectionTracker) -> Self {
        Self {
            tracker,
            throttle: FrameThrottle::new(),
            scroll_y: 0.0,
        }
    }

    /// Record a scroll event. Returns `true` when the host must schedule a
    /// frame callback.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        self.scroll_y = scroll_y;
        self.throttle.on_scroll()
    }

    /// Run the scheduled evaluation against the latest scroll position.
    /// Boundaries are re-measured by the caller on every frame.
    pub fn on_frame(&mut self, boundaries: &[SectionBoundary]) -> Option<String> {
        if !self.throttle.on_frame() {
            return None;
        }
        self.tracker.evaluate(self.scroll_y, boundaries)
    }

    pub fn tracker(&self) -> &ActiveSectionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ActiveSectionTracker {
        &mut self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_containment() {
        let b = SectionBoundary::new("a", 100.0, 50.0);
        assert!(b.contains(100.0));
        assert!(b.contains(149.9));
        assert!(!b.contains(150.0));
        assert!(!b.contains(99.9));
    }

    #[test]
    fn test_last_overlapping_boundary_wins() {
        let boundaries = vec![
            SectionBoundary::new("a", 0.0, 200.0),
            SectionBoundary::new("b", 150.0, 200.0),
        ];
        assert_eq!(locate_section(200.0, &boundaries).unwrap().id, "b");
        assert_eq!(locate_section(100.0, &boundaries).unwrap().id, "a");
        assert!(locate_section(400.0, &boundaries).is_none());
    }

    #[test]
    fn test_scroll_target_subtracts_margin() {
        assert_eq!(scroll_target(500.0, 80.0), 420.0);
    }

    #[test]
    fn test_boundary_wire_names() {
        let b: SectionBoundary =
            serde_json::from_str(r#"{"id": "x", "offsetTop": 10, "height": 5.5}"#).unwrap();
        assert_eq!(b, SectionBoundary::new("x", 10.0, 5.5));
    }
}

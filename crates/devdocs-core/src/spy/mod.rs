//! Scroll-spy: tracks which documentation section is currently in view and
//! keeps the navigation's active/expanded state in sync with it.

pub mod state;
pub mod throttle;
pub mod tracker;

pub use state::{NavState, share_link};
pub use throttle::FrameThrottle;
pub use tracker::{
    ActiveSectionTracker, DEFAULT_FIXED_OFFSET, DEFAULT_HEADER_MARGIN, ScrollSpy,
    SectionBoundary, locate_section, scroll_target,
};

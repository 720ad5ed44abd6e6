pub mod content;
pub mod grouping;
pub mod menu;
pub mod slug;

pub use content::ContentSection;
pub use grouping::{FALLBACK_TAG, GroupEntry, group_by_tag};
pub use menu::{
    EndpointEntry, ExpandableEntry, MenuBuilder, MenuEntry, MenuLabels, SectionEntry,
    ancestor_index, ancestors_of, build_menu, build_menu_from_value,
};
pub use slug::slugify;

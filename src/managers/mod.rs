// Prism state managers
// Managers own stateful collections: tabs and bookmarks.

pub mod bookmark_manager;
pub mod tab_manager;

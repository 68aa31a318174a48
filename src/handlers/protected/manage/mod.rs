pub mod affiliation;
pub mod menu;

pub use affiliation::affiliation_tree;
pub use menu::{menu_permission_codes, menu_permission_tree, menu_summary_tree, menu_tree, page_list};

//! Hierarchy engine: recursive tree resolution, permission trees and
//! role-scoped menu filters.

pub mod access;
pub mod error;
pub mod node;
pub mod permission;
pub mod resolver;

pub use access::{constant_route_filter, user_visible_menu_filter, MenuScope};
pub use error::TreeError;
pub use node::{HierarchyNode, TreeNode, ROOT_ID};
pub use permission::{build_permission_tree, prune_permission_tree, transform_permission_tree, PermissionNode};
pub use resolver::{KeywordScope, TreeQuery, TreeResolver};

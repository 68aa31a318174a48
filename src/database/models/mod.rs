pub mod affiliation;
pub mod menu;
pub mod role;
pub mod user;

pub use affiliation::Affiliation;
pub use menu::{IconType, Menu, MenuSummary, MenuType, PermissionKind, RouteQuery, SubPermission};
pub use role::Role;
pub use user::User;

use serde::{Deserialize, Serialize};

/// Seed data for the in-memory store, one array per table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub menus: Vec<Menu>,
    pub affiliations: Vec<Affiliation>,
    pub roles: Vec<Role>,
    pub users: Vec<User>,
}

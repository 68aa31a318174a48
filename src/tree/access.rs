use serde_json::{json, Value};

use crate::database::models::{Role, User};

/// Which menus a user may see, expressed as extra resolver filters
#[derive(Debug, Clone, PartialEq)]
pub enum MenuScope {
    Filter(Vec<Value>),
    /// No accessible menus; callers skip the query entirely
    Empty,
}

impl MenuScope {
    pub fn is_empty(&self) -> bool {
        matches!(self, MenuScope::Empty)
    }
}

/// Menu filter for a user's routes. `role` is the user's role, already loaded.
///
/// Admins see every enabled non-constant menu. Everyone else is limited to the
/// ids listed on an enabled role, matched at every depth.
pub fn user_visible_menu_filter(user: &User, role: Option<&Role>) -> MenuScope {
    let mut filters = vec![json!({ "constant": false }), json!({ "status": true })];
    if user.is_admin {
        return MenuScope::Filter(filters);
    }

    let role = match role {
        Some(role) if user.role_id == Some(role.id) && role.status && !role.menu_ids.is_empty() => role,
        _ => return MenuScope::Empty,
    };

    let ids: Vec<Value> = role.menu_ids.iter().map(|id| json!({ "id": id })).collect();
    filters.push(json!({ "$or": ids }));
    MenuScope::Filter(filters)
}

/// Routes every visitor receives, regardless of role
pub fn constant_route_filter() -> Vec<Value> {
    vec![json!({ "constant": true })]
}

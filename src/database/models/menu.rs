use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::database::record::Record;
use crate::tree::node::HierarchyNode;

/// Stored as an integer in both Postgres and JSON: 1 = directory, 2 = route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum MenuType {
    #[default]
    Directory = 1,
    Route = 2,
}

impl From<MenuType> for i32 {
    fn from(value: MenuType) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for MenuType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MenuType::Directory),
            2 => Ok(MenuType::Route),
            other => Err(format!("unknown menu type: {}", other)),
        }
    }
}

/// 1 = iconify icon name, 2 = local svg icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum IconType {
    #[default]
    Iconify = 1,
    Local = 2,
}

impl From<IconType> for i32 {
    fn from(value: IconType) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for IconType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(IconType::Iconify),
            2 => Ok(IconType::Local),
            other => Err(format!("unknown icon type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub key: String,
    pub value: String,
}

/// A button or interface permission attached to a menu
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubPermission {
    pub code: String,
    pub description: String,
}

/// Which sub-permission list of a menu to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Buttons,
    Interfaces,
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionKind::Buttons => write!(f, "buttons"),
            PermissionKind::Interfaces => write!(f, "interfaces"),
        }
    }
}

impl FromStr for PermissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buttons" | "button" => Ok(PermissionKind::Buttons),
            "interfaces" | "interface" => Ok(PermissionKind::Interfaces),
            other => Err(format!("unknown permission kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Menu {
    pub id: i64,
    /// Parent menu id, 0 for top-level menus
    pub node_id: i64,
    pub component: String,
    pub menu_name: String,
    pub menu_type: MenuType,
    pub route_name: String,
    pub route_path: String,
    pub i18n_key: Option<String>,
    pub order: i32,
    pub icon_type: IconType,
    pub icon: String,
    pub status: bool,
    pub hide_in_menu: bool,
    pub multi_tab: bool,
    pub keep_alive: bool,
    pub href: Option<String>,
    /// Constant routes are visible without logging in
    pub constant: bool,
    pub fixed_index_in_tab: Option<i32>,
    pub homepage: bool,
    pub query: Json<Vec<RouteQuery>>,
    pub buttons: Json<Vec<SubPermission>>,
    pub interfaces: Json<Vec<SubPermission>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            id: 0,
            node_id: 0,
            component: String::new(),
            menu_name: String::new(),
            menu_type: MenuType::Directory,
            route_name: String::new(),
            route_path: String::new(),
            i18n_key: None,
            order: 1,
            icon_type: IconType::Iconify,
            icon: String::new(),
            status: true,
            hide_in_menu: false,
            multi_tab: false,
            keep_alive: false,
            href: None,
            constant: false,
            fixed_index_in_tab: None,
            homepage: true,
            query: Json(Vec::new()),
            buttons: Json(Vec::new()),
            interfaces: Json(Vec::new()),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Menu {
    pub fn permissions(&self, kind: PermissionKind) -> &[SubPermission] {
        match kind {
            PermissionKind::Buttons => &self.buttons.0,
            PermissionKind::Interfaces => &self.interfaces.0,
        }
    }
}

impl Record for Menu {
    const TABLE: &'static str = "menus";
}

impl HierarchyNode for Menu {
    const KEYWORD_FIELDS: &'static [&'static str] = &["menu_name", "route_name", "route_path"];

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> i64 {
        self.node_id
    }

    fn label(&self) -> &str {
        &self.menu_name
    }
}

/// Menu projection used by the simplified tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct MenuSummary {
    pub id: i64,
    pub node_id: i64,
    pub menu_name: String,
}

impl Record for MenuSummary {
    const TABLE: &'static str = "menus";
}

impl HierarchyNode for MenuSummary {
    const KEYWORD_FIELDS: &'static [&'static str] = &["menu_name"];

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> i64 {
        self.node_id
    }

    fn label(&self) -> &str {
        &self.menu_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn menu_type_is_an_integer_on_the_wire() {
        let menu = Menu { menu_type: MenuType::Route, ..Default::default() };
        let value = serde_json::to_value(&menu).unwrap();
        assert_eq!(value["menu_type"], json!(2));
        assert_eq!(value["icon_type"], json!(1));
        assert!(serde_json::from_value::<MenuType>(json!(3)).is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let menu: Menu = serde_json::from_value(json!({ "id": 4, "menu_name": "Home" })).unwrap();
        assert_eq!(menu.node_id, 0);
        assert!(menu.status);
        assert!(menu.buttons.0.is_empty());
    }

    #[test]
    fn permission_kind_parses_case_insensitively() {
        assert_eq!("Buttons".parse::<PermissionKind>().unwrap(), PermissionKind::Buttons);
        assert_eq!("interface".parse::<PermissionKind>().unwrap(), PermissionKind::Interfaces);
        assert!("routes".parse::<PermissionKind>().is_err());
    }
}

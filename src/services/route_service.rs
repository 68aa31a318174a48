use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::database::models::{IconType, Menu, MenuType, Role, RouteQuery, User};
use crate::database::RecordStore;
use crate::filter::FilterData;
use crate::tree::{constant_route_filter, user_visible_menu_filter, MenuScope, TreeError, TreeNode, TreeQuery, TreeResolver};

/// Front-end route metadata derived from a menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub title: String,
    pub i18n_key: Option<String>,
    pub keep_alive: bool,
    pub constant: bool,
    pub icon: Option<String>,
    pub local_icon: Option<String>,
    pub order: Option<i32>,
    pub href: Option<String>,
    pub hide_in_menu: bool,
    pub multi_tab: bool,
    pub fixed_index_in_tab: Option<i32>,
    pub query: Vec<RouteQuery>,
    pub homepage: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTree {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub component: String,
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RouteTree>>,
}

impl From<&Menu> for RouteMeta {
    fn from(menu: &Menu) -> Self {
        Self {
            title: menu.menu_name.clone(),
            i18n_key: menu.i18n_key.clone(),
            keep_alive: menu.keep_alive,
            constant: menu.constant,
            icon: (menu.icon_type == IconType::Iconify).then(|| menu.icon.clone()),
            local_icon: (menu.icon_type == IconType::Local).then(|| menu.icon.clone()),
            order: (menu.order != 0).then_some(menu.order),
            href: menu.href.clone(),
            hide_in_menu: menu.hide_in_menu,
            multi_tab: menu.multi_tab,
            fixed_index_in_tab: menu.fixed_index_in_tab,
            query: menu.query.0.clone(),
            homepage: menu.homepage,
        }
    }
}

/// Convert a resolved menu tree into front-end routes. Only directories carry children.
pub fn transform_routes(menu_tree: &[TreeNode<Menu>]) -> Vec<RouteTree> {
    menu_tree
        .iter()
        .map(|item| {
            let menu = &item.node;
            let children = (menu.menu_type == MenuType::Directory && !item.children.is_empty())
                .then(|| transform_routes(&item.children));
            RouteTree {
                id: menu.id,
                name: menu.route_name.clone(),
                path: menu.route_path.clone(),
                component: menu.component.clone(),
                meta: RouteMeta::from(menu),
                children,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct RouteService<S> {
    store: S,
}

impl<S: RecordStore> RouteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Routes every visitor receives
    pub async fn constant_route_tree(&self) -> Result<Vec<RouteTree>, TreeError> {
        let query = TreeQuery::root().with_filters(constant_route_filter());
        let menus = TreeResolver::new(&self.store).resolve::<Menu>(&query).await?;
        Ok(transform_routes(&menus))
    }

    /// Routes visible to `user` through their role, or all of them for admins
    pub async fn user_route_tree(&self, user: &User, role: Option<&Role>) -> Result<Vec<RouteTree>, TreeError> {
        let filters = match user_visible_menu_filter(user, role) {
            MenuScope::Filter(filters) => filters,
            MenuScope::Empty => {
                debug!(user_id = user.id, "User has no accessible menus");
                return Ok(Vec::new());
            }
        };

        let query = TreeQuery::root().with_filters(filters);
        let menus = TreeResolver::new(&self.store).resolve::<Menu>(&query).await?;
        Ok(transform_routes(&menus))
    }

    pub async fn route_exists(&self, route_name: &str) -> Result<bool, TreeError> {
        let filter = FilterData {
            where_clause: Some(json!({ "route_name": route_name })),
            ..Default::default()
        };
        Ok(self.store.count::<Menu>(filter).await? > 0)
    }
}

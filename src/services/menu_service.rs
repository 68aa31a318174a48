use serde_json::json;
use tracing::debug;

use crate::database::models::{Menu, MenuSummary, MenuType, PermissionKind, SubPermission};
use crate::database::RecordStore;
use crate::filter::FilterData;
use crate::tree::{build_permission_tree, PermissionNode, TreeError, TreeNode, TreeQuery, TreeResolver};
use crate::types::{PageRequest, Pagination};

/// Read models of the menu table for the management screens
#[derive(Clone)]
pub struct MenuService<S> {
    store: S,
}

impl<S: RecordStore> MenuService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Paginated menu tree below `node_id`, keyword matched on name, route name and path
    pub async fn menu_tree(
        &self,
        node_id: i64,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Pagination<TreeNode<Menu>>, TreeError> {
        let query = TreeQuery::children_of(node_id).with_keyword(keyword);
        TreeResolver::new(&self.store).resolve_page::<Menu>(&query, page).await
    }

    pub async fn menu_summary_tree(&self) -> Result<Vec<TreeNode<MenuSummary>>, TreeError> {
        TreeResolver::new(&self.store).resolve::<MenuSummary>(&TreeQuery::root()).await
    }

    pub async fn menu_permission_tree(&self, kind: PermissionKind) -> Result<Vec<PermissionNode>, TreeError> {
        let menus = TreeResolver::new(&self.store).resolve::<Menu>(&TreeQuery::root()).await?;
        let tree = build_permission_tree(&menus, kind);
        debug!(%kind, groups = tree.len(), "Built permission tree");
        Ok(tree)
    }

    /// Every `kind` entry across all menus, optionally skipping one menu
    pub async fn menu_permission_list(
        &self,
        kind: PermissionKind,
        exclude_menu: Option<i64>,
    ) -> Result<Vec<SubPermission>, TreeError> {
        let where_clause = exclude_menu.map(|id| json!({ "id": { "$ne": id } }));
        let menus = self
            .store
            .select_any::<Menu>(FilterData {
                where_clause,
                order: Some(json!("id desc")),
                ..Default::default()
            })
            .await?;

        Ok(menus.iter().flat_map(|menu| menu.permissions(kind).iter().cloned()).collect())
    }

    /// Route names of every route-type menu
    pub async fn page_list(&self) -> Result<Vec<String>, TreeError> {
        let menus = self
            .store
            .select_any::<Menu>(FilterData {
                where_clause: Some(json!({ "menu_type": i32::from(MenuType::Route) })),
                order: Some(json!("id desc")),
                ..Default::default()
            })
            .await?;
        Ok(menus.into_iter().map(|menu| menu.route_name).collect())
    }
}

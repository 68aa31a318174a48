use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use serde::Deserialize;

use crate::config::config;
use crate::database::models::{Menu, MenuSummary, PermissionKind, SubPermission};
use crate::database::RecordStore;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::MenuService;
use crate::tree::{PermissionNode, TreeNode};
use crate::types::{PageRequest, Pagination};

#[derive(Debug, Deserialize)]
pub struct MenuTreeRequest {
    #[serde(default)]
    pub node_id: i64,
    #[serde(default)]
    pub keyword: String,
    #[serde(default = "first_page")]
    pub page: i32,
    pub size: Option<i32>,
}

fn first_page() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PermissionTreeRequest {
    pub kind: PermissionKind,
}

#[derive(Debug, Default, Deserialize)]
pub struct PermissionCodesQuery {
    /// Leave this menu's codes out, e.g. while editing it
    pub exclude_menu: Option<i64>,
}

/// POST /api/manage/menus/tree - paginated menu tree
pub async fn menu_tree<S: RecordStore + Clone + 'static>(
    Extension(store): Extension<S>,
    payload: Result<Json<MenuTreeRequest>, JsonRejection>,
) -> ApiResult<Pagination<TreeNode<Menu>>> {
    let Json(request) = payload?;
    let page = PageRequest::new(request.page, request.size.unwrap_or(config().tree.default_page_size));
    let tree = MenuService::new(store).menu_tree(request.node_id, &request.keyword, page).await?;
    Ok(ApiResponse::success(tree))
}

/// GET /api/manage/menus/summary - id/name tree of every menu
pub async fn menu_summary_tree<S: RecordStore + Clone + 'static>(
    Extension(store): Extension<S>,
) -> ApiResult<Vec<TreeNode<MenuSummary>>> {
    let tree = MenuService::new(store).menu_summary_tree().await?;
    Ok(ApiResponse::success(tree))
}

/// POST /api/manage/menus/permissions - pruned permission checkbox tree
pub async fn menu_permission_tree<S: RecordStore + Clone + 'static>(
    Extension(store): Extension<S>,
    payload: Result<Json<PermissionTreeRequest>, JsonRejection>,
) -> ApiResult<Vec<PermissionNode>> {
    let Json(request) = payload?;
    let tree = MenuService::new(store).menu_permission_tree(request.kind).await?;
    Ok(ApiResponse::success(tree))
}

/// GET /api/manage/menus/permissions/:kind/codes - flat list of permission codes
pub async fn menu_permission_codes<S: RecordStore + Clone + 'static>(
    Extension(store): Extension<S>,
    kind: Result<Path<PermissionKind>, PathRejection>,
    query: Result<Query<PermissionCodesQuery>, QueryRejection>,
) -> ApiResult<Vec<SubPermission>> {
    let Path(kind) = kind?;
    let Query(query) = query?;
    let codes = MenuService::new(store).menu_permission_list(kind, query.exclude_menu).await?;
    Ok(ApiResponse::success(codes))
}

/// GET /api/manage/pages - route names of all route menus
pub async fn page_list<S: RecordStore + Clone + 'static>(Extension(store): Extension<S>) -> ApiResult<Vec<String>> {
    let pages = MenuService::new(store).page_list().await?;
    Ok(ApiResponse::success(pages))
}

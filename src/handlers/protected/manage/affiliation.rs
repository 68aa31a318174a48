use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json};
use serde::Deserialize;

use crate::database::models::Affiliation;
use crate::database::RecordStore;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AffiliationService;
use crate::tree::TreeNode;

#[derive(Debug, Default, Deserialize)]
pub struct AffiliationTreeRequest {
    #[serde(default)]
    pub node_id: i64,
    #[serde(default)]
    pub keyword: String,
}

/// POST /api/manage/affiliations/tree
pub async fn affiliation_tree<S: RecordStore + Clone + 'static>(
    Extension(store): Extension<S>,
    payload: Result<Json<AffiliationTreeRequest>, JsonRejection>,
) -> ApiResult<Vec<TreeNode<Affiliation>>> {
    let Json(request) = payload?;
    let tree = AffiliationService::new(store).affiliation_tree(request.node_id, &request.keyword).await?;
    Ok(ApiResponse::success(tree))
}

use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use crate::database::RecordStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{RouteService, RouteTree, UserService};

/// GET /api/route/constant - routes available without any role
pub async fn constant_routes<S: RecordStore + Clone + 'static>(Extension(store): Extension<S>) -> ApiResult<Vec<RouteTree>> {
    let routes = RouteService::new(store).constant_route_tree().await?;
    Ok(ApiResponse::success(routes))
}

/// GET /api/route/user - routes of the authenticated user
pub async fn user_routes<S: RecordStore + Clone + 'static>(
    Extension(store): Extension<S>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<RouteTree>> {
    let (user, role) = UserService::new(store.clone())
        .find_user_with_role(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", auth_user.user_id)))?;

    if !user.status {
        return Err(ApiError::forbidden("User is disabled"));
    }

    let routes = RouteService::new(store).user_route_tree(&user, role.as_ref()).await?;
    Ok(ApiResponse::success(routes))
}

/// GET /api/route/exists/:name
pub async fn route_exists<S: RecordStore + Clone + 'static>(
    Extension(store): Extension<S>,
    Path(name): Path<String>,
) -> ApiResult<Value> {
    let exists = RouteService::new(store).route_exists(&name).await?;
    Ok(ApiResponse::success(json!({ "route_name": name, "exists": exists })))
}

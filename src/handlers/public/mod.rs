use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::database::RecordStore;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Admin API (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Menu, route and affiliation trees with role-scoped permissions",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "manage": "/api/manage/menus/*, /api/manage/pages, /api/manage/affiliations/tree (protected)",
                "route": "/api/route/constant, /api/route/user, /api/route/exists/:name (protected)",
            }
        }
    }))
}

/// GET /health - store connectivity
pub async fn health<S: RecordStore + Clone + 'static>(Extension(store): Extension<S>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}

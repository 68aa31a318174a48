use axum::{
    extract::Extension,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::config;
use crate::database::RecordStore;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Full HTTP surface over `store`
pub fn app<S: RecordStore + Clone + 'static>(store: S) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health::<S>))
        // Protected API
        .merge(manage_routes::<S>().merge(route_routes::<S>()).layer(middleware::from_fn(jwt_auth_middleware)))
        .layer(Extension(store));

    if config().api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config().security.enable_cors {
        router = router.layer(cors_layer());
    }
    router
}

fn manage_routes<S: RecordStore + Clone + 'static>() -> Router {
    use protected::manage;

    Router::new()
        .route("/api/manage/menus/tree", post(manage::menu_tree::<S>))
        .route("/api/manage/menus/summary", get(manage::menu_summary_tree::<S>))
        .route("/api/manage/menus/permissions", post(manage::menu_permission_tree::<S>))
        .route("/api/manage/menus/permissions/:kind/codes", get(manage::menu_permission_codes::<S>))
        .route("/api/manage/pages", get(manage::page_list::<S>))
        .route("/api/manage/affiliations/tree", post(manage::affiliation_tree::<S>))
}

fn route_routes<S: RecordStore + Clone + 'static>() -> Router {
    use protected::route;

    Router::new()
        .route("/api/route/constant", get(route::constant_routes::<S>))
        .route("/api/route/user", get(route::user_routes::<S>))
        .route("/api/route/exists/:name", get(route::route_exists::<S>))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE])
}

pub mod affiliation_service;
pub mod menu_service;
pub mod route_service;
pub mod user_service;

pub use affiliation_service::AffiliationService;
pub use menu_service::MenuService;
pub use route_service::{transform_routes, RouteMeta, RouteService, RouteTree};
pub use user_service::UserService;

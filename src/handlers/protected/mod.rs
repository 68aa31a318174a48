// Handlers behind jwt_auth_middleware; each receives the store through an Extension
pub mod manage;
pub mod route;

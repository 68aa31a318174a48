pub mod pages;
pub mod permissions;
pub mod routes;
pub mod tree;

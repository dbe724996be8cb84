// kart/app/src/web/mod.rs

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::configure_app_routes;

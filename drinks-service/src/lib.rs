pub mod app_state;
pub mod config;
pub mod drink_handlers;
pub mod drinks;
pub mod routes;
pub mod store;

pub use common_http_errors::ApiError;

//! HTTP surface of the loan portal: the actix-web application, its
//! middleware, request/response bodies and route handlers.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::AppState;

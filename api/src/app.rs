//! Application factory
//!
//! Builds the Actix-web application from the shared state, the token
//! verifier and the CORS configuration. The same factory serves the binary
//! and the HTTP tests.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use lp_core::repositories::{LoanRepository, ResetCodeRepository, UserRepository};
use lp_core::services::AuthVerifier;
use lp_shared::config::CorsConfig;
use lp_shared::{error_codes, ErrorResponse};

use crate::handlers::error::{json_error_handler, path_error_handler};
use crate::middleware::create_cors;
use crate::routes::{self, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<U, L, C>(
    app_state: web::Data<AppState<U, L, C>>,
    verifier: Arc<dyn AuthVerifier>,
    cors: &CorsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::Data::from(verifier))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .configure(routes::configure::<U, L, C>)
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "loan-portal-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

//! Route handlers grouped by surface
//!
//! - `auth`: registration, login and credential recovery (public)
//! - `client`: a client's own loan applications (bearer token)
//! - `profile`: a client's own account (bearer token)
//! - `employee`: review of every application (bearer token, employee role)

pub mod auth;
pub mod client;
pub mod employee;
pub mod profile;

use std::sync::Arc;

use actix_web::web;

use lp_core::repositories::{LoanRepository, ResetCodeRepository, UserRepository};
use lp_core::services::{AccountService, CredentialRecoveryService, LoanService};

use crate::middleware::JwtAuth;

/// Application state that holds shared services
pub struct AppState<U, L, C>
where
    U: UserRepository,
    L: LoanRepository,
    C: ResetCodeRepository,
{
    pub account_service: Arc<AccountService<U>>,
    pub loan_service: Arc<LoanService<L>>,
    pub recovery_service: Arc<CredentialRecoveryService<U, C>>,
}

/// Register every `/api` route
pub fn configure<U, L, C>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register::<U, L, C>))
                    .route("/login_client", web::post().to(auth::login_client::<U, L, C>))
                    .route("/login_employee", web::post().to(auth::login_employee::<U, L, C>))
                    .route(
                        "/request-reset-code",
                        web::post().to(auth::request_reset_code::<U, L, C>),
                    )
                    .route(
                        "/verify-reset-code",
                        web::post().to(auth::verify_reset_code::<U, L, C>),
                    )
                    .route("/reset-password", web::post().to(auth::reset_password::<U, L, C>)),
            )
            .service(
                web::scope("/client")
                    .wrap(JwtAuth::authenticated())
                    .route("/apply", web::post().to(client::apply::<U, L, C>))
                    .route("/loans", web::get().to(client::list_loans::<U, L, C>))
                    .route("/loans/{id}", web::get().to(client::get_loan::<U, L, C>))
                    .route("/loans/{id}", web::put().to(client::update_loan::<U, L, C>))
                    .route("/loans/{id}", web::delete().to(client::delete_loan::<U, L, C>))
                    .route("/profile", web::get().to(profile::get_profile::<U, L, C>))
                    .route("/profile/update", web::put().to(profile::update_profile::<U, L, C>))
                    .route("/logout", web::post().to(profile::logout::<U, L, C>)),
            )
            .service(
                web::scope("/employee")
                    .wrap(JwtAuth::employees_only())
                    .route("/loans", web::get().to(employee::list_loans::<U, L, C>))
                    .route("/loans/{id}", web::get().to(employee::get_loan::<U, L, C>))
                    .route("/loans/{id}/{action}", web::post().to(employee::decide::<U, L, C>))
                    .route("/summary", web::get().to(employee::summary::<U, L, C>)),
            ),
    );
}

//! Public authentication and credential recovery handlers

use actix_web::{web, HttpResponse};

use lp_core::domain::entities::user::UserRole;
use lp_core::repositories::{LoanRepository, ResetCodeRepository, UserRepository};
use lp_shared::validation::mask_email;
use lp_shared::{ApiResponse, MessageResponse};

use super::AppState;
use crate::dto::{
    LoginRequest, RegisterRequest, ResetCodeRequest, ResetCodeSentResponse, ResetPasswordRequest,
    UserResponse, VerifyCodeRequest,
};
use crate::handlers::{validated, ApiResult};

/// Handler for POST /api/auth/register
///
/// Creates a client account and returns it without the password hash.
/// Username or email already in use is a `400 DUPLICATE_IDENTITY`.
pub async fn register<U, L, C>(
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let request = validated(body)?;
    let user = state.account_service.register(request.into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user))))
}

/// Handler for POST /api/auth/login_client
pub async fn login_client<U, L, C>(
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    login(&state, body, UserRole::Client).await
}

/// Handler for POST /api/auth/login_employee
pub async fn login_employee<U, L, C>(
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    login(&state, body, UserRole::BankEmployee).await
}

async fn login<U, L, C>(
    state: &AppState<U, L, C>,
    body: web::Json<LoginRequest>,
    role: UserRole,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let request = validated(body)?;
    let response = state
        .account_service
        .login(&request.username, &request.password, role)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Handler for POST /api/auth/request-reset-code
///
/// At most one request per email is accepted per window; a second one
/// inside it is a `429` with a `Retry-After` header.
pub async fn request_reset_code<U, L, C>(
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<ResetCodeRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let request = validated(body)?;
    tracing::info!(email = %mask_email(&request.email), "Reset code requested");

    let issued = state.recovery_service.request_reset_code(&request.email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ResetCodeSentResponse {
        message: "A 6-digit code has been sent to your email address.".to_string(),
        expires_at: issued.expires_at,
    })))
}

/// Handler for POST /api/auth/verify-reset-code
///
/// Checks the code without spending it.
pub async fn verify_reset_code<U, L, C>(
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<VerifyCodeRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let request = validated(body)?;
    state
        .recovery_service
        .verify_code(&request.email, &request.code)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new("The code is valid."))))
}

/// Handler for POST /api/auth/reset-password
pub async fn reset_password<U, L, C>(
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let request = validated(body)?;
    state
        .recovery_service
        .reset_password(&request.email, &request.code, &request.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new(
        "Password changed successfully.",
    ))))
}

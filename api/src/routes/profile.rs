//! A client's own account

use actix_web::{web, HttpResponse};

use lp_core::repositories::{LoanRepository, ResetCodeRepository, UserRepository};
use lp_shared::{ApiResponse, MessageResponse};

use super::AppState;
use crate::dto::{LogoutRequest, ProfileUpdateRequest, UserResponse};
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

/// Handler for GET /api/client/profile
pub async fn get_profile<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let user = state.account_service.profile(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user))))
}

/// Handler for PUT /api/client/profile/update
pub async fn update_profile<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<ProfileUpdateRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let request = validated(body)?;
    let user = state
        .account_service
        .update_profile(auth.user_id, request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user))))
}

/// Handler for POST /api/client/logout
///
/// Stores the login time of the session that is ending; tokens are
/// stateless and stay valid until they expire.
pub async fn logout<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<LogoutRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    state
        .account_service
        .record_session(auth.user_id, body.login_time)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new("Logout time saved."))))
}

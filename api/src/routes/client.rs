//! A client's own loan applications

use actix_web::{web, HttpResponse};

use lp_core::repositories::{LoanRepository, ResetCodeRepository, UserRepository};
use lp_shared::{ApiResponse, MessageResponse};

use super::AppState;
use crate::dto::LoanApplicationRequest;
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

/// Handler for POST /api/client/apply
///
/// The new application belongs to the caller and starts in `Applied`.
pub async fn apply<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
    body: web::Json<LoanApplicationRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let (details, incomes) = validated(body)?.into_parts();
    let application = state
        .loan_service
        .submit(auth.user_id, details, incomes)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(application)))
}

/// Handler for GET /api/client/loans
pub async fn list_loans<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let applications = state.loan_service.list_by_owner(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(applications)))
}

/// Handler for GET /api/client/loans/{id}
pub async fn get_loan<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let application = state
        .loan_service
        .get_owned(path.into_inner(), auth.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(application)))
}

/// Handler for PUT /api/client/loans/{id}
///
/// Only the owner may edit, and only while the application is `Applied`.
pub async fn update_loan<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
    path: web::Path<i64>,
    body: web::Json<LoanApplicationRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let (details, incomes) = validated(body)?.into_parts();
    let application = state
        .loan_service
        .update(path.into_inner(), auth.user_id, details, incomes)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(application)))
}

/// Handler for DELETE /api/client/loans/{id}
pub async fn delete_loan<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    state
        .loan_service
        .delete(path.into_inner(), auth.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new(
        "Loan application deleted.",
    ))))
}

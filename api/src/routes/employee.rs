//! Bank employee review of loan applications
//!
//! Every route here sits behind `JwtAuth::employees_only`.

use actix_web::{web, HttpResponse};

use lp_core::domain::entities::loan_application::LoanEvent;
use lp_core::errors::DomainError;
use lp_core::repositories::{LoanRepository, ResetCodeRepository, UserRepository};
use lp_shared::ApiResponse;

use super::AppState;
use crate::handlers::{ApiError, ApiResult};
use crate::middleware::AuthContext;

/// Handler for GET /api/employee/loans
///
/// Every application, newest first.
pub async fn list_loans<U, L, C>(state: web::Data<AppState<U, L, C>>) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let applications = state.loan_service.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(applications)))
}

/// Handler for GET /api/employee/loans/{id}
pub async fn get_loan<U, L, C>(
    state: web::Data<AppState<U, L, C>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let application = state.loan_service.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(application)))
}

/// Handler for POST /api/employee/loans/{id}/{evaluate|approve|reject}
///
/// An action not allowed from the current status is a
/// `400 INVALID_STATE_TRANSITION` and leaves the application unchanged.
pub async fn decide<U, L, C>(
    auth: AuthContext,
    state: web::Data<AppState<U, L, C>>,
    path: web::Path<(i64, String)>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let (id, action) = path.into_inner();
    let event: LoanEvent = action.parse().map_err(|_| {
        ApiError::from(DomainError::NotFound {
            resource: format!("loan action {}", action),
        })
    })?;

    let application = state.loan_service.decide(id, event).await?;
    tracing::info!(
        loan_id = id,
        employee_id = auth.user_id,
        loan_event = %event,
        status = %application.status,
        event = "loan_decided",
        "Employee decision applied"
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(application)))
}

/// Handler for GET /api/employee/summary
///
/// Application count per status; every status is present.
pub async fn summary<U, L, C>(state: web::Data<AppState<U, L, C>>) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    L: LoanRepository + 'static,
    C: ResetCodeRepository + 'static,
{
    let statistics = state.loan_service.statistics().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(statistics)))
}

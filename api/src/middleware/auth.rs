//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer token from the Authorization header,
//! resolves it through the `AuthVerifier` registered as app data and
//! injects the caller's `AuthContext` into the request. A scope wrapped
//! with [`JwtAuth::employees_only`] additionally rejects non-employees.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use lp_core::domain::entities::token::AuthIdentity;
use lp_core::domain::entities::user::UserRole;
use lp_core::errors::{AuthError, DomainError};
use lp_core::services::AuthVerifier;

use crate::handlers::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl AuthContext {
    pub fn is_employee(&self) -> bool {
        self.role == UserRole::BankEmployee
    }

    /// `403` unless the caller is a bank employee
    pub fn require_employee(&self) -> Result<(), ApiError> {
        if self.is_employee() {
            Ok(())
        } else {
            Err(DomainError::from(AuthError::InsufficientPermissions).into())
        }
    }
}

impl From<AuthIdentity> for AuthContext {
    fn from(identity: AuthIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username,
            role: identity.role,
        }
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Default)]
pub struct JwtAuth {
    required_role: Option<UserRole>,
}

impl JwtAuth {
    /// Any valid token is accepted
    pub fn authenticated() -> Self {
        Self { required_role: None }
    }

    /// Valid token with the `BankEmployee` role
    pub fn employees_only() -> Self {
        Self {
            required_role: Some(UserRole::BankEmployee),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            required_role: self.required_role,
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    required_role: Option<UserRole>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_role = self.required_role;

        Box::pin(async move {
            let context = authenticate(&req)?;

            if let Some(role) = required_role {
                if context.role != role {
                    tracing::warn!(
                        user_id = context.user_id,
                        role = %context.role,
                        path = %req.path(),
                        event = "role_denied",
                        "Caller lacks the required role"
                    );
                    return Err(ApiError::from(DomainError::from(AuthError::InsufficientPermissions)).into());
                }
            }

            req.extensions_mut().insert(context);
            service.call(req).await
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthContext, ApiError> {
    let unauthenticated = || ApiError::from(DomainError::from(AuthError::Unauthenticated));

    let token = extract_bearer_token(req).ok_or_else(unauthenticated)?;

    let verifier = req.app_data::<web::Data<dyn AuthVerifier>>().ok_or_else(|| {
        tracing::error!("No AuthVerifier registered as app data");
        ApiError::from(DomainError::Internal {
            message: "authentication is not configured".to_string(),
        })
    })?;

    let identity = verifier.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, event = "token_rejected", "Bearer token rejected");
        unauthenticated()
    })?;

    Ok(identity.into())
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::from(DomainError::from(AuthError::Unauthenticated)).into());

        ready(result)
    }
}

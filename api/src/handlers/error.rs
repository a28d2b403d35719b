//! Mapping from domain failures to HTTP responses.
//!
//! Every error body is a `lp_shared::ErrorResponse`. The status comes from
//! the `ErrorKind` classification of the domain error; infrastructure
//! failures are logged in full and answered with a generic message.

use std::collections::HashMap;
use std::fmt;

use actix_web::{
    error::{JsonPayloadError, PathError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use validator::{ValidationErrors, ValidationErrorsKind};

use lp_core::errors::{DomainError, ErrorKind};
use lp_shared::{error_codes, ErrorResponse};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers and middleware
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// Request body failed `validator` checks
    Validation(ValidationErrors),
    /// Body or path could not be parsed
    BadRequest(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Domain(err) => write!(f, "{}", err),
            ApiError::Validation(err) => write!(f, "Validation failed: {}", err),
            ApiError::BadRequest(message) => write!(f, "Bad request: {}", message),
        }
    }
}

/// HTTP status for an error classification
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::DuplicateIdentity
        | ErrorKind::InvalidOrExpiredCode
        | ErrorKind::InvalidStateTransition
        | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::AuthenticationFailure => StatusCode::UNAUTHORIZED,
        ErrorKind::AuthorizationFailure => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn validation_details(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .errors()
        .iter()
        .map(|(field, kind)| {
            let messages = match kind {
                ValidationErrorsKind::Field(field_errors) => field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect(),
                ValidationErrorsKind::Struct(_) | ValidationErrorsKind::List(_) => {
                    vec!["invalid".to_string()]
                }
            };
            (field.to_string(), messages)
        })
        .collect()
}

impl ApiError {
    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Domain(err) => {
                let kind = err.kind();
                let message = if kind == ErrorKind::Infrastructure {
                    "An internal error occurred".to_string()
                } else {
                    err.to_string()
                };
                let response = ErrorResponse::new(kind.as_code(), message);
                match err.retry_after_seconds() {
                    Some(seconds) => response.add_detail("retry_after_seconds", seconds),
                    None => response,
                }
            }
            ApiError::Validation(errors) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed")
                    .add_detail("fields", validation_details(errors))
            }
            ApiError::BadRequest(message) => {
                ErrorResponse::new(error_codes::BAD_REQUEST, message.clone())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => status_for(err.kind()),
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut builder = HttpResponse::build(status);
        if let ApiError::Domain(err) = self {
            if let Some(seconds) = err.retry_after_seconds() {
                builder.insert_header((header::RETRY_AFTER, seconds.to_string()));
            }
        }
        builder.json(self.body())
    }
}

/// `JsonConfig` error handler: malformed bodies get the standard error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

/// `PathConfig` error handler: a non-numeric id is an absent resource
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Domain(DomainError::NotFound {
        resource: err.to_string(),
    })
    .into()
}

//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, LoanError, RecoveryError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Loan(#[from] LoanError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification of a failure, used to pick a transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateIdentity,
    AuthenticationFailure,
    AuthorizationFailure,
    NotFound,
    RateLimitExceeded,
    InvalidOrExpiredCode,
    InvalidStateTransition,
    Validation,
    Infrastructure,
}

impl ErrorKind {
    /// Machine-readable code sent to clients
    pub fn as_code(&self) -> &'static str {
        use lp_shared::error_codes;

        match self {
            Self::DuplicateIdentity => error_codes::DUPLICATE_IDENTITY,
            Self::AuthenticationFailure => error_codes::UNAUTHORIZED,
            Self::AuthorizationFailure => error_codes::FORBIDDEN,
            Self::NotFound => error_codes::NOT_FOUND,
            Self::RateLimitExceeded => error_codes::RATE_LIMIT_EXCEEDED,
            Self::InvalidOrExpiredCode => error_codes::INVALID_OR_EXPIRED_CODE,
            Self::InvalidStateTransition => error_codes::INVALID_STATE_TRANSITION,
            Self::Validation => error_codes::VALIDATION_ERROR,
            Self::Infrastructure => error_codes::INTERNAL_ERROR,
        }
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::ValidationErr(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Internal { .. } => ErrorKind::Infrastructure,
            Self::Auth(err) => match err {
                AuthError::UsernameTaken | AuthError::EmailTaken => ErrorKind::DuplicateIdentity,
                AuthError::AuthenticationFailed | AuthError::Unauthenticated => {
                    ErrorKind::AuthenticationFailure
                }
                AuthError::InsufficientPermissions => ErrorKind::AuthorizationFailure,
                AuthError::UserNotFound => ErrorKind::NotFound,
            },
            Self::Loan(err) => match err {
                LoanError::NotFound { .. } => ErrorKind::NotFound,
                LoanError::NotOwner { .. } | LoanError::NotEditable { .. } => {
                    ErrorKind::AuthorizationFailure
                }
                LoanError::InvalidStateTransition { .. }
                | LoanError::ConcurrentModification { .. } => ErrorKind::InvalidStateTransition,
            },
            Self::Recovery(err) => match err {
                RecoveryError::InvalidOrExpiredCode => ErrorKind::InvalidOrExpiredCode,
                RecoveryError::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
                RecoveryError::EmailNotFound => ErrorKind::NotFound,
            },
        }
    }

    /// Seconds the caller should wait, for rate-limited failures
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Self::Recovery(RecoveryError::RateLimitExceeded {
                retry_after_seconds,
            }) => Some(*retry_after_seconds),
            _ => None,
        }
    }
}

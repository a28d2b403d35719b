//! MySQL repository implementations

pub mod loan_repository_impl;
pub mod reset_code_repository_impl;
pub mod user_repository_impl;

pub use loan_repository_impl::MySqlLoanRepository;
pub use reset_code_repository_impl::MySqlResetCodeRepository;
pub use user_repository_impl::MySqlUserRepository;

use lp_core::errors::DomainError;

/// Wrap a driver error with the operation that produced it
pub(crate) fn db_error(operation: &str, err: sqlx::Error) -> DomainError {
    tracing::error!(operation, error = %err, "Database operation failed");
    DomainError::Internal {
        message: format!("Failed to {}: {}", operation, err),
    }
}

/// Column decode failure
pub(crate) fn column_error(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to get {}: {}", column, err),
    }
}

/// `Some(constraint message)` when the error is a unique key violation
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.message().to_string())
        }
        _ => None,
    }
}

//! Domain-specific error types for accounts, loans, recovery and validation
//!
//! Messages here are stable, user-safe English; the presentation layer maps
//! each variant to a transport status through [`super::ErrorKind`].

use thiserror::Error;

use crate::domain::entities::loan_application::{LoanEvent, LoanStatus};

/// Authentication and account errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Email is already registered")]
    EmailTaken,

    /// Unknown user, wrong password or wrong role; never says which
    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("User not found")]
    UserNotFound,
}

/// Loan application lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    #[error("Loan application {id} not found")]
    NotFound { id: i64 },

    #[error("Loan application {id} does not belong to the requester")]
    NotOwner { id: i64 },

    #[error("Loan application {id} can no longer be modified (status: {status})")]
    NotEditable { id: i64, status: LoanStatus },

    #[error("Cannot {event} loan application {id} from status {from}")]
    InvalidStateTransition {
        id: i64,
        from: LoanStatus,
        event: LoanEvent,
    },

    /// A conditional write lost to a concurrent status change
    #[error("Loan application {id} changed to {status} while being modified")]
    ConcurrentModification { id: i64, status: LoanStatus },
}

/// Credential recovery errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    /// Identical for never-issued, used and expired codes
    #[error("Invalid or expired reset code")]
    InvalidOrExpiredCode,

    #[error("Please wait {retry_after_seconds} seconds before requesting a new code")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("No account is registered with this email")]
    EmailNotFound,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid length: {field} (expected: {expected}, actual: {actual})")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
}

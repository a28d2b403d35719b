//! Domain entities representing core business objects.

pub mod loan_application;
pub mod reset_code;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use loan_application::{
    Income, LoanApplication, LoanDetails, LoanEvent, LoanStatus, NewLoanApplication,
};
pub use reset_code::{ResetCode, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES};
pub use token::{AuthIdentity, Claims};
pub use user::{NewUser, User, UserRole};

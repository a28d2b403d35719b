//! Repository interfaces for persistence, with in-memory implementations.

pub mod loan;
pub mod reset_code;
pub mod user;

pub use loan::{LoanRepository, MockLoanRepository};
pub use reset_code::{MockResetCodeRepository, ResetCodeRepository};
pub use user::{MockUserRepository, UserRepository};

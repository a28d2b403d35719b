//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Repository implementations for users, loan applications and reset codes
//! - Embedded schema migrations

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlLoanRepository, MySqlResetCodeRepository, MySqlUserRepository};

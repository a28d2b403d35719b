//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod loan_statistics;

// Re-export commonly used types
pub use auth_response::AuthResponse;
pub use loan_statistics::LoanStatistics;

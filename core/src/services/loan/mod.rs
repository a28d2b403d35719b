//! Loan application lifecycle service
//!
//! Owns the status state machine and the ownership guards of the client
//! surface. Every mutation of an existing application is a conditional write
//! against the status that was read, so concurrent decisions on the same
//! application cannot both succeed.

mod service;


pub use service::LoanService;

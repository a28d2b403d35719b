//! Common type definitions shared across modules

pub mod response;

pub use response::{ApiResponse, MessageResponse};

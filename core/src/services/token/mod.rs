//! Token service module for JWT management
//!
//! Issues HS256 access tokens carrying the user id, username and role, and
//! verifies them for the HTTP layer through [`AuthVerifier`].

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::{AuthVerifier, TokenService};

//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::UserRole;

/// Returned after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Signed bearer token
    pub token: String,

    /// Token lifetime in seconds
    pub expires_in: i64,

    pub username: String,

    pub role: UserRole,
}

impl AuthResponse {
    pub fn new(token: String, expires_in: i64, username: String, role: UserRole) -> Self {
        Self {
            token,
            expires_in,
            username,
            role,
        }
    }
}

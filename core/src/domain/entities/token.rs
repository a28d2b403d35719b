//! Token claims and the verified identity carried by authenticated requests.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{User, UserRole};

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub username: String,

    pub role: UserRole,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates access-token claims for a user
    pub fn for_user(user: &User, issuer: &str, issued_at: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(ttl_seconds)).timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Verified caller identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl AuthIdentity {
    pub fn is_employee(&self) -> bool {
        self.role == UserRole::BankEmployee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_for_user() {
        let now = Utc::now();
        let user = User {
            id: 42,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: String::new(),
            role: UserRole::Client,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            last_login_at: None,
            created_at: now,
        };

        let claims = Claims::for_user(&user, "loan-portal", now, 3600);
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.role, UserRole::Client);
    }
}

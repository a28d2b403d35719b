//! User entity representing a portal account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of an account; decides which surface it may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A customer applying for loans
    Client,
    /// Bank staff reviewing applications
    BankEmployee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::BankEmployee => "bank_employee",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "bank_employee" => Ok(Self::BankEmployee),
            other => Err(format!("Unknown user role: {}", other)),
        }
    }
}

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: i64,

    pub username: String,

    pub email: String,

    /// bcrypt hash, never the plain password
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,

    pub first_name: String,

    pub last_name: String,

    /// Login time recorded by the last session (login or logout)
    pub last_login_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_employee(&self) -> bool {
        self.role == UserRole::BankEmployee
    }
}

/// User data prior to persistence; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Attach the store-assigned id
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            first_name: self.first_name,
            last_name: self.last_name,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

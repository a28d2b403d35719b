//! User repository trait defining the interface for account persistence.
//!
//! The trait is async-first and backs the user directory used by account
//! management and credential recovery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Username and email are both unique. Implementations must reject a
/// `create` that would violate either constraint with
/// `AuthError::UsernameTaken` / `AuthError::EmailTaken`, even when a
/// concurrent registration slipped past the `exists_*` pre-checks.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by store-assigned id
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Find a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Persist a new user and return it with its assigned id
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Replace the profile columns (names and email) of an existing user
    ///
    /// Other columns are left as stored, so a concurrent password or
    /// session write is never rolled back.
    ///
    /// # Returns
    /// * `Ok(User)` - The user as stored after the update
    /// * `Err(AuthError::EmailTaken)` - Another user holds `email`
    /// * `Err(DomainError::NotFound)` - No user with `id`
    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User, DomainError>;

    /// Replace only the stored password hash
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DomainError>;

    /// Replace only the last login time
    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), DomainError>;
}

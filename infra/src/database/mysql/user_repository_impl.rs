//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use lp_core::domain::entities::user::{NewUser, User, UserRole};
use lp_core::errors::{AuthError, DomainError};
use lp_core::repositories::UserRepository;

use super::{column_error, db_error, unique_violation};

const SELECT_USER: &str = "SELECT id, username, email, password_hash, role, first_name, last_name, \
     last_login_at, created_at FROM users";

/// MySQL implementation of UserRepository
///
/// Uniqueness of username and email is enforced by the `uk_users_username`
/// and `uk_users_email` keys, so a registration race is still reported as
/// the matching `AuthError`.
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let role: String = row.try_get("role").map_err(|e| column_error("role", e))?;

        Ok(User {
            id: row.try_get("id").map_err(|e| column_error("id", e))?,
            username: row.try_get("username").map_err(|e| column_error("username", e))?,
            email: row.try_get("email").map_err(|e| column_error("email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| column_error("password_hash", e))?,
            role: role.parse::<UserRole>().map_err(|e| column_error("role", e))?,
            first_name: row.try_get("first_name").map_err(|e| column_error("first_name", e))?,
            last_name: row.try_get("last_name").map_err(|e| column_error("last_name", e))?,
            last_login_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
                .map_err(|e| column_error("last_login_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE {} = ?", SELECT_USER, column);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn exists(&self, column: &str, value: &str) -> Result<bool, DomainError> {
        let query = format!("SELECT COUNT(*) AS total FROM users WHERE {} = ?", column);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check user existence", e))?;

        let total: i64 = row.try_get("total").map_err(|e| column_error("total", e))?;
        Ok(total > 0)
    }

    /// MySQL reports zero affected rows for an unchanged value, so a zero
    /// count only means NotFound once the row is confirmed absent.
    async fn ensure_updated(&self, rows_affected: u64, id: i64) -> Result<(), DomainError> {
        if rows_affected > 0 || self.exists("id", &id.to_string()).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::NotFound {
        resource: format!("user {}", id),
    }
}

/// Map a unique key violation to the field it protects
fn duplicate_error(message: &str) -> DomainError {
    if message.contains("username") {
        AuthError::UsernameTaken.into()
    } else {
        AuthError::EmailTaken.into()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE id = ?", SELECT_USER);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user by id", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        self.exists("username", username).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        self.exists("email", email).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                username, email, password_hash, role, first_name, last_name,
                last_login_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(message) => duplicate_error(&message),
            None => db_error("create user", e),
        })?;

        let id = result.last_insert_id() as i64;
        tracing::info!(user_id = id, event = "user_created", "User persisted");
        Ok(user.into_user(id))
    }

    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        sqlx::query("UPDATE users SET first_name = ?, last_name = ?, email = ? WHERE id = ?")
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(message) => duplicate_error(&message),
                None => db_error("update user profile", e),
            })?;

        self.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update password hash", e))?;

        self.ensure_updated(result.rows_affected(), id).await
    }

    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update last login", e))?;

        self.ensure_updated(result.rows_affected(), id).await
    }
}

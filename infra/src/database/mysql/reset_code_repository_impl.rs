//! MySQL implementation of the ResetCodeRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use lp_core::domain::entities::reset_code::ResetCode;
use lp_core::errors::DomainError;
use lp_core::repositories::ResetCodeRepository;

use super::{column_error, db_error};

/// MySQL implementation of ResetCodeRepository
///
/// Code ids are stored as their hyphenated string form.
pub struct MySqlResetCodeRepository {
    pool: MySqlPool,
}

impl MySqlResetCodeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_code(row: &MySqlRow) -> Result<ResetCode, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;

        Ok(ResetCode {
            id: Uuid::parse_str(&id).map_err(|e| column_error("id", e))?,
            user_id: row.try_get("user_id").map_err(|e| column_error("user_id", e))?,
            code: row.try_get("code").map_err(|e| column_error("code", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column_error("expires_at", e))?,
            is_used: row.try_get("is_used").map_err(|e| column_error("is_used", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
        })
    }
}

#[async_trait]
impl ResetCodeRepository for MySqlResetCodeRepository {
    async fn create(&self, code: &ResetCode) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_codes (id, user_id, code, expires_at, is_used, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(code.id.to_string())
        .bind(code.user_id)
        .bind(&code.code)
        .bind(code.expires_at)
        .bind(code.is_used)
        .bind(code.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create reset code", e))?;

        Ok(())
    }

    async fn find_by_user_and_code(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<Vec<ResetCode>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, code, expires_at, is_used, created_at
            FROM password_reset_codes
            WHERE user_id = ? AND code = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find reset codes", e))?;

        rows.iter().map(Self::row_to_code).collect()
    }

    async fn claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE password_reset_codes
            SET is_used = TRUE
            WHERE id = ? AND is_used = FALSE AND expires_at > ?
            "#,
        )
        .bind(id.to_string())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("claim reset code", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("UPDATE password_reset_codes SET is_used = FALSE WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("release reset code", e))?;
        Ok(())
    }
}

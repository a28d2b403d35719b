//! In-memory implementation of ResetCodeRepository for tests and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::reset_code::ResetCode;
use crate::errors::DomainError;

use super::trait_::ResetCodeRepository;

/// Mock reset code repository, in insertion order
#[derive(Clone, Default)]
pub struct MockResetCodeRepository {
    codes: Arc<RwLock<Vec<ResetCode>>>,
}

impl MockResetCodeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored code for a user, oldest first
    pub async fn codes_for_user(&self, user_id: i64) -> Vec<ResetCode> {
        self.codes
            .read()
            .await
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ResetCodeRepository for MockResetCodeRepository {
    async fn create(&self, code: &ResetCode) -> Result<(), DomainError> {
        self.codes.write().await.push(code.clone());
        Ok(())
    }

    async fn find_by_user_and_code(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<Vec<ResetCode>, DomainError> {
        let codes = self.codes.read().await;
        Ok(codes
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id && c.code == code)
            .cloned()
            .collect())
    }

    async fn claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut codes = self.codes.write().await;
        match codes.iter_mut().find(|c| c.id == id) {
            Some(stored) if stored.is_valid_at(now) => {
                stored.mark_as_used();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, id: Uuid) -> Result<(), DomainError> {
        let mut codes = self.codes.write().await;
        if let Some(stored) = codes.iter_mut().find(|c| c.id == id) {
            stored.is_used = false;
        }
        Ok(())
    }
}

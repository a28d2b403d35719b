//! In-memory implementation of UserRepository for tests and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::{NewUser, User};
use crate::errors::{AuthError, DomainError};

use super::trait_::UserRepository;

/// Mock user repository
#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameTaken.into());
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken.into());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = user.into_user(id);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.id != id && u.email == email) {
            return Err(AuthError::EmailTaken.into());
        }

        let stored = users.get_mut(&id).ok_or_else(|| not_found(id))?;
        stored.first_name = first_name.to_string();
        stored.last_name = last_name.to_string();
        stored.email = email.to_string();
        Ok(stored.clone())
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&id).ok_or_else(|| not_found(id))?;
        stored.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&id).ok_or_else(|| not_found(id))?;
        stored.last_login_at = Some(at);
        Ok(())
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::NotFound {
        resource: format!("user {}", id),
    }
}

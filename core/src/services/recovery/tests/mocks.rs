//! Test doubles for the credential recovery service

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;
use crate::repositories::{MockUserRepository, UserRepository};
use crate::services::password::PasswordHasher;
use crate::services::recovery::NotifierTrait;

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl SentMessage {
    /// The 6-digit code embedded in the body
    pub fn code(&self) -> String {
        self.body
            .split(|c: char| !c.is_ascii_digit())
            .find(|chunk| chunk.len() == 6)
            .unwrap_or_default()
            .to_string()
    }
}

/// Records every message instead of delivering it
pub struct MockNotifier {
    pub sent: Arc<Mutex<Vec<SentMessage>>>,
    pub should_fail: bool,
}

impl MockNotifier {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<SentMessage> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl NotifierTrait for MockNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("Email service error".to_string());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(format!("mock-msg-{}", sent.len()))
    }
}

/// Reversible "hash" so tests can assert on the stored password
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{}", plain))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == format!("hashed:{}", plain))
    }
}

/// User store that can hold one call mid-flight or fail one password write
///
/// A held call has already read (or not yet written) the row; it signals
/// `entered` and waits for `release` before returning.
#[derive(Default)]
pub struct GatedUserRepository {
    pub inner: MockUserRepository,
    hold_next: AtomicBool,
    fail_password_write: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedUserRepository {
    /// Hold the next `find_by_id` or `update_last_login` call
    pub fn hold_next_call(&self) {
        self.hold_next.store(true, Ordering::SeqCst);
    }

    /// Fail the next `update_password_hash` call
    pub fn fail_next_password_write(&self) {
        self.fail_password_write.store(true, Ordering::SeqCst);
    }

    async fn gate(&self) {
        if self.hold_next.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl UserRepository for GatedUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let found = self.inner.find_by_id(id).await?;
        self.gate().await;
        Ok(found)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.inner.find_by_username(username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.inner.find_by_email(email).await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        self.inner.exists_by_username(username).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        self.inner.exists_by_email(email).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        self.inner.create(user).await
    }

    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        self.inner.update_profile(id, first_name, last_name, email).await
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        if self.fail_password_write.swap(false, Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "db down".to_string(),
            });
        }
        self.inner.update_password_hash(id, password_hash).await
    }

    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.gate().await;
        self.inner.update_last_login(id, at).await
    }
}

use chrono::{DateTime, Utc};
use std::sync::Arc;

use lp_shared::validation::{is_valid_email, mask_email, not_empty};

use crate::domain::entities::user::{NewUser, User, UserRole};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::clock::Clock;
use crate::services::password::PasswordHasher;
use crate::services::token::TokenService;

use super::types::{ProfileUpdate, Registration};

pub struct AccountService<U: UserRepository> {
    user_repository: Arc<U>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U: UserRepository> AccountService<U> {
    pub fn new(
        user_repository: Arc<U>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
            clock,
        }
    }

    /// Register a new client account.
    ///
    /// Self-registration always yields `UserRole::Client`; the registration
    /// time is recorded as the first session.
    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        for (field, value) in [
            ("username", &registration.username),
            ("password", &registration.password),
            ("first_name", &registration.first_name),
            ("last_name", &registration.last_name),
        ] {
            if !not_empty(value) {
                return Err(ValidationError::RequiredField {
                    field: field.to_string(),
                }
                .into());
            }
        }
        let email = registration.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        if self
            .user_repository
            .exists_by_username(&registration.username)
            .await?
        {
            return Err(AuthError::UsernameTaken.into());
        }
        if self.user_repository.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken.into());
        }

        let now = self.clock.now();
        let user = self
            .user_repository
            .create(NewUser {
                username: registration.username,
                email,
                password_hash: self.password_hasher.hash(&registration.password)?,
                role: UserRole::Client,
                first_name: registration.first_name,
                last_name: registration.last_name,
                last_login_at: Some(now),
                created_at: now,
            })
            .await?;

        tracing::info!(
            user_id = user.id,
            email = %mask_email(&user.email),
            event = "user_registered",
            "Registered new client"
        );
        Ok(user)
    }

    /// Authenticate on the surface for `role`.
    ///
    /// Unknown username, wrong password and a role mismatch all fail the same
    /// way so the response does not reveal which accounts exist.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<AuthResponse> {
        let user = match self.user_repository.find_by_username(username).await? {
            Some(user) => user,
            None => return Err(self.login_failed(username, "unknown_user")),
        };

        if !self.password_hasher.verify(password, &user.password_hash)? {
            return Err(self.login_failed(username, "bad_password"));
        }
        if user.role != role {
            return Err(self.login_failed(username, "role_mismatch"));
        }

        let token = self.token_service.issue(&user)?;
        tracing::info!(
            user_id = user.id,
            role = %user.role,
            event = "login_success",
            "User logged in"
        );
        Ok(AuthResponse::new(
            token,
            self.token_service.expires_in(),
            user.username,
            user.role,
        ))
    }

    pub async fn profile(&self, user_id: i64) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Update names and email; the email must stay unique
    ///
    /// Only the profile columns are written, so a password reset or session
    /// record landing in between is kept.
    pub async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> DomainResult<User> {
        let current = self.profile(user_id).await?;

        let email = update.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if email != current.email && self.user_repository.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken.into());
        }

        let first_name = if not_empty(&update.first_name) {
            update.first_name
        } else {
            current.first_name
        };
        let last_name = if not_empty(&update.last_name) {
            update.last_name
        } else {
            current.last_name
        };

        let user = self
            .user_repository
            .update_profile(user_id, &first_name, &last_name, &email)
            .await
            .map_err(user_gone)?;
        tracing::info!(user_id = user.id, event = "profile_updated", "Profile updated");
        Ok(user)
    }

    /// Store the login time reported when a session ends
    pub async fn record_session(&self, user_id: i64, login_time: DateTime<Utc>) -> DomainResult<()> {
        self.user_repository
            .update_last_login(user_id, login_time)
            .await
            .map_err(user_gone)?;
        tracing::info!(
            user_id = user_id,
            login_time = %login_time,
            event = "session_recorded",
            "Session login time recorded"
        );
        Ok(())
    }

    fn login_failed(&self, username: &str, reason: &'static str) -> DomainError {
        tracing::warn!(
            username = username,
            reason = reason,
            event = "login_failed",
            "Login attempt failed"
        );
        AuthError::AuthenticationFailed.into()
    }
}

fn user_gone(err: DomainError) -> DomainError {
    match err {
        DomainError::NotFound { .. } => AuthError::UserNotFound.into(),
        other => other,
    }
}

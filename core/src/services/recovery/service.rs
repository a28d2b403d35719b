//! Credential recovery service implementation

use std::sync::Arc;

use lp_shared::validation::{is_numeric_code, is_valid_email, mask_email, not_empty};

use crate::domain::entities::reset_code::{ResetCode, CODE_LENGTH};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, RecoveryError, ValidationError};
use crate::repositories::{ResetCodeRepository, UserRepository};
use crate::services::clock::Clock;
use crate::services::password::PasswordHasher;
use crate::services::rate_limit::RateLimiterTrait;

use super::config::RecoveryServiceConfig;
use super::traits::NotifierTrait;
use super::types::CodeIssued;

pub struct CredentialRecoveryService<U: UserRepository, C: ResetCodeRepository> {
    user_repository: Arc<U>,
    code_repository: Arc<C>,
    rate_limiter: Arc<dyn RateLimiterTrait>,
    notifier: Arc<dyn NotifierTrait>,
    password_hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    config: RecoveryServiceConfig,
}

impl<U: UserRepository, C: ResetCodeRepository> CredentialRecoveryService<U, C> {
    pub fn new(
        user_repository: Arc<U>,
        code_repository: Arc<C>,
        rate_limiter: Arc<dyn RateLimiterTrait>,
        notifier: Arc<dyn NotifierTrait>,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
        config: RecoveryServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            code_repository,
            rate_limiter,
            notifier,
            password_hasher,
            clock,
            config,
        }
    }

    /// Issue a reset code for the account registered under `email`.
    ///
    /// The rate limiter is consulted before anything else, so a denied
    /// request never reaches the user directory and never issues a code.
    ///
    /// # Errors
    /// * `ValidationError::InvalidEmail` - Malformed address
    /// * `RecoveryError::RateLimitExceeded` - Too soon after the previous request
    /// * `RecoveryError::EmailNotFound` - No account for this email
    /// * `DomainError::Internal` - Limiter, storage or delivery failure
    pub async fn request_reset_code(&self, email: &str) -> DomainResult<CodeIssued> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        if self.config.rate_limit_enabled {
            let allowed = self
                .rate_limiter
                .gate(&email.to_lowercase())
                .await
                .map_err(|e| {
                    tracing::error!(
                        email = %mask_email(email),
                        error = %e,
                        event = "rate_limiter_failed",
                        "Rate limiter unavailable"
                    );
                    DomainError::Internal {
                        message: format!("Rate limiter failure: {}", e),
                    }
                })?;

            if !allowed {
                let retry_after_seconds = self.rate_limiter.window_seconds();
                tracing::warn!(
                    email = %mask_email(email),
                    retry_after_seconds = retry_after_seconds,
                    event = "rate_limit_exceeded",
                    "Reset code request rate limit exceeded"
                );
                return Err(RecoveryError::RateLimitExceeded {
                    retry_after_seconds,
                }
                .into());
            }
        }

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                tracing::info!(
                    email = %mask_email(email),
                    event = "reset_code_unknown_email",
                    "Reset code requested for unknown email"
                );
                DomainError::from(RecoveryError::EmailNotFound)
            })?;

        self.issue_code(&user).await
    }

    /// Persist a fresh code for `user` and email it.
    ///
    /// Older outstanding codes stay valid. If delivery fails the code remains
    /// stored and the failure is reported as `DomainError::Internal`.
    pub async fn issue_code(&self, user: &User) -> DomainResult<CodeIssued> {
        let now = self.clock.now();
        let reset_code = ResetCode::new(user.id, now, self.config.code_expiration_minutes);

        self.code_repository.create(&reset_code).await.map_err(|e| {
            tracing::error!(
                user_id = user.id,
                error = %e,
                event = "reset_code_storage_failed",
                "Failed to store reset code"
            );
            e
        })?;

        tracing::info!(
            user_id = user.id,
            code_id = %reset_code.id,
            expires_at = %reset_code.expires_at,
            event = "reset_code_issued",
            "Issued password reset code"
        );

        let message_id = self
            .notifier
            .send(
                &user.email,
                &self.config.email_subject,
                &self.config.email_body(&reset_code.code),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = user.id,
                    email = %mask_email(&user.email),
                    error = %e,
                    event = "reset_code_delivery_failed",
                    "Failed to deliver reset code"
                );
                DomainError::Internal {
                    message: format!("Failed to send reset code: {}", e),
                }
            })?;

        Ok(CodeIssued {
            code_id: reset_code.id,
            expires_at: reset_code.expires_at,
            message_id,
        })
    }

    /// The newest unused, unexpired code matching `email` and `code`.
    ///
    /// Unknown email, unknown code, used code and expired code are all `None`.
    pub async fn find_valid(&self, email: &str, code: &str) -> DomainResult<Option<ResetCode>> {
        Ok(self
            .find_valid_for(email, code)
            .await?
            .map(|(_, reset_code)| reset_code))
    }

    /// Mark the code used. Returns `false` if it was already used or has expired.
    pub async fn consume(&self, reset_code: &ResetCode) -> DomainResult<bool> {
        self.code_repository
            .claim(reset_code.id, self.clock.now())
            .await
    }

    /// Check a code without spending it
    pub async fn verify_code(&self, email: &str, code: &str) -> DomainResult<()> {
        match self.find_valid_for(email, code).await? {
            Some((user, _)) => {
                tracing::info!(
                    user_id = user.id,
                    event = "reset_code_verified",
                    "Reset code verified"
                );
                Ok(())
            }
            None => Err(self.invalid_code(email)),
        }
    }

    /// Spend the code and set a new password.
    ///
    /// The code is claimed with a conditional write, so of several concurrent
    /// resets with the same code exactly one proceeds; the others see
    /// `InvalidOrExpiredCode`. Only the password hash column is written. If
    /// that write fails the claim is released and the code stays spendable.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if !not_empty(new_password) {
            return Err(ValidationError::RequiredField {
                field: "new_password".to_string(),
            }
            .into());
        }

        let Some((user, reset_code)) = self.find_valid_for(email, code).await? else {
            return Err(self.invalid_code(email));
        };

        let password_hash = self.password_hasher.hash(new_password)?;

        if !self.consume(&reset_code).await? {
            tracing::warn!(
                user_id = user.id,
                code_id = %reset_code.id,
                event = "reset_code_claim_lost",
                "Reset code consumed concurrently"
            );
            return Err(RecoveryError::InvalidOrExpiredCode.into());
        }

        if let Err(e) = self
            .user_repository
            .update_password_hash(user.id, &password_hash)
            .await
        {
            self.release_claim(&reset_code, user.id, &e).await;
            return Err(e);
        }

        tracing::info!(
            user_id = user.id,
            code_id = %reset_code.id,
            event = "password_reset",
            "Password reset with recovery code"
        );
        Ok(())
    }

    async fn release_claim(&self, reset_code: &ResetCode, user_id: i64, cause: &DomainError) {
        match self.code_repository.release(reset_code.id).await {
            Ok(()) => tracing::warn!(
                user_id = user_id,
                code_id = %reset_code.id,
                error = %cause,
                event = "reset_code_released",
                "Password write failed, reset code released"
            ),
            Err(e) => tracing::error!(
                user_id = user_id,
                code_id = %reset_code.id,
                error = %e,
                cause = %cause,
                event = "reset_code_release_failed",
                "Password write failed and the reset code could not be released"
            ),
        }
    }

    async fn find_valid_for(
        &self,
        email: &str,
        code: &str,
    ) -> DomainResult<Option<(User, ResetCode)>> {
        if !is_numeric_code(code, CODE_LENGTH) {
            return Ok(None);
        }

        let Some(user) = self.user_repository.find_by_email(email.trim()).await? else {
            return Ok(None);
        };

        let now = self.clock.now();
        let valid = self
            .code_repository
            .find_by_user_and_code(user.id, code)
            .await?
            .into_iter()
            .find(|candidate| candidate.is_valid_at(now));

        Ok(valid.map(|reset_code| (user, reset_code)))
    }

    fn invalid_code(&self, email: &str) -> DomainError {
        tracing::warn!(
            email = %mask_email(email),
            event = "reset_code_rejected",
            "Invalid or expired reset code"
        );
        RecoveryError::InvalidOrExpiredCode.into()
    }
}

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;

use crate::domain::entities::token::{AuthIdentity, Claims};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::services::clock::Clock;

use super::config::TokenServiceConfig;

/// Resolves a bearer token into the caller's identity
pub trait AuthVerifier: Send + Sync {
    /// `AuthError::Unauthenticated` for any malformed, forged or expired token
    fn verify(&self, token: &str) -> DomainResult<AuthIdentity>;
}

pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            clock,
        }
    }

    /// Sign an access token for `user`
    pub fn issue(&self, user: &User) -> DomainResult<String> {
        let claims = Claims::for_user(
            user,
            &self.config.issuer,
            self.clock.now(),
            self.config.access_token_expiry_seconds,
        );
        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to sign token: {}", e),
            }
        })
    }

    /// Decode and validate signature, issuer and expiry
    pub fn decode_claims(&self, token: &str) -> DomainResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, event = "token_rejected", "Bearer token rejected");
                AuthError::Unauthenticated.into()
            })
    }

    /// Lifetime of issued tokens in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.access_token_expiry_seconds
    }
}

impl AuthVerifier for TokenService {
    fn verify(&self, token: &str) -> DomainResult<AuthIdentity> {
        let claims = self.decode_claims(token)?;
        let user_id = claims
            .user_id()
            .ok_or(DomainError::Auth(AuthError::Unauthenticated))?;
        Ok(AuthIdentity {
            user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}

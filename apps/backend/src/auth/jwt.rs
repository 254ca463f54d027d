use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::{ClaimSet, Subject};
use crate::auth::clock::Clock;
use crate::auth::secret_store::SecretStore;
use crate::errors::{DomainError, InfraErrorKind};

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Access and refresh token issued together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// Signs and verifies HS256 tokens with whatever secret the store holds at
/// the moment of the call. Holds no other state.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secrets: Arc<SecretStore>,
    clock: Arc<dyn Clock>,
    algorithm: Algorithm,
}

impl TokenCodec {
    pub fn new(secrets: Arc<SecretStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            secrets,
            clock,
            algorithm: Algorithm::HS256,
        }
    }

    pub fn secrets(&self) -> &Arc<SecretStore> {
        &self.secrets
    }

    fn now_secs(&self) -> Result<i64, DomainError> {
        let secs = self
            .clock
            .now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| {
                DomainError::infra(InfraErrorKind::Other("clock".into()), "clock before epoch")
            })?
            .as_secs();
        Ok(secs as i64)
    }

    /// Mint a token for `subject` expiring `ttl` from now.
    pub fn issue(&self, subject: &Subject, ttl: Duration) -> Result<String, DomainError> {
        let ttl_secs = ttl.as_secs();
        if ttl_secs == 0 {
            return Err(DomainError::infra(
                InfraErrorKind::Other("token_ttl".into()),
                "token ttl must be at least one second",
            ));
        }

        let iat = self.now_secs()?;
        let exp = i64::try_from(ttl_secs)
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::Other("token_ttl".into()),
                    "token ttl overflows the expiry timestamp",
                )
            })?;
        let claims = ClaimSet {
            email: subject.email.clone(),
            uuid: subject.uuid.clone(),
            user_id: subject.user_id,
            roles: subject.roles.clone(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let secret = self.secrets.current();
        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("jwt_encode".into()),
                format!("failed to encode token: {e}"),
            )
        })
    }

    /// Mint an access/refresh pair for the same subject.
    pub fn issue_pair(
        &self,
        subject: &Subject,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<TokenPair, DomainError> {
        Ok(TokenPair {
            access_token: self.issue(subject, access_ttl)?,
            refresh_token: self.issue(subject, refresh_ttl)?,
            token_type: TOKEN_TYPE_BEARER,
        })
    }

    /// Verify a token against the current secret and clock.
    ///
    /// Every failure collapses into `DomainError::TokenInvalid`; the
    /// sub-cause only reaches the debug log.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, DomainError> {
        // Expiry is checked below against the injected clock.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        let secret = self.secrets.current();
        let claims = decode::<ClaimSet>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::InvalidSignature => "invalid_signature",
                ErrorKind::InvalidAlgorithm => "invalid_algorithm",
                ErrorKind::MissingRequiredClaim(_) => "missing_claim",
                _ => "malformed_token",
            };
            debug!(reason, "token rejected");
            DomainError::TokenInvalid
        })?;

        if claims.exp <= claims.iat {
            debug!(reason = "non_positive_lifetime", "token rejected");
            return Err(DomainError::TokenInvalid);
        }

        if self.now_secs()? > claims.exp {
            debug!(reason = "token_expired", "token rejected");
            return Err(DomainError::TokenInvalid);
        }

        Ok(claims)
    }
}

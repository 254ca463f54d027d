//! Grant dispatch for the login endpoint.
//!
//! Each call is a single-shot transition from "request received" to either
//! granted or rejected. Nothing is persisted between calls.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::claims::{ClaimSet, Subject};
use crate::auth::jwt::{TokenCodec, TokenPair};
use crate::auth::password::{verify_against_dummy, verify_password};
use crate::config::auth::AuthConfig;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::logging::security;
use crate::repos::users::UserStore;

pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";
pub const GRANT_TOKEN_DECODE: &str = "token_decode";

const EMAIL_MIN_LEN: usize = 6;
const EMAIL_MAX_LEN: usize = 32;

#[allow(clippy::unwrap_used)]
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").unwrap());

/// Login request body as received on the wire.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub token: String,
}

/// The closed set of grants, plus an explicit unknown case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantRequest {
    AuthorizationCode { email: String, password: String },
    RefreshToken { token: String },
    TokenDecode { token: String },
    Unsupported(String),
}

impl GrantRequest {
    /// Shape-check a raw request. Nothing here touches credentials.
    pub fn parse(request: &LoginRequest) -> Result<Self, DomainError> {
        let grant_type = request.grant_type.trim();
        if grant_type.is_empty() {
            return Err(DomainError::malformed("grant_type is required"));
        }

        match grant_type {
            GRANT_AUTHORIZATION_CODE => {
                let email = request.email.trim();
                if !is_valid_email(email) {
                    return Err(DomainError::malformed(format!(
                        "email must be a valid address of {EMAIL_MIN_LEN}-{EMAIL_MAX_LEN} characters"
                    )));
                }
                if request.password.is_empty() {
                    return Err(DomainError::malformed("password is required"));
                }
                Ok(Self::AuthorizationCode {
                    email: email.to_string(),
                    password: request.password.clone(),
                })
            }
            GRANT_REFRESH_TOKEN => Ok(Self::RefreshToken {
                token: required_token(&request.token)?,
            }),
            GRANT_TOKEN_DECODE => Ok(Self::TokenDecode {
                token: required_token(&request.token)?,
            }),
            other => Ok(Self::Unsupported(other.to_string())),
        }
    }
}

fn required_token(token: &str) -> Result<String, DomainError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(DomainError::malformed("token is required"));
    }
    Ok(token.to_string())
}

fn is_valid_email(email: &str) -> bool {
    let len = email.chars().count();
    (EMAIL_MIN_LEN..=EMAIL_MAX_LEN).contains(&len) && EMAIL_SHAPE.is_match(email)
}

/// Successful grant result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LoginOutcome {
    Tokens(TokenPair),
    Claims(ClaimSet),
}

pub struct AuthFlow {
    users: Arc<dyn UserStore>,
    codec: TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
    lookup_timeout: Duration,
}

impl AuthFlow {
    pub fn new(users: Arc<dyn UserStore>, codec: TokenCodec, config: &AuthConfig) -> Self {
        Self {
            users,
            codec,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            lookup_timeout: config.user_lookup_timeout,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Parse and dispatch a raw login request.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, DomainError> {
        let grant = GrantRequest::parse(request)?;
        self.dispatch(grant).await
    }

    pub async fn dispatch(&self, grant: GrantRequest) -> Result<LoginOutcome, DomainError> {
        match grant {
            GrantRequest::AuthorizationCode { email, password } => self
                .authorization_code(&email, &password)
                .await
                .map(LoginOutcome::Tokens),
            GrantRequest::RefreshToken { token } => {
                self.refresh(&token).map(LoginOutcome::Tokens)
            }
            GrantRequest::TokenDecode { token } => {
                self.introspect(&token).map(LoginOutcome::Claims)
            }
            GrantRequest::Unsupported(grant_type) => {
                Err(DomainError::UnsupportedGrant(grant_type))
            }
        }
    }

    /// Decode a token without issuing anything.
    pub fn introspect(&self, token: &str) -> Result<ClaimSet, DomainError> {
        self.codec.verify(token).inspect_err(|_| {
            security::token_rejected(GRANT_TOKEN_DECODE);
        })
    }

    /// Verify a bearer token before trusting any of its roles.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, DomainError> {
        self.codec.verify(token)
    }

    async fn authorization_code(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, DomainError> {
        let lookup = tokio::time::timeout(
            self.lookup_timeout,
            self.users.find_enabled_user_by_email(email),
        )
        .await
        .map_err(|_| {
            DomainError::infra(
                InfraErrorKind::Timeout,
                format!("user lookup exceeded {}ms", self.lookup_timeout.as_millis()),
            )
        })?;

        let Some(user) = lookup? else {
            verify_against_dummy(password).await;
            security::login_failed("unknown_or_disabled_account", email);
            return Err(DomainError::AuthenticationFailed);
        };

        if !verify_password(&user.password_hash, password).await {
            security::login_failed("password_mismatch", email);
            return Err(DomainError::AuthenticationFailed);
        }

        let subject = Subject {
            email: user.email,
            uuid: user.uuid,
            user_id: user.id,
            roles: user.roles,
        };
        let pair = self
            .codec
            .issue_pair(&subject, self.access_ttl, self.refresh_ttl)?;

        info!(user_id = subject.user_id, "authorization granted");
        Ok(pair)
    }

    fn refresh(&self, token: &str) -> Result<TokenPair, DomainError> {
        let claims = self.codec.verify(token).inspect_err(|_| {
            security::token_rejected(GRANT_REFRESH_TOKEN);
        })?;

        let pair = self
            .codec
            .issue_pair(&claims.subject(), self.access_ttl, self.refresh_ttl)?;

        info!(user_id = claims.user_id, "token pair refreshed");
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use async_trait::async_trait;

    use super::*;
    use crate::adapters::users_memory::InMemoryUserStore;
    use crate::auth::clock::ManualClock;
    use crate::auth::password::hash_password;
    use crate::auth::secret_store::{OsRandomSecretSource, SecretStore};
    use crate::repos::users::UserRecord;

    const MINUTE: Duration = Duration::from_secs(60);

    struct Harness {
        flow: AuthFlow,
        clock: Arc<ManualClock>,
        users: Arc<InMemoryUserStore>,
    }

    fn harness() -> Harness {
        let users = Arc::new(InMemoryUserStore::new());
        users.insert(
            UserRecord {
                id: 1,
                uuid: "u1".to_string(),
                email: "a@b.com".to_string(),
                password_hash: hash_password("pa55word", 4).unwrap(),
                roles: vec!["admin".to_string()],
            },
            false,
        );

        let clock = Arc::new(ManualClock::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000)));
        let store = Arc::new(SecretStore::generate(Arc::new(OsRandomSecretSource)).unwrap());
        let codec = TokenCodec::new(store, clock.clone());
        let flow = AuthFlow::new(users.clone(), codec, &AuthConfig::default());

        Harness { flow, clock, users }
    }

    fn password_login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            grant_type: GRANT_AUTHORIZATION_CODE.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    fn token_request(grant_type: &str, token: &str) -> LoginRequest {
        LoginRequest {
            grant_type: grant_type.to_string(),
            token: token.to_string(),
            ..Default::default()
        }
    }

    fn expect_tokens(outcome: LoginOutcome) -> TokenPair {
        match outcome {
            LoginOutcome::Tokens(pair) => pair,
            other => panic!("expected tokens, got {other:?}"),
        }
    }

    #[test]
    fn parse_routes_known_grants() {
        let parsed = GrantRequest::parse(&password_login("a@b.com", "x")).unwrap();
        assert!(matches!(parsed, GrantRequest::AuthorizationCode { .. }));

        let parsed = GrantRequest::parse(&token_request("refresh_token", "t")).unwrap();
        assert_eq!(parsed, GrantRequest::RefreshToken { token: "t".into() });

        let parsed = GrantRequest::parse(&token_request("token_decode", "t")).unwrap();
        assert_eq!(parsed, GrantRequest::TokenDecode { token: "t".into() });
    }

    #[test]
    fn parse_keeps_unknown_grants_explicit() {
        let parsed = GrantRequest::parse(&token_request("password", "")).unwrap();
        assert_eq!(parsed, GrantRequest::Unsupported("password".into()));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        let cases = [
            LoginRequest::default(),
            password_login("", "x"),
            password_login("a@b", "x"),
            password_login("no-at-sign.com", "x"),
            password_login("averyveryverylongname@example-domain.com", "x"),
            password_login("a@b.com", ""),
            token_request("refresh_token", "   "),
            token_request("token_decode", ""),
        ];
        for request in cases {
            assert!(
                matches!(
                    GrantRequest::parse(&request),
                    Err(DomainError::MalformedInput(_))
                ),
                "{request:?} should be malformed"
            );
        }
    }

    #[tokio::test]
    async fn password_grant_issues_pair_with_account_roles() {
        let h = harness();
        let pair = expect_tokens(h.flow.login(&password_login("a@b.com", "pa55word")).await.unwrap());

        assert_eq!(pair.token_type, "Bearer");
        let access = h.flow.verify(&pair.access_token).unwrap();
        assert_eq!(access.roles, vec!["admin".to_string()]);
        assert_eq!(access.uuid, "u1");
        assert_eq!(access.user_id, 1);
    }

    #[tokio::test]
    async fn wrong_password_unknown_user_and_disabled_user_are_indistinguishable() {
        let h = harness();

        let wrong = h.flow.login(&password_login("a@b.com", "nope")).await.unwrap_err();
        let unknown = h
            .flow
            .login(&password_login("ghost@b.com", "pa55word"))
            .await
            .unwrap_err();
        h.users.set_disabled("a@b.com", true);
        let disabled = h
            .flow
            .login(&password_login("a@b.com", "pa55word"))
            .await
            .unwrap_err();

        assert_eq!(wrong, DomainError::AuthenticationFailed);
        assert_eq!(unknown, wrong);
        assert_eq!(disabled, wrong);
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn refresh_grant_carries_subject_and_roles_forward() {
        let h = harness();
        let first = expect_tokens(h.flow.login(&password_login("a@b.com", "pa55word")).await.unwrap());

        h.clock.advance(10 * MINUTE);
        let second = expect_tokens(
            h.flow
                .login(&token_request("refresh_token", &first.refresh_token))
                .await
                .unwrap(),
        );

        let original = h.flow.verify(&first.refresh_token).unwrap();
        let renewed = h.flow.verify(&second.access_token).unwrap();
        assert_eq!(renewed.subject(), original.subject());
        assert!(renewed.iat > original.iat);
    }

    #[tokio::test]
    async fn refresh_with_expired_or_tampered_token_is_token_invalid() {
        let h = harness();
        let pair = expect_tokens(h.flow.login(&password_login("a@b.com", "pa55word")).await.unwrap());

        let mut tampered = pair.refresh_token.clone();
        tampered.push('x');
        let err = h
            .flow
            .login(&token_request("refresh_token", &tampered))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::TokenInvalid);

        h.clock.advance(66 * MINUTE);
        let err = h
            .flow
            .login(&token_request("refresh_token", &pair.refresh_token))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::TokenInvalid);
    }

    #[tokio::test]
    async fn token_decode_returns_claims() {
        let h = harness();
        let pair = expect_tokens(h.flow.login(&password_login("a@b.com", "pa55word")).await.unwrap());

        match h
            .flow
            .login(&token_request("token_decode", &pair.access_token))
            .await
            .unwrap()
        {
            LoginOutcome::Claims(claims) => assert_eq!(claims.email, "a@b.com"),
            other => panic!("expected claims, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_grant_is_unsupported() {
        let h = harness();
        let err = h
            .flow
            .login(&token_request("client_credentials", "whatever"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::UnsupportedGrant("client_credentials".into()));
    }

    #[tokio::test]
    async fn access_expires_before_refresh() {
        let h = harness();
        let pair = expect_tokens(h.flow.login(&password_login("a@b.com", "pa55word")).await.unwrap());

        assert_eq!(
            h.flow.introspect(&pair.access_token).unwrap().roles,
            vec!["admin".to_string()]
        );

        h.clock.advance(61 * MINUTE);
        assert_eq!(
            h.flow.verify(&pair.access_token),
            Err(DomainError::TokenInvalid)
        );
        assert!(h.flow.verify(&pair.refresh_token).is_ok());
    }

    #[tokio::test]
    async fn rotation_forces_reauthentication() {
        let h = harness();
        let pair = expect_tokens(h.flow.login(&password_login("a@b.com", "pa55word")).await.unwrap());

        h.flow.codec().secrets().rotate().unwrap();

        let err = h
            .flow
            .login(&token_request("refresh_token", &pair.refresh_token))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::TokenInvalid);
        assert!(h.flow.login(&password_login("a@b.com", "pa55word")).await.is_ok());
    }

    struct StalledStore;

    #[async_trait]
    impl UserStore for StalledStore {
        async fn find_enabled_user_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserRecord>, DomainError> {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_user_lookup_times_out() {
        let clock = Arc::new(ManualClock::new(SystemTime::now()));
        let store = Arc::new(SecretStore::generate(Arc::new(OsRandomSecretSource)).unwrap());
        let flow = AuthFlow::new(
            Arc::new(StalledStore),
            TokenCodec::new(store, clock),
            &AuthConfig::default(),
        );

        let err = flow
            .login(&password_login("a@b.com", "pa55word"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Infra(InfraErrorKind::Timeout, _)));
    }
}

//! Session token codec.
//!
//! Tokens are HS256 JWTs carrying [`SessionClaims`]: the subject id, when it
//! was issued and when it expires.  Verification is a pure function of
//! `(token, secret, now)`.  The caller supplies `now`, which keeps expiry
//! testable without touching the clock, and the codec does its own
//! `now < exp` check with zero leeway instead of relying on the library's
//! wall-clock check.
//!
//! There is no revocation: a token is valid until it expires.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use shared::types::SessionClaims;

/// Default token lifetime.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Identity proven by a verified session token.
///
/// Only [`SessionTokenCodec::verify`] can construct one, so any function
/// taking an `AuthenticatedUser` cannot be reached without a valid token.
/// It carries the subject id and nothing else: no roles, no scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: i64,
}

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.id
    }
}

/// Issues and verifies session tokens with a process-wide signing secret.
pub struct SessionTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime_secs: u64,
}

impl fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl SessionTokenCodec {
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's `now` in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime_secs: lifetime.as_secs(),
        })
    }

    /// Seconds a freshly issued token stays valid.
    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Sign a token for `identity_id`, valid from `now` for the configured
    /// lifetime.
    pub fn issue(&self, identity_id: i64, now: u64) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: identity_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.lifetime_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the subject on success.
    pub fn verify(&self, token: &str, now: u64) -> Result<AuthenticatedUser, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            },
        )?;

        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        let id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed)?;

        Ok(AuthenticatedUser { id })
    }
}

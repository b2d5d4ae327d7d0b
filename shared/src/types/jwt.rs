use serde::{Deserialize, Serialize};

/// Claims embedded in every session token issued by the gateway.
///
/// The token carries identity and nothing else.  It is verified on every
/// request (HMAC signature + expiry) with **zero DB reads**, and there is no
/// server-side session table: a token stays valid until `exp` even after
/// the user logs in again elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Standard JWT subject: the numeric user ID (matches `users.id`),
    /// carried as a decimal string per RFC 7519.
    pub sub: String,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: u64,

    /// Standard JWT expiry (Unix timestamp, seconds).  The token is valid
    /// only while `now < exp`.
    pub exp: u64,
}

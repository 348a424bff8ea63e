//! Authentication ports.

use chrono::TimeDelta;

/// Claims carried by a bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// The user's email address.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token service trait for issuing and checking bearer tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject` with the configured lifetime.
    fn generate_token(&self, subject: &str) -> Result<String, AuthError>;

    /// Issue a token for `subject` expiring `ttl` from now.
    fn generate_token_with_ttl(&self, subject: &str, ttl: TimeDelta) -> Result<String, AuthError>;

    /// Validate signature, issuer and expiry, and decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Default token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;

    /// Subject of a valid token, `None` for any failure.
    fn verify_subject(&self, token: &str) -> Option<String> {
        self.validate_token(token).ok().map(|claims| claims.sub)
    }
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with the current scheme.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a password against a stored hash of any supported scheme.
    /// Malformed hashes and internal failures count as a mismatch.
    fn verify(&self, password: &str, hash: &str) -> bool;

    /// Whether a stored hash should be replaced with a current-scheme hash.
    fn needs_rehash(&self, hash: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid or expired token")]
    Unauthenticated,

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}

//! Signup, login and bearer-token resolution.

use std::sync::Arc;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

const EMAIL_TAKEN: &str = "Email already registered";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: i64,
}

/// Account operations and the request auth guard.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    rehash_legacy: bool,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            rehash_legacy: false,
        }
    }

    /// Replace legacy password hashes with current ones on successful login.
    pub fn with_legacy_rehash(mut self, enabled: bool) -> Self {
        self.rehash_legacy = enabled;
        self
    }

    /// Register a new account and sign it in.
    pub async fn signup(&self, email: &str, password: &str) -> Result<AccessToken, DomainError> {
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("Password must not be empty".to_string()));
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Duplicate(EMAIL_TAKEN.to_string()));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        // A concurrent signup can still win the race past the lookup above.
        let user = self
            .users
            .insert(User::new(email.to_string(), password_hash))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => DomainError::Duplicate(EMAIL_TAKEN.to_string()),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        self.issue(&user.email)
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        if !self.passwords.verify(password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let token = self.issue(&user.email)?;

        if self.rehash_legacy && self.passwords.needs_rehash(&user.password_hash) {
            self.upgrade_hash(user, password).await;
        }

        Ok(token)
    }

    /// Resolve a bearer token to its user. Every failure is `None`.
    pub async fn resolve_optional(&self, bearer: Option<&str>) -> Option<User> {
        let subject = self.tokens.verify_subject(bearer?)?;

        match self.users.find_by_email(&subject).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed while resolving token");
                None
            }
        }
    }

    /// Like [`AuthService::resolve_optional`], but absence is an error.
    pub async fn resolve_required(&self, bearer: Option<&str>) -> Result<User, AuthError> {
        self.resolve_optional(bearer)
            .await
            .ok_or(AuthError::Unauthenticated)
    }

    fn issue(&self, subject: &str) -> Result<AccessToken, DomainError> {
        let token = self
            .tokens
            .generate_token(subject)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(AccessToken {
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    async fn upgrade_hash(&self, mut user: User, password: &str) {
        let password_hash = match self.passwords.hash(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Could not rehash legacy password");
                return;
            }
        };

        user.password_hash = password_hash;
        let user_id = user.id;
        match self.users.update(user).await {
            Ok(_) => tracing::info!(%user_id, "Upgraded legacy password hash"),
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "Could not store upgraded password hash")
            }
        }
    }
}

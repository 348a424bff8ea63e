//! Password hashing: Argon2 for new hashes, bcrypt accepted for legacy ones.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use scribe_core::domain::HashScheme;
use scribe_core::ports::{AuthError, PasswordService};

/// Argon2-based password service that still verifies legacy bcrypt hashes.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    fn verify_argon2(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::debug!("Stored argon2 hash is malformed");
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    fn verify_bcrypt(password: &str, hash: &str) -> bool {
        let bytes = password.as_bytes();
        let truncated = &bytes[..bytes.len().min(HashScheme::BCRYPT_MAX_INPUT)];

        bcrypt::verify(truncated, hash).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Stored bcrypt hash could not be checked");
            false
        })
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        if password.is_empty() {
            return false;
        }

        match HashScheme::detect(hash) {
            Some(HashScheme::Argon2) => self.verify_argon2(password, hash),
            Some(HashScheme::Bcrypt) => Self::verify_bcrypt(password, hash),
            None => false,
        }
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        !HashScheme::detect(hash).is_some_and(|scheme| scheme.is_current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the legacy tests fast.
    fn legacy_hash(password: &[u8]) -> String {
        bcrypt::hash(password, 4).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = Argon2PasswordService::new();
        let password = "secure_password_123";

        let hash = service.hash(password).unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(service.verify(password, &hash));
        assert!(!service.verify("secure_password_123x", &hash));
        assert!(!service.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = Argon2PasswordService::new();
        assert_ne!(service.hash("pw1").unwrap(), service.hash("pw1").unwrap());
    }

    #[test]
    fn test_current_scheme_does_not_truncate() {
        let service = Argon2PasswordService::new();
        let base = "a".repeat(72);

        let hash = service.hash(&base).unwrap();
        assert!(!service.verify(&format!("{base}tail"), &hash));
    }

    #[test]
    fn test_verify_legacy_bcrypt() {
        let service = Argon2PasswordService::new();
        let hash = legacy_hash(b"pw1");

        assert!(service.verify("pw1", &hash));
        assert!(!service.verify("pw1x", &hash));
    }

    #[test]
    fn test_legacy_truncation_equivalence() {
        let service = Argon2PasswordService::new();
        let prefix = "p".repeat(72);
        let hash = legacy_hash(prefix.as_bytes());

        assert!(service.verify(&prefix, &hash));
        assert!(service.verify(&format!("{prefix}anything"), &hash));
        assert!(service.verify(&format!("{prefix}{}", "z".repeat(200)), &hash));
        assert!(!service.verify(&prefix[..71], &hash));
    }

    #[test]
    fn test_malformed_input_is_false() {
        let service = Argon2PasswordService::new();
        let hash = service.hash("pw1").unwrap();

        assert!(!service.verify("", &hash));
        assert!(!service.verify("pw1", ""));
        assert!(!service.verify("pw1", "not-a-hash"));
        assert!(!service.verify("pw1", "$argon2id$garbage"));
        assert!(!service.verify("pw1", "$2b$04$short"));
    }

    #[test]
    fn test_needs_rehash() {
        let service = Argon2PasswordService::new();

        assert!(!service.needs_rehash(&service.hash("pw1").unwrap()));
        assert!(service.needs_rehash(&legacy_hash(b"pw1")));
        assert!(service.needs_rehash("unknown"));
    }
}

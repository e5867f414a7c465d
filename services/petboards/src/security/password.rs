//! Password hashing with Argon2

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use std::fmt;
use tracing::warn;

/// Hashed password in PHC string format.
///
/// Only ever compared through [`CredentialHasher::verify`].
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Wrap a PHC string loaded from storage
    pub fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Salted, intentionally slow one-way password hashing
#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `password` with a freshly generated salt
    pub fn hash(&self, password: &str) -> Result<Credential, password_hash::Error> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;

        Ok(Credential(hash.to_string()))
    }

    /// Check `password` against a stored credential.
    ///
    /// Returns `false` on mismatch and on a credential that cannot be parsed.
    pub fn verify(&self, password: &str, credential: &Credential) -> bool {
        let parsed_hash = match PasswordHash::new(credential.as_str()) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Stored credential could not be parsed: {}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = CredentialHasher::new();
        let credential = hasher.hash("secret123").unwrap();

        assert!(hasher.verify("secret123", &credential));
        assert!(!hasher.verify("wrong", &credential));
        assert!(!hasher.verify("", &credential));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = CredentialHasher::new();
        let first = hasher.hash("letmein").unwrap();
        let second = hasher.hash("letmein").unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(hasher.verify("letmein", &first));
        assert!(hasher.verify("letmein", &second));
    }

    #[test]
    fn test_credential_is_not_plaintext() {
        let hasher = CredentialHasher::new();
        let credential = hasher.hash("letmein").unwrap();

        assert!(credential.as_str().starts_with("$argon2"));
        assert!(!credential.as_str().contains("letmein"));
        assert_eq!(format!("{:?}", credential), "Credential(..)");
    }

    #[test]
    fn test_unparseable_credential_does_not_verify() {
        let hasher = CredentialHasher::new();
        let garbage = Credential::from_stored("not-a-phc-string".to_string());

        assert!(!hasher.verify("anything", &garbage));
    }
}

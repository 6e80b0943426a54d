//! Argon2id / SHA-256 implementation of the `Credentials` trait.
//!
//! Admin passwords are stored as Argon2id PHC strings. Bearer tokens are
//! random, shown once, and stored only as their lowercase-hex SHA-256
//! digest so a leaked database does not leak usable tokens.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use sha2::{Digest, Sha256};

use arcana_core::user::credentials::Credentials;
use arcana_types::error::UserError;

/// Prefix of every issued bearer token.
pub const TOKEN_PREFIX: &str = "arc_";

/// Random bytes per token before hex encoding.
const TOKEN_BYTES: usize = 32;

pub struct Argon2Credentials {
    argon2: Argon2<'static>,
}

impl Argon2Credentials {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2Credentials {
    fn default() -> Self {
        Self::new()
    }
}

impl Credentials for Argon2Credentials {
    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::Hashing(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{TOKEN_PREFIX}{hex}")
    }

    fn hash_token(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        format!("{:x}", digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let creds = Argon2Credentials::new();
        let hash = creds.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(creds.verify_password("correct horse", &hash));
        assert!(!creds.verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_password_hash_is_salted() {
        let creds = Argon2Credentials::new();
        let a = creds.hash_password("same").unwrap();
        let b = creds.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let creds = Argon2Credentials::new();
        assert!(!creds.verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_token_shape() {
        let creds = Argon2Credentials::new();
        let token = creds.generate_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + TOKEN_BYTES * 2);
        assert_ne!(token, creds.generate_token());
    }

    #[test]
    fn test_token_hash_known_value() {
        let creds = Argon2Credentials::new();
        assert_eq!(
            creds.hash_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(creds.hash_token("arc_x"), creds.hash_token("arc_x"));
    }
}

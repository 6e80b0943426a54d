//! Credentials trait for password and access-token hashing.
//!
//! Defined here so services can hash secrets without coupling to a
//! specific algorithm. The argon2/SHA-256 adapter lives in arcana-infra.

use arcana_types::error::UserError;

pub trait Credentials: Send + Sync {
    /// Slow, salted hash of an admin password (PHC string).
    fn hash_password(&self, password: &str) -> Result<String, UserError>;

    fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// A fresh random bearer token, returned in plaintext exactly once.
    fn generate_token(&self) -> String;

    /// Deterministic lookup hash of a bearer token (lowercase hex).
    fn hash_token(&self, token: &str) -> String;
}

//! Cryptographic operations for Arcana.
//!
//! - `credentials`: Argon2id admin password hashing and SHA-256 bearer
//!   token hashing

pub mod credentials;

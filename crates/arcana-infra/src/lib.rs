//! Infrastructure layer for Arcana.
//!
//! Contains implementations of the ports defined in `arcana-core`: SQLite
//! storage, the OpenAI-compatible LLM provider, config file loading, and
//! credential hashing (argon2 passwords, SHA-256 access tokens).

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;

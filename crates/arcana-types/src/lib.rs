//! Shared domain types for Arcana.
//!
//! This crate contains the core domain types used across the Arcana tarot
//! backend: chats and their message log, users, topics, the card deck, feed
//! posts, horoscopes, LLM request shapes, configuration, and the error enums
//! shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod card;
pub mod chat;
pub mod config;
pub mod error;
pub mod horoscope;
pub mod llm;
pub mod post;
pub mod topic;
pub mod user;

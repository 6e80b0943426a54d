//! Business logic and port definitions for Arcana.
//!
//! This crate defines the "ports" (repository, oracle, and transport traits)
//! that the infrastructure and API layers implement. It depends only on
//! `arcana-types` -- never on `arcana-infra` or any database/IO crate.

pub mod card;
pub mod chat;
pub mod horoscope;
pub mod llm;
pub mod oracle;
pub mod post;
pub mod scheduler;
pub mod topic;
pub mod transport;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

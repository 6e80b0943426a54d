//! The tarot deck.

pub mod repository;
pub mod service;

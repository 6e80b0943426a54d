//! Daily horoscopes and their translation cache.

pub mod repository;
pub mod service;

//! Reading topics.

pub mod repository;
pub mod service;

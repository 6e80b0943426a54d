//! The social feed: admin posts read by every app user.

pub mod repository;
pub mod service;

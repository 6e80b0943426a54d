//! App and admin users, their points, and their access tokens.

pub mod credentials;
pub mod repository;
pub mod service;

pub mod auth;
pub mod query;

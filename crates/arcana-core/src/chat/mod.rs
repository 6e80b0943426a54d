//! Tarot reading chats.
//!
//! - `repository`: persistence port for chats and their message log
//! - `machine`: pure stage transitions over a `Chat`
//! - `locks`: per-chat serialization of inbound message handling
//! - `log`: the message log view (append, page, history, mark seen)
//! - `service`: the session state machine driving a reading end to end

pub mod locks;
pub mod log;
pub mod machine;
pub mod repository;
pub mod service;

//! Shams: a group-chat moderation guard.
//!
//! [`moderation`] holds the transport-free decision engine; the remaining
//! modules wire it to Telegram, a JSON settings file and process plumbing.

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod moderation;
pub mod settings;
pub mod telegram;

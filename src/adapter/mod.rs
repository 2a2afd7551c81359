//! Concrete implementations of the port traits.
//!
//! Each submodule adapts one external system: the upstream marketplace
//! API, SQLite persistence, the local media cache, and the Telegram Bot
//! API.

pub mod media;
pub mod sqlite;
pub mod telegram;
pub mod vinted;

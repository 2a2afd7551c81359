//! Telegram delivery channel.

pub mod channel;
pub mod format;

pub use channel::TelegramChannel;

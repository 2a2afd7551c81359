//! Thriftwatch - marketplace listing watcher with deduplicated Telegram
//! delivery.
//!
//! The pipeline polls upstream catalog searches for a set of tracked
//! categories, deduplicates the results globally by upstream id, and
//! delivers each captured listing exactly once to every subscribed user.
//! A daily reset empties the store so the catalog is re-captured fresh.
//!
//! # Architecture
//!
//! - [`domain`]: core types ([`domain::Listing`], [`domain::Category`]).
//! - [`port`]: trait seams between the pipeline and the outside world.
//! - [`adapter`]: Vinted HTTP client, SQLite persistence, media cache,
//!   Telegram channel.
//! - [`service`]: ingestion, notification, and the scheduler loop.
//! - [`cli`]: operator commands.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod service;

pub use error::{Error, Result};

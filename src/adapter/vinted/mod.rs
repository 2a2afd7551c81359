//! Vinted catalog API adapter.
//!
//! Implements [`crate::port::MarketplaceSource`] against the Vinted site
//! API: cookie-based session obtained from the token-refresh endpoint,
//! catalog search per category, bounded re-auth and retry on failure.

pub mod catalog;
pub mod client;
pub mod dto;

pub use client::VintedClient;

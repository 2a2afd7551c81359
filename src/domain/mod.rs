//! Core domain types shared across the pipeline.
//!
//! These types are storage- and transport-agnostic: adapters convert to and
//! from them at the edges.

pub mod category;
pub mod id;
pub mod listing;

pub use category::Category;
pub use id::{CategoryId, ListingId, UserId};
pub use listing::{Listing, RenderedListing};

//! Listing store port.

use std::collections::HashSet;

use crate::domain::{Category, Listing, ListingId, UserId};
use crate::error::Result;

/// Durable store of captured listings.
///
/// Writers race: two concurrent ingestion cycles may discover the same new
/// identifier and both attempt the insert. Exactly one row lands, the other
/// conflict is ignored, and neither treats it as an error.
pub trait ListingStore: Send + Sync {
    /// All identifiers ever inserted.
    ///
    /// Dedup scope is global: the upstream id is source-wide, so a listing
    /// discovered under one category is known to every other category's
    /// cycle.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    fn known_ids(&self) -> Result<HashSet<ListingId>>;

    /// Bulk insert with insert-or-ignore semantics.
    ///
    /// A duplicate `unique_id` is silently skipped, never updated. Returns
    /// the number of rows actually inserted.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    fn insert_new(&self, listings: &[Listing]) -> Result<usize>;

    /// Listings in a category not yet delivered to the user, ordered by
    /// (brand name, price) ascending.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    fn unpublished_for(&self, user: UserId, category: &Category) -> Result<Vec<Listing>>;

    /// Drop all listings and cascade their delivery records.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    fn reset(&self) -> Result<()>;
}

//! SQLite listing store implementation.

use std::collections::HashSet;

use diesel::prelude::*;

use super::model::ListingRow;
use super::schema::{deliveries, listings};
use super::DbPool;
use crate::domain::{Category, Listing, ListingId, UserId};
use crate::error::{Error, Result};
use crate::port::ListingStore;

/// SQLite-backed listing store.
///
/// Insert-or-ignore keeps concurrent ingestion cycles idempotent: the
/// unique `unique_id` constraint absorbs duplicate discoveries silently.
pub struct SqliteListingStore {
    pool: DbPool,
}

impl SqliteListingStore {
    /// Create a new listing store on the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ListingStore for SqliteListingStore {
    fn known_ids(&self) -> Result<HashSet<ListingId>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let ids: Vec<i64> = listings::table
            .select(listings::unique_id)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(ids.into_iter().map(ListingId).collect())
    }

    fn insert_new(&self, new_listings: &[Listing]) -> Result<usize> {
        if new_listings.is_empty() {
            return Ok(0);
        }

        let rows: Vec<ListingRow> = new_listings
            .iter()
            .map(ListingRow::from_domain)
            .collect::<Result<_>>()?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let inserted = diesel::insert_or_ignore_into(listings::table)
            .values(&rows)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(inserted)
    }

    fn unpublished_for(&self, user: UserId, category: &Category) -> Result<Vec<Listing>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let delivered = deliveries::table
            .filter(deliveries::user_id.eq(user.0))
            .select(deliveries::listing_id);

        let rows: Vec<ListingRow> = listings::table
            .filter(listings::category_id.eq(category.id.0))
            .filter(listings::unique_id.ne_all(delivered))
            .order((listings::brand_name.asc(), listings::price.asc()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(ListingRow::into_domain).collect()
    }

    fn reset(&self) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(deliveries::table).execute(conn)?;
            diesel::delete(listings::table).execute(conn)?;
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}

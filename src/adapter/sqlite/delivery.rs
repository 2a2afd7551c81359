//! SQLite delivery tracker.

use diesel::prelude::*;

use super::model::DeliveryRow;
use super::schema::deliveries;
use super::DbPool;
use crate::domain::{ListingId, UserId};
use crate::error::{Error, Result};
use crate::port::DeliveryTracker;

pub struct SqliteDeliveryTracker {
    pool: DbPool,
}

impl SqliteDeliveryTracker {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DeliveryTracker for SqliteDeliveryTracker {
    fn is_delivered(&self, user: UserId, listing: ListingId) -> Result<bool> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let count: i64 = deliveries::table
            .filter(deliveries::user_id.eq(user.0))
            .filter(deliveries::listing_id.eq(listing.0))
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(count > 0)
    }

    fn mark_delivered(&self, user: UserId, listing: ListingId) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_or_ignore_into(deliveries::table)
            .values(DeliveryRow {
                user_id: user.0,
                listing_id: listing.0,
            })
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::sqlite::testing::setup_test_db;

    #[test]
    fn unmarked_pair_is_not_delivered() {
        let tracker = SqliteDeliveryTracker::new(setup_test_db());
        assert!(!tracker.is_delivered(UserId(7), ListingId(101)).unwrap());
    }

    #[test]
    fn mark_then_check() {
        let tracker = SqliteDeliveryTracker::new(setup_test_db());

        tracker.mark_delivered(UserId(7), ListingId(101)).unwrap();

        assert!(tracker.is_delivered(UserId(7), ListingId(101)).unwrap());
        assert!(!tracker.is_delivered(UserId(8), ListingId(101)).unwrap());
        assert!(!tracker.is_delivered(UserId(7), ListingId(102)).unwrap());
    }

    #[test]
    fn duplicate_mark_is_a_noop() {
        let tracker = SqliteDeliveryTracker::new(setup_test_db());

        tracker.mark_delivered(UserId(7), ListingId(101)).unwrap();
        tracker.mark_delivered(UserId(7), ListingId(101)).unwrap();

        assert!(tracker.is_delivered(UserId(7), ListingId(101)).unwrap());
    }
}

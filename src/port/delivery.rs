//! Delivery tracking port.

use crate::domain::{ListingId, UserId};
use crate::error::Result;

/// Durable record of (user, listing) pairs already delivered.
///
/// Existence of a record means the listing has been shown to the user and
/// must never be shown again; records are purged together with listings by
/// the daily reset.
pub trait DeliveryTracker: Send + Sync {
    /// Whether the listing was already delivered to the user.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    fn is_delivered(&self, user: UserId, listing: ListingId) -> Result<bool>;

    /// Record a successful delivery. Idempotent: the unique pair constraint
    /// absorbs duplicate marks silently.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    fn mark_delivered(&self, user: UserId, listing: ListingId) -> Result<()>;
}

//! Delivery channel port.

use async_trait::async_trait;

use crate::domain::{RenderedListing, UserId};
use crate::error::Result;

/// External channel that puts a listing in front of a user.
///
/// A returned error means the listing was not shown: the caller must skip
/// the delivery record so the listing is retried on the next cycle. Failure
/// must never silently count as delivered.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Deliver one rendered listing to one user.
    ///
    /// # Errors
    /// Returns an error when the channel rejects the message or transport
    /// fails.
    async fn deliver(&self, user: UserId, listing: &RenderedListing) -> Result<()>;
}

/// Channel that drops everything; used when delivery is disabled and in
/// tests.
pub struct NullChannel;

#[async_trait]
impl DeliveryChannel for NullChannel {
    async fn deliver(&self, _user: UserId, _listing: &RenderedListing) -> Result<()> {
        Ok(())
    }
}

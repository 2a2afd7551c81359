//! Category and subscription registry port.

use crate::domain::{Category, CategoryId, UserId};
use crate::error::Result;

/// A registered end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    /// Only active users receive notifications.
    pub active: bool,
}

/// Durable store of tracked categories and per-user subscriptions.
///
/// The interactive management surface (chat commands, operator CLI) drives
/// these operations; the pipeline only reads them.
pub trait CategoryRegistry: Send + Sync {
    /// All tracked categories.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    fn list_categories(&self) -> Result<Vec<Category>>;

    /// Create a category, or return the existing one with the same name.
    ///
    /// Names are unique human-entered search terms; creating twice is a
    /// no-op that hands back the original.
    ///
    /// # Errors
    /// Returns an error if the insert or lookup fails.
    fn create_category(&self, name: &str, brand_id: Option<&str>) -> Result<Category>;

    /// Subscribe a user to a category. Idempotent: subscribing twice is a
    /// no-op, not an error.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    fn subscribe(&self, user: UserId, category: CategoryId) -> Result<()>;

    /// Remove a user's subscription.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    fn unsubscribe(&self, user: UserId, category: CategoryId) -> Result<()>;

    /// Delete a category only if its subscriber set is empty.
    ///
    /// Called after every unsubscribe. Returns true when the category was
    /// deleted.
    ///
    /// # Errors
    /// Returns an error if the query or delete fails.
    fn delete_category_if_orphaned(&self, category: CategoryId) -> Result<bool>;

    /// Users currently opted in to notifications.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    fn active_users(&self) -> Result<Vec<UserId>>;

    /// Categories a user subscribes to.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    fn subscriptions_for(&self, user: UserId) -> Result<Vec<Category>>;

    /// Insert or update a user record.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    fn upsert_user(&self, user: &User) -> Result<()>;
}

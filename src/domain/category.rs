//! Tracked search categories.

use super::id::CategoryId;

/// A tracked category: a human-entered search term, optionally narrowed to a
/// single brand.
///
/// Categories are created on user request or operator seed and never mutated
/// afterwards except for a brand filter backfill. A category with no
/// remaining subscribers is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    /// Search term sent to the upstream catalog, unique across categories.
    pub name: String,
    /// Optional upstream brand filter (`brand_ids` query parameter).
    pub brand_id: Option<String>,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            brand_id: None,
        }
    }

    #[must_use]
    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }
}

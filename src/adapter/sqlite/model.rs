//! Row structs and domain conversions.
//!
//! Prices are stored as SQLite doubles so the store can sort on them;
//! the domain side stays `Decimal`. Timestamps are RFC 3339 text.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::schema::{categories, deliveries, listings, users};
use crate::domain::{Category, CategoryId, Listing, ListingId, UserId};
use crate::error::{Error, Result};
use crate::port::registry::User;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = listings)]
pub struct ListingRow {
    pub unique_id: i64,
    pub title: String,
    pub price: f64,
    pub brand_name: String,
    pub size: String,
    pub url: String,
    pub image_path: Option<String>,
    pub category_id: i32,
    pub discovered_at: String,
}

impl ListingRow {
    pub fn from_domain(listing: &Listing) -> Result<Self> {
        let price = listing
            .price
            .to_f64()
            .ok_or_else(|| Error::Parse(format!("price {} not representable", listing.price)))?;
        Ok(Self {
            unique_id: listing.unique_id.0,
            title: listing.title.clone(),
            price,
            brand_name: listing.brand_name.clone(),
            size: listing.size.clone(),
            url: listing.url.clone(),
            image_path: listing.image_path.clone(),
            category_id: listing.category_id.0,
            discovered_at: listing.discovered_at.to_rfc3339(),
        })
    }

    pub fn into_domain(self) -> Result<Listing> {
        let price = Decimal::from_f64(self.price)
            .ok_or_else(|| Error::Parse(format!("stored price {} not decimal", self.price)))?;
        let discovered_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&self.discovered_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Listing {
            unique_id: ListingId(self.unique_id),
            title: self.title,
            price: price.normalize(),
            brand_name: self.brand_name,
            size: self.size,
            url: self.url,
            image_path: self.image_path,
            category_id: CategoryId(self.category_id),
            discovered_at,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = categories)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub brand_id: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId(row.id),
            name: row.name,
            brand_id: row.brand_id,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow<'a> {
    pub name: &'a str,
    pub brand_id: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            username: row.username,
            first_name: row.first_name,
            active: row.active,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            active: user.active,
        }
    }
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = deliveries)]
pub struct DeliveryRow {
    pub user_id: i64,
    pub listing_id: i64,
}

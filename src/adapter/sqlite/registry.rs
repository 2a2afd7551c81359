//! SQLite category and subscription registry.

use diesel::prelude::*;

use super::model::{CategoryRow, NewCategoryRow, UserRow};
use super::schema::{categories, subscriptions, users};
use super::DbPool;
use crate::domain::{Category, CategoryId, UserId};
use crate::error::{Error, Result};
use crate::port::registry::{CategoryRegistry, User};

pub struct SqliteCategoryRegistry {
    pool: DbPool,
}

impl SqliteCategoryRegistry {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<super::PooledConn> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

impl CategoryRegistry for SqliteCategoryRegistry {
    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut conn = self.conn()?;
        let rows: Vec<CategoryRow> = categories::table
            .order(categories::name.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn create_category(&self, name: &str, brand_id: Option<&str>) -> Result<Category> {
        let mut conn = self.conn()?;

        diesel::insert_or_ignore_into(categories::table)
            .values(NewCategoryRow { name, brand_id })
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut row: CategoryRow = categories::table
            .filter(categories::name.eq(name))
            .first(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        // Backfill a missing brand filter; an existing filter is never
        // overwritten.
        if row.brand_id.is_none() {
            if let Some(brand) = brand_id {
                diesel::update(categories::table.filter(categories::id.eq(row.id)))
                    .set(categories::brand_id.eq(brand))
                    .execute(&mut conn)
                    .map_err(|e| Error::Database(e.to_string()))?;
                row.brand_id = Some(brand.to_string());
            }
        }

        Ok(row.into())
    }

    fn subscribe(&self, user: UserId, category: CategoryId) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_or_ignore_into(subscriptions::table)
            .values((
                subscriptions::user_id.eq(user.0),
                subscriptions::category_id.eq(category.0),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn unsubscribe(&self, user: UserId, category: CategoryId) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user.0))
                .filter(subscriptions::category_id.eq(category.0)),
        )
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn delete_category_if_orphaned(&self, category: CategoryId) -> Result<bool> {
        let mut conn = self.conn()?;

        let subscribers: i64 = subscriptions::table
            .filter(subscriptions::category_id.eq(category.0))
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        if subscribers > 0 {
            return Ok(false);
        }

        let deleted = diesel::delete(categories::table.filter(categories::id.eq(category.0)))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted > 0)
    }

    fn active_users(&self) -> Result<Vec<UserId>> {
        let mut conn = self.conn()?;
        let ids: Vec<i64> = users::table
            .filter(users::active.eq(true))
            .select(users::id)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(ids.into_iter().map(UserId).collect())
    }

    fn subscriptions_for(&self, user: UserId) -> Result<Vec<Category>> {
        let mut conn = self.conn()?;
        let rows: Vec<CategoryRow> = subscriptions::table
            .inner_join(categories::table)
            .filter(subscriptions::user_id.eq(user.0))
            .select((categories::id, categories::name, categories::brand_id))
            .order(categories::name.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn upsert_user(&self, user: &User) -> Result<()> {
        let mut conn = self.conn()?;
        // replace_into would fire the FK cascade and drop the user's
        // subscriptions; upsert in place instead.
        diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .on_conflict(users::id)
            .do_update()
            .set((
                users::username.eq(&user.username),
                users::first_name.eq(&user.first_name),
                users::active.eq(user.active),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }
}

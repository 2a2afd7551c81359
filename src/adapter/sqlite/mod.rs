//! SQLite persistence layer using Diesel ORM.
//!
//! One connection pool is shared by the listing store, the category
//! registry, and the delivery tracker; the pool is the bounded set of
//! concurrent sessions the ingestion workers write through.

pub mod delivery;
pub mod model;
pub mod registry;
pub mod schema;
pub mod store;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::Result;

pub use delivery::SqliteDeliveryTracker;
pub use registry::SqliteCategoryRegistry;
pub use store::SqliteListingStore;

/// Embedded migrations from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database connection pool type alias.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Pooled connection handed out by [`DbPool`].
pub type PooledConn = diesel::r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        // Concurrent ingestion workers share this database; wait for locks
        // instead of failing, and keep FK cascades on.
        diesel::sql_query("PRAGMA busy_timeout = 5000")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// Connections beyond the ingestion workers: one for the notifier pass and
/// one for a concurrent operator command.
const POOL_HEADROOM: u32 = 2;

/// Pool capacity for a given ingestion worker count.
fn pool_size(workers: usize) -> u32 {
    u32::try_from(workers)
        .unwrap_or(u32::MAX)
        .saturating_add(POOL_HEADROOM)
}

/// Create a connection pool for the given database URL.
///
/// The pool is sized above the ingestion worker count so concurrent
/// category cycles and the notifier never starve each other.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str, workers: usize) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(pool_size(workers))
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|e| crate::error::Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool
        .get()
        .map_err(|e| crate::error::Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| crate::error::Error::Connection(e.to_string()))?;
    Ok(())
}

#[cfg(any(test, feature = "testkit"))]
pub mod testing {
    use super::*;

    /// In-memory database with migrations applied.
    ///
    /// Single-connection pool: every `:memory:` connection is its own
    /// database, so the pool must never open a second one.
    pub fn setup_test_db() -> DbPool {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create pool");
        let mut conn = pool.get().expect("Failed to get connection");
        // The bundled sqlite is compiled with SQLITE_DEFAULT_FOREIGN_KEYS=1;
        // fixtures insert rows without their parents, so turn enforcement off
        // here (production connections opt in via ConnectionOptions).
        diesel::sql_query("PRAGMA foreign_keys = OFF")
            .execute(&mut conn)
            .expect("Failed to disable foreign key enforcement");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pool_with_memory_db() {
        let pool = create_pool(":memory:", 4);
        assert!(pool.is_ok());
    }

    #[test]
    fn migrations_apply_cleanly() {
        let pool = create_pool(":memory:", 4).unwrap();
        assert!(run_migrations(&pool).is_ok());
    }

    #[test]
    fn pool_sized_from_worker_count_plus_headroom() {
        assert_eq!(pool_size(4), 6);
        assert_eq!(pool_size(1), 3);
        assert_eq!(pool_size(32), 34);
    }
}

//! Handlers for `thriftwatch subscribe` and `unsubscribe`.

use std::path::Path;

use super::{output, SubscriptionArgs};
use crate::adapter::sqlite::{self, SqliteCategoryRegistry};
use crate::config::Config;
use crate::domain::{CategoryId, UserId};
use crate::error::Result;
use crate::port::CategoryRegistry;

fn open_registry(config_path: &Path) -> Result<SqliteCategoryRegistry> {
    let config = Config::load(config_path)?;
    let pool = sqlite::create_pool(&config.database, config.scheduler.workers)?;
    sqlite::run_migrations(&pool)?;
    Ok(SqliteCategoryRegistry::new(pool))
}

/// Subscribe a user to a category.
pub fn subscribe(config_path: &Path, args: &SubscriptionArgs) -> Result<()> {
    let registry = open_registry(config_path)?;
    registry.subscribe(UserId(args.user_id), CategoryId(args.category_id))?;
    output::ok(format!(
        "user {} subscribed to category {}",
        args.user_id, args.category_id
    ));
    Ok(())
}

/// Remove a subscription; drops the category once nobody is left on it.
pub fn unsubscribe(config_path: &Path, args: &SubscriptionArgs) -> Result<()> {
    let registry = open_registry(config_path)?;
    let category = CategoryId(args.category_id);

    registry.unsubscribe(UserId(args.user_id), category)?;
    output::ok(format!(
        "user {} unsubscribed from category {}",
        args.user_id, args.category_id
    ));

    if registry.delete_category_if_orphaned(category)? {
        output::note(format!(
            "category {} had no subscribers left and was removed",
            args.category_id
        ));
    }
    Ok(())
}

//! Handlers for `thriftwatch user`.

use std::path::Path;

use super::{output, AddUserArgs};
use crate::adapter::sqlite::{self, SqliteCategoryRegistry};
use crate::config::Config;
use crate::domain::UserId;
use crate::error::Result;
use crate::port::registry::{CategoryRegistry, User};

/// Register or update a user.
pub fn add(config_path: &Path, args: &AddUserArgs) -> Result<()> {
    let config = Config::load(config_path)?;
    let pool = sqlite::create_pool(&config.database, config.scheduler.workers)?;
    sqlite::run_migrations(&pool)?;
    let registry = SqliteCategoryRegistry::new(pool);

    registry.upsert_user(&User {
        id: UserId(args.id),
        username: args.username.clone(),
        first_name: args.first_name.clone(),
        active: !args.inactive,
    })?;

    if args.inactive {
        output::ok(format!("user {} registered (notifications off)", args.id));
    } else {
        output::ok(format!("user {} registered", args.id));
    }
    Ok(())
}

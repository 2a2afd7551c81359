//! Handlers for `thriftwatch category`.

use std::path::Path;

use tabled::{Table, Tabled};

use super::{output, AddCategoryArgs};
use crate::adapter::sqlite::{self, SqliteCategoryRegistry};
use crate::config::Config;
use crate::error::Result;
use crate::port::CategoryRegistry;

#[derive(Tabled)]
struct CategoryTableRow {
    #[tabled(rename = "Id")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
}

fn open_registry(config_path: &Path) -> Result<SqliteCategoryRegistry> {
    let config = Config::load(config_path)?;
    let pool = sqlite::create_pool(&config.database, config.scheduler.workers)?;
    sqlite::run_migrations(&pool)?;
    Ok(SqliteCategoryRegistry::new(pool))
}

/// Track a new search category, or report the existing one.
pub fn add(config_path: &Path, args: &AddCategoryArgs) -> Result<()> {
    let registry = open_registry(config_path)?;
    let category = registry.create_category(&args.name, args.brand_id.as_deref())?;
    output::ok(format!("category {} tracked as id {}", category.name, category.id));
    Ok(())
}

/// List tracked categories.
pub fn list(config_path: &Path) -> Result<()> {
    let registry = open_registry(config_path)?;
    let categories = registry.list_categories()?;

    if categories.is_empty() {
        output::note("No categories tracked. Add one with `thriftwatch category add <name>`.");
        return Ok(());
    }

    let rows: Vec<CategoryTableRow> = categories
        .into_iter()
        .map(|c| CategoryTableRow {
            id: c.id.0,
            name: c.name,
            brand: c.brand_id.unwrap_or_else(|| "-".into()),
        })
        .collect();

    output::table(&Table::new(rows).to_string());
    Ok(())
}

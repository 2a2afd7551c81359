//! Handlers for `thriftwatch check`.

use std::path::Path;

use teloxide::prelude::*;

use super::{output, CheckCommand};
use crate::adapter::vinted::VintedClient;
use crate::config::Config;
use crate::error::{Error, Result};

/// Execute a diagnostic check.
///
/// # Errors
/// Returns an error when the check fails, so the process exit code
/// reflects the result.
pub async fn execute(config_path: &Path, command: CheckCommand) -> Result<()> {
    match command {
        CheckCommand::Config => check_config(config_path),
        CheckCommand::Connection => check_connection(config_path).await,
        CheckCommand::Telegram => check_telegram(config_path).await,
    }
}

fn check_config(config_path: &Path) -> Result<()> {
    output::note(format!("Checking configuration: {}", config_path.display()));
    let config = Config::load(config_path)?;

    output::ok("configuration file is valid");
    output::note(format!("  database:        {}", config.database));
    output::note(format!("  media dir:       {}", config.media_dir));
    output::note(format!("  upstream:        {}", config.upstream.base_url));
    output::note(format!(
        "  ingest interval: {} min",
        config.scheduler.ingest_interval_mins
    ));
    output::note(format!("  reset hour:      {}", config.scheduler.reset_hour));

    if config.bot_token.is_some() {
        output::ok("bot token found (TELEGRAM_BOT_TOKEN)");
    } else {
        output::warn("TELEGRAM_BOT_TOKEN not set; delivery will be disabled");
    }
    Ok(())
}

async fn check_connection(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    output::note(format!("Connecting to {}", config.upstream.base_url));

    let client = VintedClient::from_config(&config.upstream)?;
    client.authenticate().await?;
    output::ok("session established");
    Ok(())
}

async fn check_telegram(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let Some(token) = config.bot_token else {
        return Err(Error::Delivery("TELEGRAM_BOT_TOKEN not set".into()));
    };

    let bot = Bot::new(token);
    let me = bot.get_me().await?;
    output::ok(format!("bot @{} reachable", me.username()));
    Ok(())
}

//! Command-line interface definitions.

pub mod category;
pub mod check;
pub mod output;
pub mod run;
pub mod subscription;
pub mod user;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

/// Thriftwatch - marketplace listing watcher with Telegram delivery.
#[derive(Parser, Debug)]
#[command(name = "thriftwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the watcher (foreground)
    Run,

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Manage tracked categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Manage registered users
    #[command(subcommand)]
    User(UserCommand),

    /// Subscribe a user to a category
    Subscribe(SubscriptionArgs),

    /// Remove a user's subscription
    Unsubscribe(SubscriptionArgs),
}

/// Subcommands for `thriftwatch check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config,
    /// Test session establishment against the upstream marketplace
    Connection,
    /// Test Telegram bot token
    Telegram,
}

/// Subcommands for `thriftwatch category`
#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Track a new search category
    Add(AddCategoryArgs),
    /// List tracked categories
    List,
}

/// Subcommands for `thriftwatch user`
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register or update a user
    Add(AddUserArgs),
}

/// Arguments for `category add`.
#[derive(Parser, Debug)]
pub struct AddCategoryArgs {
    /// Search phrase sent to the upstream catalog
    pub name: String,

    /// Upstream brand id to narrow the search
    #[arg(long)]
    pub brand_id: Option<String>,
}

/// Arguments for `user add`.
#[derive(Parser, Debug)]
pub struct AddUserArgs {
    /// Telegram user id (also the delivery chat id)
    pub id: i64,

    #[arg(long, default_value = "")]
    pub username: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    /// Register without enabling notifications
    #[arg(long)]
    pub inactive: bool,
}

/// Arguments for subscribe/unsubscribe.
#[derive(Parser, Debug)]
pub struct SubscriptionArgs {
    /// Telegram user id
    pub user_id: i64,

    /// Category id as shown by `category list`
    pub category_id: i32,
}

/// Dispatch a parsed command line.
///
/// # Errors
/// Propagates the executed command's failure.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run => run::execute(&cli.config).await,
        Commands::Check(command) => check::execute(&cli.config, command).await,
        Commands::Category(CategoryCommand::Add(args)) => category::add(&cli.config, &args),
        Commands::Category(CategoryCommand::List) => category::list(&cli.config),
        Commands::User(UserCommand::Add(args)) => user::add(&cli.config, &args),
        Commands::Subscribe(args) => subscription::subscribe(&cli.config, &args),
        Commands::Unsubscribe(args) => subscription::unsubscribe(&cli.config, &args),
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod controllers;
mod db;
mod error;
mod keys;
mod limit;
mod models;
mod notify;
mod types;
mod validate;

use config::Config;
use db::Database;
pub(crate) use error::AppResult;
use limit::AnyLimiter;
use notify::Notifier;

/// Minimal plain-text paste service.
#[derive(Parser)]
#[command(name = "pastr", version)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
}

/// Shared per-process state, built once at startup. Request handlers work
/// against these injected collaborators; there is no other cross-request
/// state in the process.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub database: Database,
    pub limiter: AnyLimiter,
    pub notifier: Notifier,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;

    let database = Database::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;
    database
        .migrate()
        .await
        .context("failed to prepare schema")?;

    let limiter = AnyLimiter::from_config(&config.rate_limiter)?;
    let notifier = Notifier::new(config.notifier.webhook_url.clone());

    let app = App {
        config,
        database,
        limiter,
        notifier,
    };

    match cli.command {
        Command::Serve => commands::serve::run(app).await,
    }
}

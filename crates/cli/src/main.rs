//! `fatigue-api` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`   — bootstrap the schema, then start the API server (default).
//! - `init-db` — bootstrap the schema once, optionally dropping it first.

mod settings;

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use api::AppState;
use clap::{Parser, Subcommand};
use db::{Connector, MySqlDriverRepository};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "fatigue-api",
    about = "Driver registry backend for the fatigue-detection system",
    version
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve,
    /// Create the database and tables if they are missing.
    InitDb {
        /// Drop the database first and recreate it empty.
        #[arg(long)]
        drop: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `.env` values feed the `env` fallbacks.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "ignoring unreadable .env"),
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cli.settings).await,
        Command::InitDb { drop } => init_db(&cli.settings, drop).await,
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

async fn serve(settings: &Settings) -> Result<()> {
    info!(
        environment = %settings.environment,
        api_url = %settings.api_url,
        jwt_secret_configured = !settings.jwt_secret.is_empty(),
        "Starting fatigue-detection API"
    );

    let db_config = settings.db_config();
    match db::ensure_schema(&db_config, false).await {
        Ok(report) if report.is_complete() => {
            info!(database = %report.database, "Schema ready");
        }
        Ok(report) => {
            warn!(failed = ?report.failed, "Schema ready with table failures");
        }
        Err(err) => {
            error!(error = %err, "Schema bootstrap failed, serving anyway");
        }
    }

    let repository = MySqlDriverRepository::new(Connector::new(&db_config));
    let state = AppState::new(Arc::new(repository));

    api::serve(settings.server_config(), state)
        .await
        .context("API server stopped with an error")
}

async fn init_db(settings: &Settings, drop: bool) -> Result<()> {
    let report = db::ensure_schema(&settings.db_config(), drop)
        .await
        .context("cannot create the database")?;

    if report.dropped {
        println!("Dropped and recreated database '{}'", report.database);
    }
    for table in &report.created {
        println!("✅ {table}");
    }
    for (table, reason) in &report.failed {
        eprintln!("❌ {table}: {reason}");
    }

    if !report.is_complete() {
        bail!("{} table(s) could not be created", report.failed.len());
    }
    println!("Database '{}' initialised", report.database);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["fatigue-api", "init-db", "--drop", "--db-name", "fleet"])
            .unwrap();

        assert!(matches!(cli.command, Some(Command::InitDb { drop: true })));
        assert_eq!(cli.settings.db_name, "fleet");
    }

    #[test]
    fn connection_flags_still_accepted_before_the_subcommand() {
        let cli = Cli::try_parse_from(["fatigue-api", "--port", "9000", "serve"]).unwrap();

        assert!(matches!(cli.command, Some(Command::Serve)));
        assert_eq!(cli.settings.port, 9000);
    }
}

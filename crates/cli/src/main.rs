mod commands;
mod error;

use crate::commands::Command;
use crate::error::{ErrorKind, Result};
use cheeseshop_config::Config;
use cheeseshop_index::{Database, Index, Locations, SqliteCounters};
use cheeseshop_storage::backend::LocalBackend;
use clap::Parser;
use exn::ResultExt;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "cheeseshop")]
#[command(about = "Query the package index catalog")]
#[command(version)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<()> {
    init_tracing()?;
    let config = Config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let db = Database::open(&config.database).await.or_raise(|| ErrorKind::Index)?;
    let backend = LocalBackend::new(&config.storage.root).or_raise(|| ErrorKind::Storage)?;
    let locations = Locations {
        packages: config.paths.packages,
        documentation: config.paths.documentation,
        docs_host: config.docs_host,
    };
    let index = Index::new(&db, Arc::new(backend), Arc::new(SqliteCounters::from(&db)), locations);
    tracing::debug!(command = ?args.command, "Running query");
    let result = args.command.execute(&index).await;
    db.close().await;
    let value = result?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &value).or_raise(|| ErrorKind::Output)?;
    writeln!(stdout).or_raise(|| ErrorKind::Output)
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
///
/// `RUST_LOG_FORMAT=json` switches to one JSON object per event.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    let initialized = match std::env::var("RUST_LOG_FORMAT").as_deref() {
        Ok("json") => registry.with(fmt::layer().with_writer(std::io::stderr).with_ansi(false).json()).try_init(),
        _ => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
    };
    initialized.or_raise(|| ErrorKind::Logging)
}

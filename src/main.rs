//! pagewatch binary: config loading, logging setup, and loop startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagewatch::config::WatchConfig;
use pagewatch::poller::Poller;
use pagewatch::store::HttpPageStore;
use pagewatch::webhook::WebhookClient;

#[derive(Parser)]
#[command(name = "pagewatch")]
#[command(about = "Posts debounced page-database change digests to a webhook")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "pagewatch.toml")]
    config: PathBuf,

    /// Directory for daily-rolling log files (console-only when omitted)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Override the polling interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Override the quiet period in seconds
    #[arg(long)]
    quiet_period: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guards = init_logging(cli.log_dir.as_deref())?;

    let mut config = WatchConfig::load(&cli.config)?;
    if let Some(interval) = cli.interval {
        config.poll.interval_secs = interval;
    }
    if let Some(quiet_period) = cli.quiet_period {
        config.poll.quiet_period_secs = quiet_period;
    }
    config.validate()?;

    info!("🚀 Starting pagewatch v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "watching database {} every {}s (quiet period {}s)",
        config.store.database_id, config.poll.interval_secs, config.poll.quiet_period_secs
    );

    let store = HttpPageStore::new(&config.store).context("failed to build page store client")?;
    let sink = WebhookClient::new(&config.webhook).context("failed to build webhook client")?;

    Poller::new(store, sink, &config.poll).run().await
}

/// Install the tracing subscriber: console layer always, plus a non-ANSI
/// daily-rolling file layer when a log directory is given. Returns the
/// worker guards that must stay alive for the duration of the process.
fn init_logging(log_dir: Option<&Path>) -> Result<Vec<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("pagewatch=info"))
        .context("invalid RUST_LOG filter")?;

    let (console_writer, console_guard) = non_blocking(std::io::stdout());
    let mut guards = vec![console_guard];

    let console_layer = fmt::layer()
        .with_writer(console_writer)
        .with_target(false)
        .with_ansi(true);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

            let file_appender = rolling::daily(dir, "pagewatch.log");
            let (file_writer, file_guard) = non_blocking(file_appender);
            guards.push(file_guard);

            Some(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guards)
}

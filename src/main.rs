use actual_sheets::{sync, Config, Mode, Result};
use clap::Parser;
use std::error::Error as _;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// actual-sheets: sync budget data from an Actual Budget server to Google
/// Sheets.
///
/// One invocation runs one full sync and exits. There are no subcommands and
/// no flags; all variation comes from configuration in the environment (or a
/// .env file): ACTUAL_SERVER_URL, ACTUAL_PASSWORD, ACTUAL_FILE,
/// GOOGLE_SHEET_ID, GOOGLE_CREDENTIALS_FILE or GOOGLE_CREDENTIALS_JSON, and
/// optionally ACTUAL_ENCRYPTION_PASSWORD, EXPORT_TRANSACTIONS,
/// TRANSACTIONS_DATE_RANGE and WRITE_FAILURE_POLICY. Scheduling is delegated
/// to an external trigger such as cron.
#[derive(Debug, Parser, Clone)]
struct Args {
    /// Log verbosity: error, warn, info, debug or trace.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load a .env file when present, for local development.
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logger(args.log_level);
    debug!(
        "Log level set to {}",
        args.log_level.to_string().to_lowercase()
    );

    match main_inner().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn main_inner() -> Result<()> {
    let config = Config::from_env().await?;
    let mode = Mode::from_env();
    sync::run(config, mode).await
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

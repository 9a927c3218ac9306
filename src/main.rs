use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use confluence_export::{run, Cli};

/// Fixed-name log file, written alongside stdout output.
const LOG_FILE: &str = "confluence_export.log";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        Err(e) => {
            registry.init();
            tracing::warn!(error = ?e, file = LOG_FILE, "Could not open log file, logging to stdout only");
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    tokio::select! {
        result = run(cli) => match result {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("[ERROR] {e}");
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nDownload interrupted by user");
            std::process::exit(130);
        }
    }
}

//! Sitescope application shell.
//!
//! Thin binary: parse arguments, initialize tracing, run the audit
//! controller. Core logic lives in the `crates/` workspace members.

mod cli;
mod run;

use clap::Parser;

/// Initialize tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sitescope=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = cli::Cli::parse();
    tracing::info!("Starting Sitescope v{}", env!("CARGO_PKG_VERSION"));

    match run::execute(args).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {e:#}");
            if std::env::var("SITESCOPE_DEBUG").is_ok() {
                eprintln!("{e:?}");
            }
            std::process::exit(1);
        }
    }
}

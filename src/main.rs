//! Sandcastle CLI entrypoint.

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sandcastle::cli::Cli;
use sandcastle::domain::Config;
use sandcastle::infra;

fn init_tracing(config: &Config) {
    let default_filter = if config.log_debug_messages {
        "sandcastle=debug"
    } else {
        "sandcastle=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match infra::config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    };
    init_tracing(&config);
    if let Err(e) = cli.run(&config).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

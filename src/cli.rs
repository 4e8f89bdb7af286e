//! CLI argument parsing with clap derive.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::domain::Config;
use crate::infra::provider::HttpProviderClient;
use crate::infra::registry::SqliteRegistry;
use crate::infra::ssh::SshExecutor;

/// Provision, track, and expire ephemeral demo WordPress sites
#[derive(Parser)]
#[command(
    name = "sandcastle",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision a new demo instance
    Launch(commands::launch::LaunchArgs),

    /// Archive and delete expired instances
    Purge,

    /// List tracked instances
    List(commands::list::ListArgs),

    /// Record the creator's first admin visit
    CheckIn {
        /// Fully-qualified instance domain
        domain: String,
    },

    /// Push an instance's expiration window forward
    Extend {
        /// Fully-qualified instance domain
        domain: String,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, config: &Config) -> Result<()> {
        let registry_path = match &config.registry_path {
            Some(path) => path.clone(),
            None => SqliteRegistry::default_path()?,
        };
        let store = SqliteRegistry::open(&registry_path)?;

        match self.command {
            Command::Launch(args) => {
                let provider = HttpProviderClient::new(&config.provider);
                let executor = SshExecutor::new(config);
                commands::launch::run(&args, config, &provider, &store, &executor).await
            }
            Command::Purge => {
                let provider = HttpProviderClient::new(&config.provider);
                commands::purge::run(config, &provider, &store)
            }
            Command::List(args) => commands::list::run(&args, &store),
            Command::CheckIn { domain } => commands::check_in::run(&domain, &store),
            Command::Extend { domain } => commands::extend::run(&domain, &store),
        }
    }
}

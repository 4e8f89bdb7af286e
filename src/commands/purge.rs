//! `sandcastle purge` — archive and delete expired instances.

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{InstanceStore, ProviderClient};
use crate::application::services::purge::ExpirationEngine;
use crate::domain::Config;

/// Run `sandcastle purge`.
///
/// # Errors
///
/// Returns an error if the eligibility queries or the provider's user list
/// fail; per-instance failures are logged and skipped.
pub fn run(
    config: &Config,
    provider: &impl ProviderClient,
    store: &impl InstanceStore,
) -> Result<()> {
    let engine = ExpirationEngine::new(config, provider, store)?;
    let purged = engine.purge(Utc::now())?;
    if purged.is_empty() {
        println!("Nothing to purge.");
    } else {
        println!("Purged {} instance(s):", purged.len());
        for domain in purged {
            println!("  {domain}");
        }
    }
    Ok(())
}

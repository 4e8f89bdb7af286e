//! `sandcastle check-in <domain>` — record the creator's first admin visit.

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::InstanceStore;

/// Run `sandcastle check-in`.
///
/// Idempotent: repeating the command just rewrites the timestamp.
///
/// # Errors
///
/// Returns an error if the registry update fails.
pub fn run(domain: &str, store: &impl InstanceStore) -> Result<()> {
    store.mark_checked_in(domain, Utc::now())?;
    println!("Checked in {domain}");
    Ok(())
}

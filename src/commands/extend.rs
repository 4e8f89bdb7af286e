//! `sandcastle extend <domain>` — push an instance's expiration forward.

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::InstanceStore;

/// Run `sandcastle extend`.
///
/// Records a login now, which restarts the regular expiration window.
/// Idempotent: last write wins.
///
/// # Errors
///
/// Returns an error if the registry update fails.
pub fn run(domain: &str, store: &impl InstanceStore) -> Result<()> {
    store.extend_life(domain, Utc::now())?;
    println!("Extended {domain}");
    Ok(())
}

//! `sandcastle list [--purged]` — show tracked instances.

use anyhow::Result;
use clap::Args;

use crate::application::ports::InstanceStore;
use crate::domain::InstanceRecord;

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show archived instances instead of active ones
    #[arg(long)]
    pub purged: bool,
}

/// Run `sandcastle list`.
///
/// # Errors
///
/// Returns an error if the registry query fails.
pub fn run(args: &ListArgs, store: &impl InstanceStore) -> Result<()> {
    let instances = if args.purged {
        store.purged()?
    } else {
        store.active()?
    };
    if instances.is_empty() {
        println!("No instances.");
        return Ok(());
    }
    for instance in instances {
        println!("{}", describe(&instance));
    }
    Ok(())
}

fn describe(instance: &InstanceRecord) -> String {
    let logged_in = instance
        .last_logged_in
        .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
    let flag = if instance.shortlived {
        " [shortlived]"
    } else {
        ""
    };
    format!(
        "{}  user={}  created={}  last_logged_in={}{}",
        instance.domain,
        instance.username,
        instance.created.to_rfc3339(),
        logged_in,
        flag
    )
}

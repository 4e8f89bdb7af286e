//! Application service — the expiration and purge engine.
//!
//! Runs as a separate scheduled path from launches; the only shared state is
//! the registry. Batches are capped because the provider executes
//! administrative tasks serially, and an unbounded purge would starve
//! concurrent launches queueing remote tasks of their own.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::application::ports::{InstanceStore, ProviderClient};
use crate::domain::{Config, ExpirationPolicy, InstanceRecord};

/// Most instances purged per invocation.
pub const MAX_PURGED_PER_RUN: usize = 10;

/// Computes the eligible-for-purge set, deletes the matching backend users,
/// and archives the registry rows.
pub struct ExpirationEngine<'a, P, S> {
    provider: &'a P,
    store: &'a S,
    policy: ExpirationPolicy,
}

impl<'a, P, S> ExpirationEngine<'a, P, S>
where
    P: ProviderClient,
    S: InstanceStore,
{
    /// Build an engine from the configured expiration windows.
    ///
    /// # Errors
    ///
    /// Returns an error if an expiration interval fails to parse.
    pub fn new(config: &Config, provider: &'a P, store: &'a S) -> Result<Self> {
        let policy = config
            .expiration_policy()
            .context("parsing expiration windows")?;
        Ok(Self {
            provider,
            store,
            policy,
        })
    }

    /// The full eligible set: expired instances plus never-checked-in ones,
    /// de-duplicated by id and ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if either eligibility query fails.
    pub fn eligible(&self, now: DateTime<Utc>) -> Result<Vec<InstanceRecord>> {
        let mut eligible = self
            .store
            .expired(now, &self.policy)
            .context("querying expired instances")?;
        let seen: HashSet<i64> = eligible.iter().map(|instance| instance.id).collect();
        let unused = self
            .store
            .never_checked_in(now, &self.policy)
            .context("querying never-checked-in instances")?;
        eligible.extend(
            unused
                .into_iter()
                .filter(|instance| !seen.contains(&instance.id)),
        );
        eligible.sort_by_key(|instance| instance.created);
        Ok(eligible)
    }

    /// Purge one batch of eligible instances.
    ///
    /// The batch is capped at [`MAX_PURGED_PER_RUN`]. Backend users are
    /// matched against the batch by username and deleted one by one; a
    /// failed deletion is logged and does not block the others. Every
    /// instance in the batch is archived and removed from the registry
    /// regardless of its remote deletion outcome, and the batch's domains
    /// are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the eligibility queries fail or the provider's
    /// user list cannot be fetched. Per-item failures are logged instead.
    pub fn purge(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let mut batch = self.eligible(now)?;
        batch.truncate(MAX_PURGED_PER_RUN);
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = batch.len(), "purging instances");

        let system_users = self
            .provider
            .list_system_users()
            .map_err(|err| anyhow::anyhow!(err))
            .context("fetching system user list for purging")?;

        let batch_usernames: HashSet<&str> = batch
            .iter()
            .map(|instance| instance.username.as_str())
            .collect();
        for user in system_users
            .iter()
            .filter(|user| batch_usernames.contains(user.name.as_str()))
        {
            debug!(sysuser = %user.name, "deleting backend user");
            if let Err(err) = self.provider.delete_system_user(user) {
                error!(sysuser = %user.name, %err, "error purging site for user");
            }
        }

        // Registry cleanup is unconditional: a failed remote deletion above
        // was logged, the row still gets archived and removed.
        for instance in &batch {
            if let Err(err) = self.store.archive(instance) {
                error!(domain = %instance.domain, %err, "error archiving purged instance");
            }
        }

        Ok(batch
            .into_iter()
            .map(|instance| instance.domain)
            .collect())
    }
}

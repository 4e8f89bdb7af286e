//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`
//! or `crate::commands`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{ProviderError, StorageError};
use crate::domain::{
    CommandPipeline, ExpirationPolicy, FeatureSet, InstanceRecord, NewInstance, WordpressOptions,
};

// ── Value Types ───────────────────────────────────────────────────────────────

/// A backend system user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUser {
    pub id: String,
    pub name: String,
}

/// A provisioned app as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    /// All domains routed to the app, wildcard entries included.
    pub domains: Vec<String>,
}

/// Captured result of one remote command execution.
#[derive(Debug, Clone)]
pub struct RemoteOutput {
    pub exit_code: i32,
    /// Combined stdout and stderr.
    pub output: String,
}

impl RemoteOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

// ── Provider Port ─────────────────────────────────────────────────────────────

/// The managed hosting provider: system users and apps.
///
/// Every method returns a tagged [`ProviderError`] result; implementations
/// must not panic across this boundary.
pub trait ProviderClient {
    /// Create a backend system user for a fresh instance.
    fn create_system_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SystemUser, ProviderError>;

    /// Create the app under `user`. `features` lets an implementation pick
    /// backend options (e.g. SSL) off the merged set; it may ignore them.
    fn create_app(
        &self,
        user: &SystemUser,
        php_version: &str,
        domain: &str,
        options: &WordpressOptions,
        features: &FeatureSet,
    ) -> Result<App, ProviderError>;

    /// Delete a system user and everything running under it.
    fn delete_system_user(&self, user: &SystemUser) -> Result<(), ProviderError>;

    /// List every system user known to the provider.
    fn list_system_users(&self) -> Result<Vec<SystemUser>, ProviderError>;
}

// ── Remote Execution Port ─────────────────────────────────────────────────────

/// Runs one composed command over a remote session on behalf of a system
/// user. Timeout behavior belongs to the implementation.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Execute `command` as `user`, returning exit code and captured output.
    /// An `Err` is a transport failure; a non-zero exit comes back as `Ok`.
    async fn run_remote(&self, user: &str, password: &str, command: &str)
    -> Result<RemoteOutput>;
}

// ── Registry Port ─────────────────────────────────────────────────────────────

/// Persistent registry of active and purged instances.
///
/// All mutations are single-row, single-statement operations; callers must
/// tolerate races between near-simultaneous processes sharing the store.
pub trait InstanceStore {
    /// Insert a fresh instance row.
    fn insert(&self, instance: &NewInstance) -> Result<(), StorageError>;

    /// Whether an active instance already owns `domain`.
    fn domain_in_use(&self, domain: &str) -> Result<bool, StorageError>;

    /// All active instances.
    fn active(&self) -> Result<Vec<InstanceRecord>, StorageError>;

    /// All archived instances.
    fn purged(&self) -> Result<Vec<InstanceRecord>, StorageError>;

    /// Active instances past their expiration window: logged in too long
    /// ago, never logged in and created too long ago, or short-lived and
    /// past the short-lived window. Ordered by `created` ascending.
    fn expired(
        &self,
        now: DateTime<Utc>,
        policy: &ExpirationPolicy,
    ) -> Result<Vec<InstanceRecord>, StorageError>;

    /// Active instances whose creator never checked in and that are past the
    /// never-checked-in window. Ordered by `created` ascending.
    fn never_checked_in(
        &self,
        now: DateTime<Utc>,
        policy: &ExpirationPolicy,
    ) -> Result<Vec<InstanceRecord>, StorageError>;

    /// Record the creator's first wp-admin visit. Last write wins.
    fn mark_checked_in(&self, domain: &str, at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Record a login, pushing the expiration window forward. Last write wins.
    fn extend_life(&self, domain: &str, at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Archive `instance` into the purged table, then remove its active row.
    /// The pair must look atomic to readers under normal operation.
    fn archive(&self, instance: &InstanceRecord) -> Result<(), StorageError>;
}

// ── Launch Extension Points ───────────────────────────────────────────────────

/// Context handed to command injectors while a launch is assembling its
/// remote command pipeline.
#[derive(Debug, Clone, Copy)]
pub struct LaunchContext<'a> {
    /// Fully-qualified domain of the instance being launched.
    pub domain: &'a str,
    /// Backend system user the app runs under.
    pub sysuser: &'a str,
    /// Password for the system user and the admin account.
    pub password: &'a str,
    /// Merged feature set for this launch.
    pub features: &'a FeatureSet,
}

/// Vetoes or accepts a merged feature set before any side effect occurs.
pub type ConditionCheck = Box<dyn Fn(&FeatureSet) -> Result<(), String> + Send>;

/// Appends remote command contributions for one launch.
pub type CommandInjector = Box<dyn Fn(&LaunchContext<'_>, &mut CommandPipeline) + Send>;

/// Ordered-subscriber registry for the launch extension points. Owned by the
/// orchestrator; subscribers run in registration order.
#[derive(Default)]
pub struct LaunchHooks {
    condition_checks: Vec<ConditionCheck>,
    before_auto_login: Vec<CommandInjector>,
    after_auto_login: Vec<CommandInjector>,
}

impl LaunchHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature-condition check, run before any side effect.
    pub fn on_feature_conditions<F>(&mut self, check: F)
    where
        F: Fn(&FeatureSet) -> Result<(), String> + Send + 'static,
    {
        self.condition_checks.push(Box::new(check));
    }

    /// Register a command injector that runs before the auto-login wiring.
    pub fn before_auto_login<F>(&mut self, injector: F)
    where
        F: Fn(&LaunchContext<'_>, &mut CommandPipeline) + Send + 'static,
    {
        self.before_auto_login.push(Box::new(injector));
    }

    /// Register a command injector that runs after the auto-login wiring.
    pub fn after_auto_login<F>(&mut self, injector: F)
    where
        F: Fn(&LaunchContext<'_>, &mut CommandPipeline) + Send + 'static,
    {
        self.after_auto_login.push(Box::new(injector));
    }

    /// Run every condition check in order; the first rejection wins.
    pub fn check_conditions(&self, features: &FeatureSet) -> Result<(), String> {
        for check in &self.condition_checks {
            check(features)?;
        }
        Ok(())
    }

    /// Run the pre-auto-login injectors in order.
    pub fn run_before_auto_login(&self, ctx: &LaunchContext<'_>, pipeline: &mut CommandPipeline) {
        for injector in &self.before_auto_login {
            injector(ctx, pipeline);
        }
    }

    /// Run the post-auto-login injectors in order.
    pub fn run_after_auto_login(&self, ctx: &LaunchContext<'_>, pipeline: &mut CommandPipeline) {
        for injector in &self.after_auto_login {
            injector(ctx, pipeline);
        }
    }
}

impl std::fmt::Debug for LaunchHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchHooks")
            .field("condition_checks", &self.condition_checks.len())
            .field("before_auto_login", &self.before_auto_login.len())
            .field("after_auto_login", &self.after_auto_login.len())
            .finish()
    }
}

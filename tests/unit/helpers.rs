//! Shared fake infrastructure for unit tests.
//!
//! Provides canned [`ProviderClient`], [`InstanceStore`], and
//! [`RemoteExecutor`] implementations so each test file doesn't have to
//! re-define the same boilerplate.

#![allow(dead_code)] // Not every test module uses every helper.

use std::cell::RefCell;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sandcastle::application::ports::{
    App, InstanceStore, ProviderClient, RemoteExecutor, RemoteOutput, SystemUser,
};
use sandcastle::domain::error::{ProviderError, StorageError};
use sandcastle::domain::{
    Config, ExpirationPolicy, FeatureSet, InstanceRecord, NewInstance, WordpressOptions,
};
use sandcastle::infra::registry::SqliteRegistry;

// ── Config ────────────────────────────────────────────────────────────────────

pub fn test_config() -> Config {
    Config {
        domain: "sandcastle.example".to_string(),
        default_admin_email_address: "demo@sandcastle.example".to_string(),
        companion_api_base_url: "https://api.sandcastle.example".to_string(),
        ..Config::default()
    }
}

// ── Provider fake ─────────────────────────────────────────────────────────────

/// Scriptable provider: flip the `fail_*` switches to make individual calls
/// fail, seed `users` for listing, and inspect the recorded calls afterwards.
#[derive(Default)]
pub struct FakeProvider {
    pub fail_user_creation: bool,
    pub fail_app_creation: bool,
    pub fail_user_list: bool,
    /// Users returned by `list_system_users`.
    pub users: Vec<SystemUser>,
    /// Usernames whose deletion should fail.
    pub failing_deletions: Vec<String>,
    pub created_users: RefCell<Vec<String>>,
    pub deleted_users: RefCell<Vec<String>>,
    /// WordPress options passed to each `create_app` call.
    pub app_options: RefCell<Vec<WordpressOptions>>,
}

impl FakeProvider {
    pub fn with_users(names: &[&str]) -> Self {
        Self {
            users: names.iter().map(|name| sysuser(name)).collect(),
            ..Self::default()
        }
    }
}

pub fn sysuser(name: &str) -> SystemUser {
    SystemUser {
        id: format!("id-{name}"),
        name: name.to_string(),
    }
}

fn api_error(message: &str) -> ProviderError {
    ProviderError::Api {
        status: 500,
        message: message.to_string(),
    }
}

impl ProviderClient for FakeProvider {
    fn create_system_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SystemUser, ProviderError> {
        assert!(!password.is_empty());
        if self.fail_user_creation {
            return Err(api_error("sysuser creation failed"));
        }
        self.created_users.borrow_mut().push(username.to_string());
        Ok(sysuser(username))
    }

    fn create_app(
        &self,
        user: &SystemUser,
        _php_version: &str,
        domain: &str,
        options: &WordpressOptions,
        _features: &FeatureSet,
    ) -> Result<App, ProviderError> {
        if self.fail_app_creation {
            return Err(api_error("app creation failed"));
        }
        self.app_options.borrow_mut().push(options.clone());
        Ok(App {
            id: format!("app-{}", user.name),
            name: user.name.clone(),
            // Wildcard first, so callers that blindly take the head would
            // pick the wrong entry.
            domains: vec![format!("*.{domain}"), domain.to_string()],
        })
    }

    fn delete_system_user(&self, user: &SystemUser) -> Result<(), ProviderError> {
        if self.failing_deletions.contains(&user.name) {
            return Err(api_error("deletion failed"));
        }
        self.deleted_users.borrow_mut().push(user.name.clone());
        Ok(())
    }

    fn list_system_users(&self) -> Result<Vec<SystemUser>, ProviderError> {
        if self.fail_user_list {
            return Err(api_error("user list failed"));
        }
        Ok(self.users.clone())
    }
}

// ── Store fake ────────────────────────────────────────────────────────────────

/// Store whose first `used_candidates` collision checks report the domain as
/// taken. Records inserts; the query methods all return empty sets.
#[derive(Default)]
pub struct CollidingStore {
    pub used_candidates: usize,
    pub checked: RefCell<Vec<String>>,
    pub inserted: RefCell<Vec<NewInstance>>,
}

impl CollidingStore {
    pub fn with_used_candidates(used_candidates: usize) -> Self {
        Self {
            used_candidates,
            ..Self::default()
        }
    }
}

impl InstanceStore for CollidingStore {
    fn insert(&self, instance: &NewInstance) -> Result<(), StorageError> {
        self.inserted.borrow_mut().push(instance.clone());
        Ok(())
    }

    fn domain_in_use(&self, domain: &str) -> Result<bool, StorageError> {
        let mut checked = self.checked.borrow_mut();
        checked.push(domain.to_string());
        Ok(checked.len() <= self.used_candidates)
    }

    fn active(&self) -> Result<Vec<InstanceRecord>, StorageError> {
        Ok(Vec::new())
    }

    fn purged(&self) -> Result<Vec<InstanceRecord>, StorageError> {
        Ok(Vec::new())
    }

    fn expired(
        &self,
        _now: DateTime<Utc>,
        _policy: &ExpirationPolicy,
    ) -> Result<Vec<InstanceRecord>, StorageError> {
        Ok(Vec::new())
    }

    fn never_checked_in(
        &self,
        _now: DateTime<Utc>,
        _policy: &ExpirationPolicy,
    ) -> Result<Vec<InstanceRecord>, StorageError> {
        Ok(Vec::new())
    }

    fn mark_checked_in(&self, _domain: &str, _at: DateTime<Utc>) -> Result<(), StorageError> {
        Ok(())
    }

    fn extend_life(&self, _domain: &str, _at: DateTime<Utc>) -> Result<(), StorageError> {
        Ok(())
    }

    fn archive(&self, _instance: &InstanceRecord) -> Result<(), StorageError> {
        Ok(())
    }
}

// ── Executor fake ─────────────────────────────────────────────────────────────

pub struct RemoteCall {
    pub user: String,
    pub password: String,
    pub command: String,
}

/// Records every remote invocation and replies with a fixed exit code.
pub struct FakeExecutor {
    pub exit_code: i32,
    pub transport_failure: bool,
    pub calls: RefCell<Vec<RemoteCall>>,
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self {
            exit_code: 0,
            transport_failure: false,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeExecutor {
    pub fn failing_with(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }
}

impl RemoteExecutor for FakeExecutor {
    async fn run_remote(
        &self,
        user: &str,
        password: &str,
        command: &str,
    ) -> Result<RemoteOutput> {
        self.calls.borrow_mut().push(RemoteCall {
            user: user.to_string(),
            password: password.to_string(),
            command: command.to_string(),
        });
        if self.transport_failure {
            anyhow::bail!("connection refused");
        }
        Ok(RemoteOutput {
            exit_code: self.exit_code,
            output: if self.exit_code == 0 {
                String::new()
            } else {
                "remote command failed".to_string()
            },
        })
    }
}

// ── Registry seeding ──────────────────────────────────────────────────────────

/// Insert an instance with explicit timestamps into a real registry.
pub fn seed_instance(
    store: &SqliteRegistry,
    domain: &str,
    username: &str,
    created: DateTime<Utc>,
    last_logged_in: Option<DateTime<Utc>>,
    checked_in: Option<DateTime<Utc>>,
    shortlived: bool,
) {
    store
        .insert(&NewInstance {
            username: username.to_string(),
            domain: domain.to_string(),
            created,
            shortlived,
        })
        .expect("insert");
    if let Some(at) = last_logged_in {
        store.extend_life(domain, at).expect("extend_life");
    }
    if let Some(at) = checked_in {
        store.mark_checked_in(domain, at).expect("mark_checked_in");
    }
}

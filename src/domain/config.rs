//! Service configuration and interval-expression parsing.
//!
//! Pure functions only — no I/O, no async, no filesystem access. The config
//! struct is loaded by `infra::config` and passed explicitly to constructors.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.sandcastle/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base domain under which instances are created, e.g. `sandcastle.example`.
    /// Also the SSH host for remote command execution.
    pub domain: String,
    /// Lifetime of a site after its last login, or after creation if the
    /// creator never logged in. Interval expression, e.g. `7d`.
    pub sites_expiration: String,
    /// Lifetime of a site launched with the `shortlife` feature.
    pub shortlived_sites_expiration: String,
    /// Lifetime of a site whose creator never visited wp-admin.
    pub sites_never_checked_in_expiration: String,
    /// Title new sites after their subdomain instead of the stock title.
    pub use_subdomain_based_wordpress_title: bool,
    /// Prefer alliterative adjective+noun subdomains.
    pub use_alliterations_for_subdomain: bool,
    /// Email address for the generated admin account.
    pub default_admin_email_address: String,
    /// Lower the log filter to `debug` for this crate.
    pub log_debug_messages: bool,
    /// Base URL the companion plugin phones home to for auto-login.
    pub companion_api_base_url: String,
    /// Path of the sqlite registry. Defaults to `~/.sandcastle/registry.db`.
    pub registry_path: Option<std::path::PathBuf>,
    /// Hosting-provider API credentials.
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: String::new(),
            sites_expiration: "7d".to_string(),
            shortlived_sites_expiration: "1h".to_string(),
            sites_never_checked_in_expiration: "1h".to_string(),
            use_subdomain_based_wordpress_title: false,
            use_alliterations_for_subdomain: true,
            default_admin_email_address: String::new(),
            log_debug_messages: false,
            companion_api_base_url: String::new(),
            registry_path: None,
            provider: ProviderConfig::default(),
        }
    }
}

/// Credentials and endpoint for the hosting-provider API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider API base URL, e.g. `https://api.provider.example/v1`.
    pub endpoint: String,
    /// Basic-auth client id.
    pub client_id: String,
    /// Basic-auth API key.
    pub api_key: String,
}

impl Config {
    /// Validate the options a launch or purge run depends on.
    ///
    /// # Errors
    ///
    /// Returns an error if the base domain is missing or any interval
    /// expression fails to parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.trim().is_empty() {
            return Err(ConfigError::MissingDomain);
        }
        self.expiration_policy()?;
        Ok(())
    }

    /// Parse the three expiration options into a concrete policy.
    ///
    /// # Errors
    ///
    /// Returns an error if any interval expression is malformed.
    pub fn expiration_policy(&self) -> Result<ExpirationPolicy, ConfigError> {
        Ok(ExpirationPolicy {
            expiration: parse_interval(&self.sites_expiration)?,
            shortlived_expiration: parse_interval(&self.shortlived_sites_expiration)?,
            never_checked_in_expiration: parse_interval(&self.sites_never_checked_in_expiration)?,
        })
    }
}

// ── Expiration policy ────────────────────────────────────────────────────────

/// Parsed expiration windows used by the purge eligibility queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    /// Window for sites with (or without) a recorded login.
    pub expiration: Duration,
    /// Window for sites flagged `shortlived`.
    pub shortlived_expiration: Duration,
    /// Window for sites whose creator never visited wp-admin.
    pub never_checked_in_expiration: Duration,
}

// ── Interval expressions ─────────────────────────────────────────────────────

/// Parse an interval expression of the form `<number><s|m|h|d>`.
///
/// # Errors
///
/// Returns an error for an empty value, an unknown unit, a zero count, or a
/// count that does not fit in an `i64` of seconds.
pub fn parse_interval(expr: &str) -> Result<Duration, ConfigError> {
    let expr = expr.trim();
    let malformed = || ConfigError::InvalidInterval(expr.to_string());

    let mut chars = expr.chars();
    let unit = chars.next_back().ok_or_else(malformed)?;
    let count: i64 = chars.as_str().parse().map_err(|_| malformed())?;
    if count <= 0 {
        return Err(malformed());
    }
    let seconds_per_unit = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return Err(malformed()),
    };
    let seconds = count.checked_mul(seconds_per_unit).ok_or_else(malformed)?;
    Duration::try_seconds(seconds).ok_or_else(malformed)
}

// ── Unit tests ───────────────────────────────────────────────────────────────

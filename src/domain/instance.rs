//! Instance records and pure helpers around them.
//!
//! This module is intentionally free of I/O, async, and external layer
//! imports. All functions take data in and return data out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked demo instance, as stored in the `instances` table (and,
/// after a purge, in `purged_instances`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Surrogate key.
    pub id: i64,
    /// Backend system-user the app runs under. Unique per active instance.
    pub username: String,
    /// Fully-qualified subdomain. Unique per active instance.
    pub domain: String,
    /// When the instance was provisioned.
    pub created: DateTime<Utc>,
    /// Last time the creator authenticated, if ever.
    pub last_logged_in: Option<DateTime<Utc>>,
    /// First time the creator visited wp-admin, if ever.
    pub checked_in: Option<DateTime<Utc>>,
    /// Flagged at creation for the short expiration window.
    pub shortlived: bool,
}

/// Fields needed to insert a fresh instance row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstance {
    pub username: String,
    pub domain: String,
    pub created: DateTime<Utc>,
    pub shortlived: bool,
}

/// First-time WordPress setup options handed to the provider on app creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordpressOptions {
    pub site_title: String,
    pub admin_user: String,
    pub admin_password: String,
    pub admin_email: String,
}

/// Pick the main domain out of a provider app's domain list: the first entry
/// that is not a wildcard.
#[must_use]
pub fn main_domain(domains: &[String]) -> Option<&str> {
    domains
        .iter()
        .find(|domain| !domain.starts_with("*."))
        .map(String::as_str)
}

/// Join a subdomain with the configured base domain.
#[must_use]
pub fn full_domain(subdomain: &str, base_domain: &str) -> String {
    format!("{subdomain}.{base_domain}")
}

// ── Unit tests ───────────────────────────────────────────────────────────────

//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`, or
//! `crate::application`. All error types implement `thiserror::Error` and
//! convert to `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Provider errors ───────────────────────────────────────────────────────────

/// Errors reported by the hosting-provider API boundary.
///
/// Provider calls return tagged results; nothing at this boundary panics or
/// raises through the port.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("provider transport failure: {0}")]
    Transport(String),

    #[error("provider response could not be decoded: {0}")]
    Decode(String),
}

// ── Storage errors ────────────────────────────────────────────────────────────

/// Errors from the instance registry.
///
/// Registry failures are logged and, where feasible, skipped over: a failed
/// insert does not abort a launch, and a failed archive does not stop the
/// rest of a purge batch.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot open registry at {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("registry query failed: {0}")]
    Query(String),

    #[error("registry write failed: {0}")]
    Write(String),
}

// ── Launch errors ─────────────────────────────────────────────────────────────

/// Errors that abort a launch.
///
/// Subdomain-collision exhaustion is deliberately not here: the launch
/// proceeds with the last candidate and logs a warning instead.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("rejected feature combination: {0}")]
    FeatureCondition(String),

    #[error("error creating sysuser: {0}")]
    UserCreation(#[source] ProviderError),

    #[error("error creating app: {0}")]
    AppCreation(#[source] ProviderError),

    #[error("remote commands did not run OK: {detail}")]
    RemoteExecution { detail: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid interval expression '{0}': expected <number><s|m|h|d>, e.g. 7d or 90m")]
    InvalidInterval(String),

    #[error("the 'domain' option must be set to the base domain for instances")]
    MissingDomain,
}

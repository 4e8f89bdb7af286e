//! Infrastructure implementation of the `InstanceStore` port.
//!
//! A sqlite registry with two tables: `instances` (active) and
//! `purged_instances` (append-only archive). Timestamps are stored as UTC
//! epoch seconds so the eligibility queries compare plain integers. Every
//! mutation is a single statement; the archive-then-delete pair runs
//! back-to-back without a wrapping transaction, which is acceptable because
//! failures are logged by the caller and a retry is idempotent.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::application::ports::InstanceStore;
use crate::domain::error::StorageError;
use crate::domain::{ExpirationPolicy, InstanceRecord, NewInstance};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS instances (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT NOT NULL,
    domain          TEXT NOT NULL,
    created         INTEGER NOT NULL,
    last_logged_in  INTEGER,
    checked_in      INTEGER,
    shortlived      INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS purged_instances (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT NOT NULL,
    domain          TEXT NOT NULL,
    created         INTEGER NOT NULL,
    last_logged_in  INTEGER,
    checked_in      INTEGER,
    shortlived      INTEGER NOT NULL DEFAULT 0
);
";

const INSTANCE_COLUMNS: &str = "id, username, domain, created, last_logged_in, checked_in, shortlived";

/// Sqlite-backed registry.
pub struct SqliteRegistry {
    conn: Mutex<Connection>,
}

impl SqliteRegistry {
    /// Open (or create) the registry at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be applied.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| StorageError::Open {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        }
        let conn = Connection::open(path).map_err(|err| StorageError::Open {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory registry, for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|err| StorageError::Open {
            path: ":memory:".to_string(),
            reason: err.to_string(),
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(query_error)?;
        conn.execute_batch(SCHEMA).map_err(query_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Default registry location: `~/.sandcastle/registry.db`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let home = dirs::home_dir().ok_or_else(|| StorageError::Open {
            path: "~/.sandcastle/registry.db".to_string(),
            reason: "cannot determine home directory".to_string(),
        })?;
        Ok(home.join(".sandcastle").join("registry.db"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-query; the
        // connection itself is still usable.
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn select(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::types::ToSql],
    ) -> Result<Vec<InstanceRecord>, StorageError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql).map_err(query_error)?;
        let rows = stmt
            .query_map(params, row_to_instance)
            .map_err(query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;
        Ok(rows)
    }
}

impl InstanceStore for SqliteRegistry {
    fn insert(&self, instance: &NewInstance) -> Result<(), StorageError> {
        self.lock()
            .execute(
                "INSERT INTO instances (username, domain, created, shortlived)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    instance.username,
                    instance.domain,
                    instance.created.timestamp(),
                    instance.shortlived,
                ],
            )
            .map_err(write_error)?;
        Ok(())
    }

    fn domain_in_use(&self, domain: &str) -> Result<bool, StorageError> {
        let found: Option<i64> = self
            .lock()
            .query_row(
                "SELECT 1 FROM instances WHERE domain = ?1 LIMIT 1",
                params![domain],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_error)?;
        Ok(found.is_some())
    }

    fn active(&self) -> Result<Vec<InstanceRecord>, StorageError> {
        self.select(
            &format!("SELECT {INSTANCE_COLUMNS} FROM instances ORDER BY created ASC"),
            &[],
        )
    }

    fn purged(&self) -> Result<Vec<InstanceRecord>, StorageError> {
        self.select(
            &format!("SELECT {INSTANCE_COLUMNS} FROM purged_instances ORDER BY created ASC"),
            &[],
        )
    }

    fn expired(
        &self,
        now: DateTime<Utc>,
        policy: &ExpirationPolicy,
    ) -> Result<Vec<InstanceRecord>, StorageError> {
        let cutoff = (now - policy.expiration).timestamp();
        let shortlived_cutoff = (now - policy.shortlived_expiration).timestamp();
        self.select(
            &format!(
                "SELECT {INSTANCE_COLUMNS} FROM instances
                 WHERE (last_logged_in IS NOT NULL AND last_logged_in < ?1)
                    OR (last_logged_in IS NULL AND created < ?1)
                    OR (shortlived != 0 AND created < ?2)
                 ORDER BY created ASC"
            ),
            &[&cutoff, &shortlived_cutoff],
        )
    }

    fn never_checked_in(
        &self,
        now: DateTime<Utc>,
        policy: &ExpirationPolicy,
    ) -> Result<Vec<InstanceRecord>, StorageError> {
        let cutoff = (now - policy.never_checked_in_expiration).timestamp();
        self.select(
            &format!(
                "SELECT {INSTANCE_COLUMNS} FROM instances
                 WHERE checked_in IS NULL AND created < ?1
                 ORDER BY created ASC"
            ),
            &[&cutoff],
        )
    }

    fn mark_checked_in(&self, domain: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        self.lock()
            .execute(
                "UPDATE instances SET checked_in = ?1 WHERE domain = ?2",
                params![at.timestamp(), domain],
            )
            .map_err(write_error)?;
        Ok(())
    }

    fn extend_life(&self, domain: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        self.lock()
            .execute(
                "UPDATE instances SET last_logged_in = ?1 WHERE domain = ?2",
                params![at.timestamp(), domain],
            )
            .map_err(write_error)?;
        Ok(())
    }

    fn archive(&self, instance: &InstanceRecord) -> Result<(), StorageError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO purged_instances
                 (username, domain, created, last_logged_in, checked_in, shortlived)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                instance.username,
                instance.domain,
                instance.created.timestamp(),
                instance.last_logged_in.map(|t| t.timestamp()),
                instance.checked_in.map(|t| t.timestamp()),
                instance.shortlived,
            ],
        )
        .map_err(write_error)?;
        conn.execute("DELETE FROM instances WHERE id = ?1", params![instance.id])
            .map_err(write_error)?;
        Ok(())
    }
}

fn row_to_instance(row: &Row<'_>) -> rusqlite::Result<InstanceRecord> {
    Ok(InstanceRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        domain: row.get(2)?,
        created: epoch_to_datetime(row.get(3)?),
        last_logged_in: row.get::<_, Option<i64>>(4)?.map(epoch_to_datetime),
        checked_in: row.get::<_, Option<i64>>(5)?.map(epoch_to_datetime),
        shortlived: row.get(6)?,
    })
}

fn epoch_to_datetime(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
}

fn query_error(err: rusqlite::Error) -> StorageError {
    StorageError::Query(err.to_string())
}

fn write_error(err: rusqlite::Error) -> StorageError {
    StorageError::Write(err.to_string())
}

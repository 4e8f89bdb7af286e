//! Tests for the sqlite registry implementation.

use chrono::{Duration, Utc};
use sandcastle::application::ports::InstanceStore;
use sandcastle::domain::NewInstance;
use sandcastle::infra::registry::SqliteRegistry;

use crate::helpers::seed_instance;

fn new_instance(domain: &str, username: &str) -> NewInstance {
    NewInstance {
        username: username.to_string(),
        domain: domain.to_string(),
        created: Utc::now(),
        shortlived: false,
    }
}

#[test]
fn insert_makes_domain_in_use() {
    let store = SqliteRegistry::open_in_memory().expect("registry");
    assert!(!store.domain_in_use("a.sandcastle.example").expect("check"));
    store
        .insert(&new_instance("a.sandcastle.example", "user-a"))
        .expect("insert");
    assert!(store.domain_in_use("a.sandcastle.example").expect("check"));
    assert!(!store.domain_in_use("b.sandcastle.example").expect("check"));
}

#[test]
fn registry_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("registry.db");
    {
        let store = SqliteRegistry::open(&path).expect("open");
        store
            .insert(&new_instance("a.sandcastle.example", "user-a"))
            .expect("insert");
    }
    let store = SqliteRegistry::open(&path).expect("reopen");
    let active = store.active().expect("active");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].domain, "a.sandcastle.example");
    assert_eq!(active[0].username, "user-a");
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("deeper").join("registry.db");
    let store = SqliteRegistry::open(&path).expect("open");
    assert!(store.active().expect("active").is_empty());
}

#[test]
fn fresh_rows_have_no_login_or_checkin() {
    let store = SqliteRegistry::open_in_memory().expect("registry");
    store
        .insert(&new_instance("a.sandcastle.example", "user-a"))
        .expect("insert");
    let active = store.active().expect("active");
    assert_eq!(active[0].last_logged_in, None);
    assert_eq!(active[0].checked_in, None);
    assert!(!active[0].shortlived);
}

#[test]
fn timestamps_round_trip_at_second_precision() {
    let store = SqliteRegistry::open_in_memory().expect("registry");
    let created = Utc::now() - Duration::days(3);
    store
        .insert(&NewInstance {
            username: "user-a".to_string(),
            domain: "a.sandcastle.example".to_string(),
            created,
            shortlived: true,
        })
        .expect("insert");
    let active = store.active().expect("active");
    assert_eq!(active[0].created.timestamp(), created.timestamp());
    assert!(active[0].shortlived);
}

#[test]
fn mark_checked_in_and_extend_life_are_last_write_wins() {
    let store = SqliteRegistry::open_in_memory().expect("registry");
    store
        .insert(&new_instance("a.sandcastle.example", "user-a"))
        .expect("insert");

    let first = Utc::now() - Duration::hours(2);
    let second = Utc::now() - Duration::hours(1);
    store
        .mark_checked_in("a.sandcastle.example", first)
        .expect("check in");
    store
        .mark_checked_in("a.sandcastle.example", second)
        .expect("check in again");
    store
        .extend_life("a.sandcastle.example", first)
        .expect("extend");
    store
        .extend_life("a.sandcastle.example", second)
        .expect("extend again");

    let active = store.active().expect("active");
    assert_eq!(
        active[0].checked_in.map(|t| t.timestamp()),
        Some(second.timestamp())
    );
    assert_eq!(
        active[0].last_logged_in.map(|t| t.timestamp()),
        Some(second.timestamp())
    );
}

#[test]
fn updates_for_unknown_domains_are_no_ops() {
    let store = SqliteRegistry::open_in_memory().expect("registry");
    store
        .mark_checked_in("missing.sandcastle.example", Utc::now())
        .expect("no-op update");
    store
        .extend_life("missing.sandcastle.example", Utc::now())
        .expect("no-op update");
}

#[test]
fn archive_moves_the_row_with_all_fields() {
    let store = SqliteRegistry::open_in_memory().expect("registry");
    let now = Utc::now();
    seed_instance(
        &store,
        "a.sandcastle.example",
        "user-a",
        now - Duration::days(10),
        Some(now - Duration::days(8)),
        Some(now - Duration::days(9)),
        true,
    );
    let record = store.active().expect("active").remove(0);

    store.archive(&record).expect("archive");

    assert!(store.active().expect("active").is_empty());
    let archived = store.purged().expect("purged");
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].username, record.username);
    assert_eq!(archived[0].domain, record.domain);
    assert_eq!(archived[0].created, record.created);
    assert_eq!(archived[0].last_logged_in, record.last_logged_in);
    assert_eq!(archived[0].checked_in, record.checked_in);
    assert_eq!(archived[0].shortlived, record.shortlived);
}

#[test]
fn archive_only_removes_the_archived_row() {
    let store = SqliteRegistry::open_in_memory().expect("registry");
    store
        .insert(&new_instance("a.sandcastle.example", "user-a"))
        .expect("insert");
    store
        .insert(&new_instance("b.sandcastle.example", "user-b"))
        .expect("insert");
    let target = store
        .active()
        .expect("active")
        .into_iter()
        .find(|i| i.domain == "a.sandcastle.example")
        .expect("row a");

    store.archive(&target).expect("archive");

    let remaining = store.active().expect("active");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].domain, "b.sandcastle.example");
}

//! Integration test: run the CLI binary against a scratch database.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use quire_core::models::{NewIdentity, Role};
use quire_core::store::identities;
use tempfile::TempDir;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

fn quire() -> Command {
    let mut cmd = Command::cargo_bin("quire_cli").expect("binary built");
    cmd.env_remove("RUST_LOG").env_remove("DATABASE_URL");
    cmd
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

#[test]
fn version_prints_name_and_version() {
    quire()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn migrate_creates_database_file() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("quire.db");

    quire()
        .args(["migrate", "--database-url", &sqlite_url(&db)])
        .assert()
        .success();
    assert!(db.exists());

    // Second run is a no-op.
    quire()
        .args(["migrate", "--database-url", &sqlite_url(&db)])
        .assert()
        .success();
}

#[test]
fn promote_unknown_user_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("quire.db");

    quire()
        .args([
            "promote",
            "--database-url",
            &sqlite_url(&db),
            "--username",
            "ghost",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("no user named 'ghost'"));
}

#[test]
fn promote_sets_role() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("quire.db");
    let url = sqlite_url(&db);

    let rt = runtime();
    rt.block_on(async {
        let pool = quire_core::db::connect(&url, 1).await.unwrap();
        quire_core::db::migrate(&pool).await.unwrap();
        quire_core::coordinator::Coordinator::new(pool.clone())
            .create_identity(&NewIdentity::new("alice", "alice@example.com", "hash".into()))
            .await
            .unwrap();
        pool.close().await;
    });

    quire()
        .args(["promote", "--database-url", &url, "--username", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice is now admin"));

    rt.block_on(async {
        let pool = quire_core::db::connect(&url, 1).await.unwrap();
        let alice = identities::find_by_username(&pool, "alice")
            .await
            .unwrap()
            .expect("alice exists");
        assert_eq!(alice.role, Role::Admin);
        pool.close().await;
    });
}

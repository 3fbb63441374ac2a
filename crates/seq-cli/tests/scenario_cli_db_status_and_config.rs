//! Exercises the CLI binary end-to-end via `assert_cmd`. Skips gracefully
//! when `SEQ_DATABASE_URL` is not set.

use assert_cmd::Command;
use predicates::prelude::*;
use uuid::Uuid;

#[test]
fn db_status_reports_ok_against_a_migrated_database() {
    let Ok(db_url) = std::env::var(seq_db::ENV_DB_URL) else {
        eprintln!("SKIP: SEQ_DATABASE_URL not set");
        return;
    };

    Command::cargo_bin("seq-cli")
        .unwrap()
        .env(seq_db::ENV_DB_URL, &db_url)
        .args(["db", "migrate"])
        .assert()
        .success();

    Command::cargo_bin("seq-cli")
        .unwrap()
        .env(seq_db::ENV_DB_URL, &db_url)
        .args(["db", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db_ok=true"));
}

#[test]
fn config_update_then_get_round_trips() {
    let Ok(db_url) = std::env::var(seq_db::ENV_DB_URL) else {
        eprintln!("SKIP: SEQ_DATABASE_URL not set");
        return;
    };

    let prefix = format!("CLI{}", Uuid::new_v4().simple());

    Command::cargo_bin("seq-cli")
        .unwrap()
        .env(seq_db::ENV_DB_URL, &db_url)
        .args([
            "config",
            "update",
            "--prefix",
            &prefix,
            "--padding-length",
            "6",
            "--format-template",
            "%s%06d",
            "--admin-user",
            "test-admin",
            "--create-if-missing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(&prefix));

    Command::cargo_bin("seq-cli")
        .unwrap()
        .env(seq_db::ENV_DB_URL, &db_url)
        .args(["config", "get", "--prefix", &prefix])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"padding_length\": 6"));
}

//! At-least-once audit: redelivering the same `AuditEvent` three times
//! must leave exactly one row behind.
//!
//! Skips gracefully when `SEQ_DATABASE_URL` is not set.

use chrono::Utc;
use seq_schemas::AuditRow;
use uuid::Uuid;

fn sample_row(prefix: &str, counter: i64, message_id: Uuid) -> AuditRow {
    AuditRow {
        prefix: prefix.to_string(),
        counter,
        full_number: format!("{prefix}{counter:06}"),
        message_id,
        generated_by: "consumer-test".to_string(),
        client_id: "client-1".to_string(),
        correlation_id: None,
        batch_id: None,
        generated_at: Utc::now(),
        recorded_at: Utc::now(),
    }
}

#[tokio::test]
async fn redelivering_the_same_event_three_times_inserts_once() -> anyhow::Result<()> {
    let url = match std::env::var(seq_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: SEQ_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    seq_db::migrate(&pool).await?;

    let prefix = format!("ALO{}", Uuid::new_v4().simple());
    let message_id = Uuid::new_v4();
    let row = sample_row(&prefix, 1, message_id);

    let mut inserted_count = 0;
    for _ in 0..3 {
        if seq_db::insert_audit_row(&pool, &row).await? {
            inserted_count += 1;
        }
    }

    assert_eq!(inserted_count, 1, "only the first delivery should insert a row");
    assert_eq!(seq_db::audit::count_for_prefix(&pool, &prefix).await?, 1);

    Ok(())
}

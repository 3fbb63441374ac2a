//! Scenario: competing consumers never claim the same outbox row, and an
//! acknowledged row is removed from the live queue.
//!
//! Skips gracefully when `SEQ_DATABASE_URL` is not set, so it is CI-friendly
//! without a live Postgres instance.

use chrono::Utc;
use seq_schemas::AuditEvent;
use uuid::Uuid;

fn sample_event(prefix: &str, counter: i64) -> AuditEvent {
    AuditEvent {
        message_id: Uuid::new_v4(),
        prefix: prefix.to_string(),
        counter,
        full_number: format!("{prefix}{counter:06}"),
        generated_by: "issuer-test".to_string(),
        client_id: "client-1".to_string(),
        correlation_id: None,
        generated_at: Utc::now(),
        published_at: Utc::now(),
        retry_count: 0,
        batch_id: None,
    }
}

#[tokio::test]
async fn enqueue_then_claim_batch_removes_row_from_pending() -> anyhow::Result<()> {
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

    let prefix = format!("TST{}", Uuid::new_v4().simple());
    let ev = sample_event(&prefix, 1);

    let created = seq_db::enqueue(&pool, &ev).await?;
    assert!(created, "enqueue must create a new row on first call");

    let retried = seq_db::enqueue(&pool, &ev).await?;
    assert!(!retried, "re-enqueueing the same message_id must be a no-op");

    let claimed = seq_db::claim_batch(&pool, 10, 30, "consumer-a").await?;
    let mine: Vec<_> = claimed.iter().filter(|r| r.prefix == prefix).collect();
    assert_eq!(mine.len(), 1, "exactly one row should be claimable");

    // A second consumer racing immediately after must see nothing left for
    // this prefix — the row is CLAIMED and still within its visibility window.
    let claimed_again = seq_db::claim_batch(&pool, 10, 30, "consumer-b").await?;
    assert!(
        claimed_again.iter().all(|r| r.prefix != prefix),
        "a freshly claimed row must not be claimable again before its visibility window elapses"
    );

    let outbox_id = mine[0].outbox_id;
    let acked = seq_db::ack(&pool, outbox_id).await?;
    assert!(acked, "ack must remove the row");

    let unacked = seq_db::list_unacked_for_prefix(&pool, &prefix).await?;
    assert!(unacked.is_empty(), "acked row must no longer be unacked");

    Ok(())
}

#[tokio::test]
async fn requeue_makes_a_row_immediately_reclaimable() -> anyhow::Result<()> {
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

    let prefix = format!("RTY{}", Uuid::new_v4().simple());
    let ev = sample_event(&prefix, 7);
    seq_db::enqueue(&pool, &ev).await?;

    let claimed = seq_db::claim_batch(&pool, 10, 30, "consumer-a").await?;
    let row = claimed
        .into_iter()
        .find(|r| r.prefix == prefix)
        .expect("row must be claimable");
    assert_eq!(row.retry_count, 0);

    let retry_count = seq_db::requeue(&pool, row.outbox_id).await?;
    assert_eq!(retry_count, 1);

    let reclaimed = seq_db::claim_batch(&pool, 10, 30, "consumer-b").await?;
    assert!(
        reclaimed.iter().any(|r| r.outbox_id == row.outbox_id),
        "a requeued row must be immediately reclaimable"
    );

    Ok(())
}

#[tokio::test]
async fn dead_letter_moves_row_out_of_the_live_queue() -> anyhow::Result<()> {
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

    let prefix = format!("DLQ{}", Uuid::new_v4().simple());
    let ev = sample_event(&prefix, 3);
    seq_db::enqueue(&pool, &ev).await?;

    let claimed = seq_db::claim_batch(&pool, 10, 30, "consumer-a").await?;
    let row = claimed
        .into_iter()
        .find(|r| r.prefix == prefix)
        .expect("row must be claimable");

    seq_db::dead_letter(&pool, &row, "exceeded retry budget").await?;

    let unacked = seq_db::list_unacked_for_prefix(&pool, &prefix).await?;
    assert!(unacked.is_empty(), "dead-lettered row must leave the live queue");

    Ok(())
}

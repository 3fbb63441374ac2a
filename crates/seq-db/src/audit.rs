use seq_schemas::{AuditRow, SeqResult};
use sqlx::PgPool;

/// Insert an `AuditRow`, treating a unique-key conflict on either
/// `(prefix, counter_value)` or `message_id` as success — idempotent audit
/// under at-least-once delivery. Returns `true` if this call inserted the
/// row, `false` if it already existed.
pub async fn insert_audit_row(pool: &PgPool, row: &AuditRow) -> SeqResult<bool> {
    let inserted = sqlx::query(
        r#"
        insert into seq_log (
            prefix, counter_value, full_number, message_id, generated_by,
            client_id, correlation_id, batch_id, generated_at, recorded_at
        ) values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        -- Bare ON CONFLICT DO NOTHING catches a violation of *either*
        -- unique constraint (prefix, counter_value) or (message_id),
        -- which is exactly the idempotency contract this table enforces.
        on conflict do nothing
        "#,
    )
    .bind(&row.prefix)
    .bind(row.counter)
    .bind(&row.full_number)
    .bind(row.message_id)
    .bind(&row.generated_by)
    .bind(&row.client_id)
    .bind(&row.correlation_id)
    .bind(row.batch_id)
    .bind(row.generated_at)
    .bind(row.recorded_at)
    .execute(pool)
    .await?;

    Ok(inserted.rows_affected() > 0)
}

/// `max(counter) from audit store where prefix = p`, `0` if none.
pub async fn max_counter(pool: &PgPool, prefix: &str) -> SeqResult<i64> {
    let (max,): (Option<i64>,) = sqlx::query_as(
        r#"select max(counter_value) from seq_log where prefix = $1"#,
    )
    .bind(prefix)
    .fetch_one(pool)
    .await?;

    Ok(max.unwrap_or(0))
}

/// Count of audit rows for a prefix — used by scenario tests (e.g. S2's
/// "100 corresponding AuditRows" assertion) and by `Status`.
pub async fn count_for_prefix(pool: &PgPool, prefix: &str) -> SeqResult<i64> {
    let (n,): (i64,) = sqlx::query_as(r#"select count(*) from seq_log where prefix = $1"#)
        .bind(prefix)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

use chrono::{DateTime, Utc};
use seq_schemas::{AuditEvent, SeqResult};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// The at-rest representation of an [`AuditEvent`] in the durable queue,
/// realized as a transactional outbox.
///
/// `payload_json` is kept undecoded so a single malformed row never fails
/// an entire `claim_batch` call — callers decode with [`OutboxRow::event`]
/// and dead-letter just that row on parse failure.
#[derive(Debug, Clone)]
pub struct OutboxRow {
    pub outbox_id: i64,
    pub message_id: Uuid,
    pub prefix: String,
    pub payload_json: serde_json::Value,
    pub retry_count: i32,
    pub claimed_by: Option<String>,
}

impl OutboxRow {
    pub fn event(&self) -> Result<AuditEvent, serde_json::Error> {
        serde_json::from_value(self.payload_json.clone())
    }
}

fn row_to_outbox(row: &sqlx::postgres::PgRow) -> sqlx::Result<OutboxRow> {
    Ok(OutboxRow {
        outbox_id: row.try_get("outbox_id")?,
        message_id: row.try_get("message_id")?,
        prefix: row.try_get("prefix")?,
        payload_json: row.try_get("payload_json")?,
        retry_count: row.try_get("retry_count")?,
        claimed_by: row.try_get("claimed_by")?,
    })
}

/// Publish an `AuditEvent` to the durable queue. Fire-and-forget from the
/// Issuer's perspective: the only failure mode the caller need act on is
/// a DB-unavailable error, which it should log and surface as a
/// lost-audit metric, never as a failed issuance.
pub async fn enqueue(pool: &PgPool, event: &AuditEvent) -> SeqResult<bool> {
    let payload = serde_json::to_value(event).expect("AuditEvent serialization cannot fail");
    let inserted = sqlx::query(
        r#"
        insert into seq_outbox (message_id, prefix, payload_json)
        values ($1, $2, $3)
        on conflict (message_id) do nothing
        "#,
    )
    .bind(event.message_id)
    .bind(&event.prefix)
    .bind(payload)
    .execute(pool)
    .await?;

    Ok(inserted.rows_affected() > 0)
}

/// Atomically claim up to `batch_size` deliverable rows for exclusive
/// processing: rows that are `PENDING`, or `CLAIMED` but past their
/// visibility window (a consumer that crashed after claiming but before
/// acking — a consumer must never lose an unacknowledged message).
///
/// Uses `FOR UPDATE SKIP LOCKED` so concurrent consumers never claim the
/// same row.
pub async fn claim_batch(
    pool: &PgPool,
    batch_size: i64,
    visibility_secs: i64,
    consumer_id: &str,
) -> SeqResult<Vec<OutboxRow>> {
    let rows = sqlx::query(
        r#"
        with to_claim as (
            select outbox_id
            from seq_outbox
            where status = 'PENDING'
               or (status = 'CLAIMED' and available_at <= now())
            order by outbox_id asc
            limit $1
            for update skip locked
        )
        update seq_outbox
           set status       = 'CLAIMED',
               claimed_at    = now(),
               claimed_by    = $2,
               available_at = now() + make_interval(secs => $3)
         where outbox_id in (select outbox_id from to_claim)
        returning outbox_id, message_id, prefix, payload_json, retry_count, claimed_by
        "#,
    )
    .bind(batch_size)
    .bind(consumer_id)
    .bind(visibility_secs as f64)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_outbox).collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Acknowledge: the row's effect (an `AuditRow`) is durably persisted, so
/// it is deleted from the queue.
pub async fn ack(pool: &PgPool, outbox_id: i64) -> SeqResult<bool> {
    let deleted = sqlx::query(r#"delete from seq_outbox where outbox_id = $1"#)
        .bind(outbox_id)
        .execute(pool)
        .await?;
    Ok(deleted.rows_affected() > 0)
}

/// Transient failure: bump `retry_count` and make the row immediately
/// reclaimable.
pub async fn requeue(pool: &PgPool, outbox_id: i64) -> SeqResult<i32> {
    let (retry_count,): (i32,) = sqlx::query_as(
        r#"
        update seq_outbox
           set status       = 'PENDING',
               retry_count  = retry_count + 1,
               claimed_by   = null,
               available_at = now()
         where outbox_id = $1
        returning retry_count
        "#,
    )
    .bind(outbox_id)
    .fetch_one(pool)
    .await?;
    Ok(retry_count)
}

/// Move a row past its retry budget (or one that failed to deserialize)
/// into the dead-letter table and remove it from the live queue — both
/// in one transaction so a crash can never leave the event in neither
/// place nor duplicated in both.
pub async fn dead_letter(pool: &PgPool, row: &OutboxRow, reason: &str) -> SeqResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        insert into seq_outbox_dlq (outbox_id, message_id, prefix, payload_json, retry_count, reason)
        values ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(row.outbox_id)
    .bind(row.message_id)
    .bind(&row.prefix)
    .bind(&row.payload_json)
    .bind(row.retry_count)
    .bind(reason)
    .execute(&mut *tx)
    .await?;

    sqlx::query(r#"delete from seq_outbox where outbox_id = $1"#)
        .bind(row.outbox_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Recovery query: rows not yet acknowledged for a prefix — the minimal
/// deterministic input a reconciliation/ops tool needs to spot gaps.
pub async fn list_unacked_for_prefix(pool: &PgPool, prefix: &str) -> SeqResult<Vec<OutboxRow>> {
    let rows = sqlx::query(
        r#"
        select outbox_id, message_id, prefix, payload_json, retry_count, claimed_by
        from seq_outbox
        where prefix = $1
        order by outbox_id asc
        "#,
    )
    .bind(prefix)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_outbox).collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

#[derive(Debug, Clone, Copy)]
pub struct DeadLetterRowCount {
    pub prefix_count: i64,
}

/// Lightweight reachability probe for health checks: confirms the queue
/// table itself is queryable without touching any row.
pub async fn queue_reachable(pool: &PgPool) -> SeqResult<bool> {
    sqlx::query("select 1 from seq_outbox limit 0").execute(pool).await?;
    Ok(true)
}

/// Time the row was first created, for TTL-based ops tooling.
pub async fn created_at(pool: &PgPool, outbox_id: i64) -> SeqResult<Option<DateTime<Utc>>> {
    let row: Option<(DateTime<Utc>,)> =
        sqlx::query_as(r#"select created_at from seq_outbox where outbox_id = $1"#)
            .bind(outbox_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(t,)| t))
}

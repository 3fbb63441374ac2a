use seq_schemas::{ResetLog, SeqResult};
use sqlx::PgPool;
use uuid::Uuid;

/// Append a `ResetLog` row under a caller-supplied `reset_id`. Never
/// called unless the Counter Engine replacement already succeeded — if
/// this write fails, the caller still has `reset_id` to report back,
/// since the counter replacement is not unwound.
pub async fn append_reset_log(
    pool: &PgPool,
    reset_id: Uuid,
    prefix: &str,
    old_value: i64,
    new_value: i64,
    reason: &str,
    admin_user: &str,
) -> SeqResult<ResetLog> {
    let row = sqlx::query_as::<_, (Uuid, String, i64, i64, String, String, chrono::DateTime<chrono::Utc>)>(
        r#"
        insert into seq_reset_log (reset_id, prefix, old_value, new_value, reason, admin_user)
        values ($1, $2, $3, $4, $5, $6)
        returning reset_id, prefix, old_value, new_value, reason, admin_user, reset_at
        "#,
    )
    .bind(reset_id)
    .bind(prefix)
    .bind(old_value)
    .bind(new_value)
    .bind(reason)
    .bind(admin_user)
    .fetch_one(pool)
    .await?;

    Ok(ResetLog {
        reset_id: row.0,
        prefix: row.1,
        old_value: row.2,
        new_value: row.3,
        reason: row.4,
        admin_user: row.5,
        reset_at: row.6,
    })
}

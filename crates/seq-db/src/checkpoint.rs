use seq_schemas::{Checkpoint, SeqResult};
use sqlx::PgPool;

/// Upsert the per-prefix checkpoint recorded by a reconcile pass.
pub async fn upsert_checkpoint(
    pool: &PgPool,
    prefix: &str,
    last_counter_synced: i64,
    synced_by: &str,
) -> SeqResult<()> {
    sqlx::query(
        r#"
        insert into seq_checkpoint (prefix, last_counter_synced, synced_by)
        values ($1, $2, $3)
        on conflict (prefix) do update
            set last_counter_synced = excluded.last_counter_synced,
                synced_at           = now(),
                synced_by           = excluded.synced_by
        "#,
    )
    .bind(prefix)
    .bind(last_counter_synced)
    .bind(synced_by)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_checkpoint(pool: &PgPool, prefix: &str) -> SeqResult<Option<Checkpoint>> {
    let row = sqlx::query_as::<_, (String, i64, chrono::DateTime<chrono::Utc>, String)>(
        r#"select prefix, last_counter_synced, synced_at, synced_by from seq_checkpoint where prefix = $1"#,
    )
    .bind(prefix)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(prefix, last_counter_synced, synced_at, synced_by)| Checkpoint {
        prefix,
        last_counter_synced,
        synced_at,
        synced_by,
    }))
}

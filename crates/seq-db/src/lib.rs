// core-rs/crates/seq-db/src/lib.rs
use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

pub const ENV_DB_URL: &str = "SEQ_DATABASE_URL";

pub mod audit;
pub mod checkpoint;
pub mod config;
pub mod outbox;
pub mod resetlog;
pub mod store;

pub use audit::insert_audit_row;
pub use checkpoint::{get_checkpoint, upsert_checkpoint};
pub use config::{get_config, list_prefixes, require_config, update_config, ConfigPatch};
pub use outbox::{
    ack, claim_batch, dead_letter, enqueue, list_unacked_for_prefix, queue_reachable, requeue, OutboxRow,
};
pub use resetlog::append_reset_log;
pub use store::{AuditStore, PgAuditStore};

/// Connect to Postgres using SEQ_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Test helper used by feature = "testkit" integration tests:
/// - Connect using SEQ_DATABASE_URL
/// - Ensure migrations are applied
pub async fn testkit_db_pool() -> Result<PgPool> {
    let pool = connect_from_env().await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence), backing the
/// daemon's `/readyz` and the CLI's `db status` subcommand.
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;
    let ok = one == 1;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='seq_config'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok,
        has_seq_config_table: exists,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_seq_config_table: bool,
}

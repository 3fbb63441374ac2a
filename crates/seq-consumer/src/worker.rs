use std::time::Duration;

use seq_schemas::AuditRow;
use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{info, warn};

/// Tunables for a single worker loop.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Bounded prefetch per claim call (default 10).
    pub batch_size: i64,
    /// How long a claimed row stays hidden from other consumers.
    pub visibility_secs: i64,
    /// Retries allowed before a row is dead-lettered (default 3).
    pub retry_limit: i32,
    /// How long to sleep after an empty claim before polling again.
    pub poll_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: seq_schemas::DEFAULT_PREFETCH,
            visibility_secs: 30,
            retry_limit: seq_schemas::RETRY_LIMIT,
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Run one worker until `shutdown` fires. Each worker claims its own
/// batches under its own `consumer_id`, so several can run concurrently
/// against the same queue.
pub async fn run(
    pool: PgPool,
    consumer_id: String,
    cfg: WorkerConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            return;
        }

        let batch = match seq_db::claim_batch(&pool, cfg.batch_size, cfg.visibility_secs, &consumer_id).await {
            Ok(b) => b,
            Err(e) => {
                warn!(consumer_id = %consumer_id, error = %e, "claim_batch failed, backing off");
                tokio::time::sleep(cfg.poll_interval).await;
                continue;
            }
        };

        if batch.is_empty() {
            tokio::select! {
                _ = tokio::time::sleep(cfg.poll_interval) => {}
                _ = shutdown.changed() => {}
            }
            continue;
        }

        for row in batch {
            process_row(&pool, row, cfg.retry_limit).await;
        }
    }
}

async fn process_row(pool: &PgPool, row: seq_db::OutboxRow, retry_limit: i32) {
    let event = match row.event() {
        Ok(e) => e,
        Err(e) => {
            // A parse failure dead-letters immediately, no requeue — a
            // malformed payload will never become parseable.
            warn!(outbox_id = row.outbox_id, error = %e, "audit event failed to parse, dead-lettering");
            if let Err(e) = seq_db::dead_letter(pool, &row, &format!("parse error: {e}")).await {
                warn!(outbox_id = row.outbox_id, error = %e, "dead_letter failed for unparseable row");
            }
            return;
        }
    };

    let audit_row = AuditRow::from(&event);
    match seq_db::insert_audit_row(pool, &audit_row).await {
        Ok(_) => {
            if let Err(e) = seq_db::ack(pool, row.outbox_id).await {
                warn!(outbox_id = row.outbox_id, error = %e, "ack failed after successful insert");
            }
        }
        Err(e) => {
            if row.retry_count + 1 >= retry_limit {
                info!(
                    outbox_id = row.outbox_id, retry_count = row.retry_count, error = %e,
                    "retry budget exhausted, dead-lettering"
                );
                if let Err(e) = seq_db::dead_letter(pool, &row, &format!("retry budget exceeded: {e}")).await {
                    warn!(outbox_id = row.outbox_id, error = %e, "dead_letter failed");
                }
            } else if let Err(e) = seq_db::requeue(pool, row.outbox_id).await {
                warn!(outbox_id = row.outbox_id, error = %e, "requeue failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_defaults() {
        let cfg = WorkerConfig::default();
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.retry_limit, 3);
    }
}

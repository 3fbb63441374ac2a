use seq_schemas::{ComponentHealth, PrefixStatus, SeqResult};
use sqlx::PgPool;

use seq_counter::CounterStore;

/// `Status(prefix)`: current/next counter value plus a best-effort health
/// snapshot of the two stores the Issuer depends on. A counter-store
/// failure is reported as an unhealthy `counter_store` component rather
/// than aborting the whole call; `current`/`next` fall back to `0`/`1`
/// when the read fails, since there is nothing else to report.
pub async fn status(pool: &PgPool, counter: &dyn CounterStore, prefix: &str) -> SeqResult<PrefixStatus> {
    let mut health = Vec::with_capacity(2);

    let current = match counter.read(prefix).await {
        Ok(v) => {
            health.push(ComponentHealth {
                component: "counter_store".to_string(),
                healthy: true,
                detail: None,
            });
            v
        }
        Err(e) => {
            health.push(ComponentHealth {
                component: "counter_store".to_string(),
                healthy: false,
                detail: Some(e.to_string()),
            });
            0
        }
    };

    let db_health = match seq_db::status(pool).await {
        Ok(s) => ComponentHealth {
            component: "audit_store".to_string(),
            healthy: s.ok && s.has_seq_config_table,
            detail: None,
        },
        Err(e) => ComponentHealth {
            component: "audit_store".to_string(),
            healthy: false,
            detail: Some(e.to_string()),
        },
    };
    health.push(db_health);

    Ok(PrefixStatus {
        prefix: prefix.to_string(),
        current,
        next: current + 1,
        store_health: health,
    })
}

use seq_schemas::{ComponentHealth, HealthCheck, SeqResult};
use sqlx::PgPool;

use seq_counter::CounterStore;

/// Probe for a prefix-independent key, never written, so the probe has no
/// observable side effect.
const HEALTH_PROBE_PREFIX: &str = "__health_check__";

/// `HealthCheck()`: a process-wide probe of the three integration seams
/// (counter store, audit store, durable queue), independent of any one
/// prefix. Each component's failure is isolated — a Redis outage still
/// lets the audit-store/queue components report their own state.
pub async fn health_check(pool: &PgPool, counter: &dyn CounterStore) -> SeqResult<HealthCheck> {
    let mut components = Vec::with_capacity(3);

    let counter_health = match counter.read(HEALTH_PROBE_PREFIX).await {
        Ok(_) => ComponentHealth {
            component: "counter_store".to_string(),
            healthy: true,
            detail: None,
        },
        Err(e) => ComponentHealth {
            component: "counter_store".to_string(),
            healthy: false,
            detail: Some(e.to_string()),
        },
    };
    components.push(counter_health);

    let audit_health = match seq_db::status(pool).await {
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
    components.push(audit_health);

    let queue_health = match seq_db::queue_reachable(pool).await {
        Ok(healthy) => ComponentHealth {
            component: "queue".to_string(),
            healthy,
            detail: None,
        },
        Err(e) => ComponentHealth {
            component: "queue".to_string(),
            healthy: false,
            detail: Some(e.to_string()),
        },
    };
    components.push(queue_health);

    let overall = components.iter().all(|c| c.healthy);
    Ok(HealthCheck { overall, components })
}

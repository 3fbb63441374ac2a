//! The Reconciler: runs at process start and on demand.
//! Deterministic decision logic lives in `engine`; this module drives the
//! IO (audit-store read, counter-store read/write, checkpoint upsert).
//!
//! Must not run issuance traffic concurrently with itself for the same
//! prefix; startup-time usage is naturally single-threaded. Post-startup
//! invocations are for recovery tooling only.

mod engine;

pub use engine::decide_repair;

use seq_counter::CounterStore;
use seq_schemas::SeqResult;
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub max_counter: i64,
    pub current: i64,
    pub repaired_to: Option<i64>,
}

/// Run the full reconcile procedure for one prefix.
pub async fn reconcile_prefix(
    pool: &PgPool,
    counter: &dyn CounterStore,
    prefix: &str,
) -> SeqResult<ReconcileOutcome> {
    let max_counter = seq_db::audit::max_counter(pool, prefix).await?;
    let current = counter.read(prefix).await?;

    let repaired_to = decide_repair(max_counter, current);
    if let Some(new_value) = repaired_to {
        counter.reset(prefix, new_value).await?;
    }

    let synced = repaired_to.unwrap_or(current);
    seq_db::upsert_checkpoint(pool, prefix, synced, "system").await?;

    Ok(ReconcileOutcome {
        max_counter,
        current,
        repaired_to,
    })
}

/// Run reconcile for every prefix in `prefixes`, in order. Intended for
/// startup, where a single-threaded pass over all configured prefixes is
/// the natural usage.
pub async fn reconcile_all(
    pool: &PgPool,
    counter: &dyn CounterStore,
    prefixes: &[String],
) -> SeqResult<Vec<(String, ReconcileOutcome)>> {
    let mut out = Vec::with_capacity(prefixes.len());
    for prefix in prefixes {
        let outcome = reconcile_prefix(pool, counter, prefix).await?;
        out.push((prefix.clone(), outcome));
    }
    Ok(out)
}

//! Audit Pipeline consumer side: a bounded-concurrency
//! worker pool claiming outbox batches, inserting `AuditRow`s
//! idempotently, and ack/requeue/dead-lettering per the retry budget.

mod worker;

pub use worker::{run, WorkerConfig};

use sqlx::PgPool;
use tokio::{sync::watch, task::JoinHandle};

/// Spawn `concurrency` independent worker loops sharing one pool and
/// config, each under a distinct `consumer_id`. Drop the returned
/// `watch::Sender` (or send `true`) to signal all workers to stop after
/// their current batch.
pub fn spawn_pool(
    pool: PgPool,
    concurrency: usize,
    cfg: WorkerConfig,
) -> (watch::Sender<bool>, Vec<JoinHandle<()>>) {
    let (tx, rx) = watch::channel(false);
    let handles = (0..concurrency)
        .map(|i| {
            let pool = pool.clone();
            let rx = rx.clone();
            let consumer_id = format!("seq-consumer-{i}");
            tokio::spawn(worker::run(pool, consumer_id, cfg, rx))
        })
        .collect();
    (tx, handles)
}

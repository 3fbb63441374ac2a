//! seq-consumer entry point: runs the outbox worker pool with no HTTP
//! surface of its own. All worker logic lives in `worker.rs`; this file
//! only wires config, the pool, and shutdown.

use anyhow::Context;
use seq_consumer::WorkerConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cfg = seq_config::ServiceConfig::from_env().context("loading service config")?;
    let pool = seq_db::connect_from_env().await.context("connecting to postgres")?;
    seq_db::migrate(&pool).await.context("running migrations")?;

    let worker_cfg = WorkerConfig {
        batch_size: cfg.consumer_batch_size,
        visibility_secs: cfg.consumer_visibility_secs,
        retry_limit: cfg.consumer_retry_limit,
        ..WorkerConfig::default()
    };

    info!(
        concurrency = cfg.consumer_concurrency,
        batch_size = worker_cfg.batch_size,
        "seq-consumer starting worker pool"
    );

    let (shutdown_tx, handles) = seq_consumer::spawn_pool(pool, cfg.consumer_concurrency, worker_cfg);

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("shutdown requested, draining in-flight batches");
    let _ = shutdown_tx.send(true);

    for handle in handles {
        let _ = handle.await;
    }

    info!("seq-consumer stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

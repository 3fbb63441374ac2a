//! Shared runtime state for seq-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum; this module owns
//! nothing async itself beyond what's needed to construct the
//! collaborators the handlers call into.

use std::sync::Arc;

use seq_counter::{CounterStore, RedisCounterStore};
use seq_db::{AuditStore, PgAuditStore};
use seq_issuer::Issuer;
use sqlx::PgPool;

/// Static build metadata included in health responses.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: "seq-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Cloneable (Arc-backed) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub counter: Arc<dyn CounterStore>,
    pub issuer: Arc<Issuer>,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(pool: PgPool, counter: Arc<dyn CounterStore>) -> Self {
        let audit: Arc<dyn AuditStore> = Arc::new(PgAuditStore::new(pool.clone()));
        let issuer = Arc::new(Issuer::new(pool.clone(), counter.clone(), audit));
        Self {
            pool,
            counter,
            issuer,
            build: BuildInfo::default(),
        }
    }

    /// Connects to Postgres and Redis and runs pending migrations. Used by
    /// `main` at startup; tests build `AppState::new` directly against a
    /// pool they already control.
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let pool = seq_db::connect_from_env().await?;
        seq_db::migrate(&pool).await?;
        let counter: Arc<dyn CounterStore> = Arc::new(RedisCounterStore::connect(redis_url).await?);
        Ok(Self::new(pool, counter))
    }
}

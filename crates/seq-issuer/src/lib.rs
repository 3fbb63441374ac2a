//! The Issuer: the critical path exposed to transport adapters.
//! Orchestrates a single issuance — config lookup, counter advance,
//! formatting, and a best-effort audit publish — and the administrative
//! reset operation.

mod cache;
mod health;
mod reset;
mod status;

pub use cache::ConfigCache;
pub use health::health_check;
pub use reset::{reset, ResetOutcome};
pub use status::status;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use seq_schemas::{AuditEvent, IssuedBatch, IssuedID, PrefixConfig, SeqError, SeqResult};
use sqlx::PgPool;
use tokio::time::timeout;
use tracing::warn;
use uuid::Uuid;

use seq_counter::CounterStore;
use seq_db::AuditStore;

/// Per-call timeout budgets for the external calls on the issuance path.
/// A timeout surfaces as `SeqError::Transient`.
const ADVANCE_TIMEOUT: Duration = Duration::from_millis(100);
const PUBLISH_TIMEOUT: Duration = Duration::from_millis(500);
const CONFIG_READ_TIMEOUT: Duration = Duration::from_millis(200);

pub struct Issuer {
    pool: PgPool,
    counter: Arc<dyn CounterStore>,
    audit: Arc<dyn AuditStore>,
    cache: ConfigCache,
}

impl Issuer {
    pub fn new(pool: PgPool, counter: Arc<dyn CounterStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self {
            pool,
            counter,
            audit,
            cache: ConfigCache::new(),
        }
    }

    /// Call after a successful `UpdateConfig` so the next `issue` on this
    /// prefix reloads the new template instead of serving a stale one.
    pub async fn invalidate_config(&self, prefix: &str) {
        self.cache.invalidate(prefix).await;
    }

    /// Seed the config cache directly, bypassing the database-backed
    /// lookup on the next `issue`/`issue_batch` call for this prefix.
    /// Lets an `Issuer` built against in-memory store fakes run without a
    /// reachable Postgres at all, as long as callers only ever issue
    /// against prefixes they've primed.
    pub async fn preload_config(&self, config: PrefixConfig) {
        self.cache.put(config).await;
    }

    async fn load_config(&self, prefix: &str) -> SeqResult<seq_schemas::PrefixConfig> {
        if let Some(cfg) = self.cache.get(prefix).await {
            return Ok(cfg);
        }
        let cfg = timeout(CONFIG_READ_TIMEOUT, seq_db::require_config(&self.pool, prefix))
            .await
            .map_err(SeqError::from)??;
        self.cache.put(cfg.clone()).await;
        Ok(cfg)
    }

    /// Mint a single identifier for `prefix` and publish its audit event.
    pub async fn issue(
        &self,
        prefix: &str,
        client_id: &str,
        generated_by: &str,
        correlation_id: Option<String>,
    ) -> SeqResult<IssuedID> {
        let config = self.load_config(prefix).await?;

        let n = timeout(ADVANCE_TIMEOUT, self.counter.advance(prefix))
            .await
            .map_err(SeqError::from)??;

        let message_id = Uuid::new_v4();
        let generated_at = Utc::now();
        let full_number = seq_formatter::format(&config, n, generated_at)?;

        let issued = IssuedID {
            prefix: prefix.to_string(),
            counter: n,
            full_number,
            message_id,
            generated_at,
            client_id: client_id.to_string(),
            generated_by: generated_by.to_string(),
        };

        let event = AuditEvent::from_issued(&issued, correlation_id, None);
        self.publish_best_effort(&event).await;

        Ok(issued)
    }

    /// Mint a contiguous batch of `count` identifiers sharing one
    /// `batch_id`. All-or-nothing on the counter advance; per-message
    /// best-effort on publishes.
    pub async fn issue_batch(
        &self,
        prefix: &str,
        count: u32,
        client_id: &str,
        generated_by: &str,
        correlation_id: Option<String>,
    ) -> SeqResult<IssuedBatch> {
        let config = self.load_config(prefix).await?;

        let n_end = timeout(ADVANCE_TIMEOUT, self.counter.advance_by(prefix, count))
            .await
            .map_err(SeqError::from)??;

        let batch_id = Uuid::new_v4();
        let generated_at = Utc::now();
        let start = n_end - count as i64 + 1;

        let mut ids = Vec::with_capacity(count as usize);
        for n in start..=n_end {
            let full_number = seq_formatter::format(&config, n, generated_at)?;
            let issued = IssuedID {
                prefix: prefix.to_string(),
                counter: n,
                full_number,
                message_id: Uuid::new_v4(),
                generated_at,
                client_id: client_id.to_string(),
                generated_by: generated_by.to_string(),
            };
            let event = AuditEvent::from_issued(&issued, correlation_id.clone(), Some(batch_id));
            self.publish_best_effort(&event).await;
            ids.push(issued);
        }

        Ok(IssuedBatch { batch_id, ids })
    }

    /// Publish failures never roll back the counter or fail the caller's
    /// request — only log and surface for ops tooling.
    async fn publish_best_effort(&self, event: &AuditEvent) {
        match timeout(PUBLISH_TIMEOUT, self.audit.publish(event)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                prefix = %event.prefix, counter = event.counter, message_id = %event.message_id,
                error = %e, "lost-audit: outbox enqueue failed"
            ),
            Err(_) => warn!(
                prefix = %event.prefix, counter = event.counter, message_id = %event.message_id,
                "lost-audit: outbox enqueue timed out"
            ),
        }
    }
}

use async_trait::async_trait;
use seq_schemas::{AuditEvent, SeqResult};
use sqlx::PgPool;

/// The Audit Store seam, analogous to `seq-counter`'s `CounterStore`:
/// publishing an `AuditEvent` onto the durable queue. Implemented here
/// against the Postgres outbox table (`PgAuditStore`); an in-memory fake
/// lives in `seq-testkit` so `Issuer` can be exercised without a live
/// Postgres instance.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Publish an `AuditEvent`. Fire-and-forget from the caller's
    /// perspective — de-duplication on `message_id` happens downstream,
    /// at audit-row insertion, not here.
    async fn publish(&self, event: &AuditEvent) -> SeqResult<()>;
}

/// `AuditStore` backed by the Postgres outbox table.
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn publish(&self, event: &AuditEvent) -> SeqResult<()> {
        crate::outbox::enqueue(&self.pool, event).await?;
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The value handed back to a caller of `Issue`/`IssueBatch`. Constructed
/// per request; one copy travels through the audit pipeline as the
/// payload of an [`AuditEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedID {
    pub prefix: String,
    pub counter: i64,
    pub full_number: String,
    pub message_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub client_id: String,
    pub generated_by: String,
}

/// The durable-queue payload. Created by the
/// Issuer at publish time; in this implementation it is materialized as
/// a row in the `seq_outbox` table (see `seq-db`) and deleted from there
/// once a consumer acknowledges it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub message_id: Uuid,
    pub prefix: String,
    pub counter: i64,
    pub full_number: String,
    pub generated_by: String,
    pub client_id: String,
    pub correlation_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    pub retry_count: i32,
    pub batch_id: Option<Uuid>,
}

impl AuditEvent {
    pub fn from_issued(issued: &IssuedID, correlation_id: Option<String>, batch_id: Option<Uuid>) -> Self {
        Self {
            message_id: issued.message_id,
            prefix: issued.prefix.clone(),
            counter: issued.counter,
            full_number: issued.full_number.clone(),
            generated_by: issued.generated_by.clone(),
            client_id: issued.client_id.clone(),
            correlation_id,
            generated_at: issued.generated_at,
            published_at: Utc::now(),
            retry_count: 0,
            batch_id,
        }
    }
}

/// The durable record in the audit store, keyed by `(prefix, counter)`
/// (unique) and by `message_id` (unique). A consumer inserting this row
/// must treat a unique-key conflict on either key as success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRow {
    pub prefix: String,
    pub counter: i64,
    pub full_number: String,
    pub message_id: Uuid,
    pub generated_by: String,
    pub client_id: String,
    pub correlation_id: Option<String>,
    pub batch_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl From<&AuditEvent> for AuditRow {
    fn from(ev: &AuditEvent) -> Self {
        Self {
            prefix: ev.prefix.clone(),
            counter: ev.counter,
            full_number: ev.full_number.clone(),
            message_id: ev.message_id,
            generated_by: ev.generated_by.clone(),
            client_id: ev.client_id.clone(),
            correlation_id: ev.correlation_id.clone(),
            batch_id: ev.batch_id,
            generated_at: ev.generated_at,
            recorded_at: Utc::now(),
        }
    }
}

/// Per-prefix high-water mark the Reconciler has confirmed durable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub prefix: String,
    pub last_counter_synced: i64,
    pub synced_at: DateTime<Utc>,
    pub synced_by: String,
}

/// Append-only record of an administrative reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetLog {
    pub reset_id: Uuid,
    pub prefix: String,
    pub old_value: i64,
    pub new_value: i64,
    pub reason: String,
    pub admin_user: String,
    pub reset_at: DateTime<Utc>,
}

/// Outcome of a single `issue_batch` call — the shared `batch_id` plus
/// every minted `IssuedID`, in counter order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedBatch {
    pub batch_id: Uuid,
    pub ids: Vec<IssuedID>,
}

/// Response shape for the `Status(prefix)` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixStatus {
    pub prefix: String,
    pub current: i64,
    pub next: i64,
    pub store_health: Vec<ComponentHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub component: String,
    pub healthy: bool,
    pub detail: Option<String>,
}

/// Response shape for `HealthCheck()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub overall: bool,
    pub components: Vec<ComponentHealth>,
}

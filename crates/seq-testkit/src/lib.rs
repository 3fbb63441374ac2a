//! In-memory fakes for the two external stores the core crates depend
//! on (`CounterStore`, the audit store), so end-to-end scenario tests
//! run without a live Redis or Postgres instance.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use seq_counter::CounterStore;
use seq_db::AuditStore;
use seq_schemas::{AuditEvent, AuditRow, SeqError, SeqResult, MAX_BATCH};
use uuid::Uuid;

/// In-memory `CounterStore`. Not safe to share across processes; intended
/// only for tests that would otherwise need a live Redis.
#[derive(Default)]
pub struct InMemoryCounterStore {
    values: Mutex<HashMap<String, i64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn advance(&self, prefix: &str) -> SeqResult<i64> {
        self.advance_by(prefix, 1).await
    }

    async fn advance_by(&self, prefix: &str, k: u32) -> SeqResult<i64> {
        if k == 0 || k > MAX_BATCH {
            return Err(SeqError::invalid(format!(
                "advance_by batch size {k} out of range [1, {MAX_BATCH}]"
            )));
        }
        let mut values = self.values.lock().unwrap();
        let entry = values.entry(prefix.to_string()).or_insert(0);
        *entry += k as i64;
        Ok(*entry)
    }

    async fn read(&self, prefix: &str) -> SeqResult<i64> {
        Ok(*self.values.lock().unwrap().get(prefix).unwrap_or(&0))
    }

    async fn reset(&self, prefix: &str, v: i64) -> SeqResult<i64> {
        let mut values = self.values.lock().unwrap();
        let old = values.insert(prefix.to_string(), v).unwrap_or(0);
        Ok(old)
    }
}

/// In-memory audit store. Mirrors the idempotency contract `seq-db`'s
/// `insert_audit_row` implements against Postgres: a conflict on either
/// `(prefix, counter)` or `message_id` is a no-op.
#[derive(Default)]
pub struct InMemoryAuditStore {
    rows: Mutex<Vec<AuditRow>>,
    seen_keys: Mutex<HashSet<(String, i64)>>,
    seen_ids: Mutex<HashSet<Uuid>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call inserted the row, `false` if a row with
    /// the same `(prefix, counter)` or `message_id` already existed.
    pub fn insert(&self, row: AuditRow) -> bool {
        let key = (row.prefix.clone(), row.counter);
        let mut seen_keys = self.seen_keys.lock().unwrap();
        let mut seen_ids = self.seen_ids.lock().unwrap();
        if !seen_keys.insert(key) || !seen_ids.insert(row.message_id) {
            return false;
        }
        self.rows.lock().unwrap().push(row);
        true
    }

    pub fn max_counter(&self, prefix: &str) -> i64 {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.prefix == prefix)
            .map(|r| r.counter)
            .max()
            .unwrap_or(0)
    }

    pub fn count_for_prefix(&self, prefix: &str) -> usize {
        self.rows.lock().unwrap().iter().filter(|r| r.prefix == prefix).count()
    }

    pub fn rows_for_prefix(&self, prefix: &str) -> Vec<AuditRow> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.prefix == prefix)
            .cloned()
            .collect()
    }
}

/// Bypasses the queue entirely: a fake publish inserts the `AuditRow`
/// synchronously, since there's no separate consumer stage to drive in
/// memory.
#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn publish(&self, event: &AuditEvent) -> SeqResult<()> {
        self.insert(AuditRow::from(event));
        Ok(())
    }
}

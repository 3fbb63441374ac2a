//! Shared helper for scenario tests: builds a real `Issuer` wired against
//! the in-memory store fakes, so these tests exercise the production
//! issuance path rather than a hand-rolled reimplementation of it.

use std::sync::Arc;

use chrono::Utc;
use seq_issuer::Issuer;
use seq_schemas::{PrefixConfig, ResetRule};
use seq_testkit::{InMemoryAuditStore, InMemoryCounterStore};
use sqlx::postgres::PgPoolOptions;

pub fn cfg(prefix: &str, padding_length: u32, template: &str) -> PrefixConfig {
    PrefixConfig {
        prefix: prefix.to_string(),
        padding_length,
        format_template: template.to_string(),
        reset_rule: ResetRule::Never,
        last_reset_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        updated_by: "test".to_string(),
    }
}

/// Builds an `Issuer` against in-memory store fakes plus a lazily
/// connecting Postgres pool, with `config` preloaded into the Issuer's
/// cache so `issue`/`issue_batch` never need to reach that pool.
pub async fn issuer_for(
    config: &PrefixConfig,
) -> (Issuer, Arc<InMemoryCounterStore>, Arc<InMemoryAuditStore>) {
    let counter = Arc::new(InMemoryCounterStore::new());
    let audit = Arc::new(InMemoryAuditStore::new());
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://unused-in-tests/unused")
        .expect("lazy pool construction never touches the network");

    let issuer = Issuer::new(pool, counter.clone(), audit.clone());
    issuer.preload_config(config.clone()).await;

    (issuer, counter, audit)
}

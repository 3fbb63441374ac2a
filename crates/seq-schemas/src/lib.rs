//! Shared data transfer objects and error taxonomy for the sequential
//! identifier issuance and audit service.
//!
//! This crate has no IO of its own — every other `seq-*` crate depends
//! on it for the types that cross a seam (counter store, audit store,
//! HTTP, CLI).

pub mod config;
pub mod error;
pub mod events;

pub use config::{parse_template_shape, PrefixConfig, ResetRule, TemplateShape};
pub use error::{SeqError, SeqResult};
pub use events::{
    AuditEvent, AuditRow, Checkpoint, ComponentHealth, HealthCheck, IssuedBatch, IssuedID,
    PrefixStatus, ResetLog,
};

/// `advance_by` accepts batch sizes in `[1, MAX_BATCH]`.
pub const MAX_BATCH: u32 = 1000;

/// Default consumer retry budget before a message is dead-lettered.
pub const RETRY_LIMIT: i32 = 3;

/// Default consumer prefetch / claim batch size.
pub const DEFAULT_PREFETCH: i64 = 10;

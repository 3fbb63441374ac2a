//! seq-counter
//!
//! The Counter Engine: atomically advances and reads per-prefix counters
//! against a fast, remote, single-writer-per-key integer store, backed
//! here by Redis.

mod redis_store;
mod store;

pub use redis_store::RedisCounterStore;
pub use store::CounterStore;

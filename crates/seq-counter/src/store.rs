use async_trait::async_trait;
use seq_schemas::{SeqError, SeqResult, MAX_BATCH};

/// The Counter Engine seam. Implemented against Redis in
/// this crate (`RedisCounterStore`); an in-memory fake lives in
/// `seq-testkit` so the rest of the workspace can be exercised without a
/// live Redis instance.
///
/// All uniqueness and monotonicity guarantees within a reset epoch rest
/// on the atomicity of `advance`/`advance_by` — implementations must
/// never fall back to client-side read-then-write arithmetic.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically add 1 to `seq:<prefix>`, returning the new value.
    async fn advance(&self, prefix: &str) -> SeqResult<i64>;

    /// Atomically add `k` to `seq:<prefix>`, returning the new value. The
    /// issued range is `[n_end-k+1, n_end]`.
    async fn advance_by(&self, prefix: &str, k: u32) -> SeqResult<i64>;

    /// Current value of `seq:<prefix>`; `0` if the key is absent.
    async fn read(&self, prefix: &str) -> SeqResult<i64>;

    /// Atomically read the current value and set it to `v`, returning the
    /// prior value.
    async fn reset(&self, prefix: &str, v: i64) -> SeqResult<i64>;
}

pub(crate) fn validate_batch(k: u32) -> SeqResult<()> {
    if k == 0 || k > MAX_BATCH {
        return Err(SeqError::InvalidRequest(format!(
            "advance_by batch size {k} out of range [1, {MAX_BATCH}]"
        )));
    }
    Ok(())
}

pub(crate) fn key_for(prefix: &str) -> String {
    format!("seq:{prefix}")
}

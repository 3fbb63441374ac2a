use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use seq_schemas::{SeqError, SeqResult};
use tracing::{debug, warn};

use crate::store::{key_for, validate_batch, CounterStore};

/// Per-call timeout budget for a single `advance`/`read` round trip.
const ADVANCE_TIMEOUT: Duration = Duration::from_millis(100);
/// `reset` does a read-then-set round trip server-side; give it a little
/// more room than a plain `INCRBY`.
const RESET_TIMEOUT: Duration = Duration::from_millis(200);

/// Atomic "get old value, set new value" — avoids the client-side
/// WATCH/MULTI/EXEC race a naive GET-then-SET would have under concurrent
/// resets.
const RESET_SCRIPT: &str = r#"
local old = redis.call('GET', KEYS[1])
redis.call('SET', KEYS[1], ARGV[1])
if old then
    return tonumber(old)
else
    return 0
end
"#;

/// Redis-backed `CounterStore`. Connects via `ConnectionManager`, which
/// transparently reconnects on failure, so callers only see
/// `SeqError::Transient` rather than a dropped-connection panic.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    reset_script: Arc<Script>,
}

impl RedisCounterStore {
    pub async fn connect(redis_url: &str) -> SeqResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| SeqError::transient(format!("invalid redis url: {e}")))?;
        let conn = client.get_connection_manager().await?;
        debug!("connected to counter store");
        Ok(Self {
            conn,
            reset_script: Arc::new(Script::new(RESET_SCRIPT)),
        })
    }

    async fn with_timeout<F, T>(dur: Duration, fut: F) -> SeqResult<T>
    where
        F: std::future::Future<Output = SeqResult<T>>,
    {
        tokio::time::timeout(dur, fut).await.map_err(|e| {
            warn!("counter store call timed out");
            SeqError::from(e)
        })?
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn advance(&self, prefix: &str) -> SeqResult<i64> {
        self.advance_by(prefix, 1).await
    }

    async fn advance_by(&self, prefix: &str, k: u32) -> SeqResult<i64> {
        validate_batch(k)?;
        let mut conn = self.conn.clone();
        let key = key_for(prefix);
        Self::with_timeout(ADVANCE_TIMEOUT, async move {
            let n: i64 = conn.incr(&key, k as i64).await?;
            Ok(n)
        })
        .await
    }

    async fn read(&self, prefix: &str) -> SeqResult<i64> {
        let mut conn = self.conn.clone();
        let key = key_for(prefix);
        Self::with_timeout(ADVANCE_TIMEOUT, async move {
            let n: Option<i64> = conn.get(&key).await?;
            Ok(n.unwrap_or(0))
        })
        .await
    }

    async fn reset(&self, prefix: &str, v: i64) -> SeqResult<i64> {
        let mut conn = self.conn.clone();
        let key = key_for(prefix);
        let script = self.reset_script.clone();
        Self::with_timeout(RESET_TIMEOUT, async move {
            let old: i64 = script.key(&key).arg(v).invoke_async(&mut conn).await?;
            Ok(old)
        })
        .await
    }
}

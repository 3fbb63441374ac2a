//! Service-level configuration: environment variables with documented
//! defaults, fail-fast when a required var is missing or unparseable.
//! Mirrors the `ENV_DB_URL`-constant idiom `seq-db` and the daemon already
//! use, rather than introducing a file-based config layer for this.
//!
//! `PrefixConfig` (per-prefix padding/template/reset-rule) is a separate,
//! database-backed concern that lives in `seq-db` and is reached only
//! through the admin `GetConfig`/`UpdateConfig` operations.

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const ENV_DAEMON_ADDR: &str = "SEQ_DAEMON_ADDR";
pub const ENV_REDIS_URL: &str = "SEQ_REDIS_URL";
pub const ENV_CONSUMER_CONCURRENCY: &str = "SEQ_CONSUMER_CONCURRENCY";
pub const ENV_CONSUMER_BATCH_SIZE: &str = "SEQ_CONSUMER_BATCH_SIZE";
pub const ENV_CONSUMER_VISIBILITY_SECS: &str = "SEQ_CONSUMER_VISIBILITY_SECS";
pub const ENV_CONSUMER_RETRY_LIMIT: &str = "SEQ_CONSUMER_RETRY_LIMIT";

const DEFAULT_DAEMON_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8899);
const DEFAULT_CONSUMER_CONCURRENCY: usize = 4;
const DEFAULT_CONSUMER_BATCH_SIZE: i64 = seq_schemas::DEFAULT_PREFETCH;
const DEFAULT_CONSUMER_VISIBILITY_SECS: i64 = 30;
const DEFAULT_CONSUMER_RETRY_LIMIT: i32 = seq_schemas::RETRY_LIMIT;

/// Process-wide configuration for whichever binary is running
/// (`seq-daemon`, `seq-consumer`, or `seq-cli`). Each binary only reads
/// the fields it needs.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub daemon_addr: SocketAddr,
    pub redis_url: String,
    pub consumer_concurrency: usize,
    pub consumer_batch_size: i64,
    pub consumer_visibility_secs: i64,
    pub consumer_retry_limit: i32,
}

impl ServiceConfig {
    /// Load from the process environment. `redis_url` is the only field
    /// without a usable default — everything else falls back silently so a
    /// bare `seq-daemon` / `seq-consumer` invocation works out of the box
    /// against a local Redis and Postgres.
    pub fn from_env() -> Result<Self> {
        let daemon_addr = match std::env::var(ENV_DAEMON_ADDR) {
            Ok(v) => v
                .parse()
                .with_context(|| format!("{ENV_DAEMON_ADDR} is not a valid socket address: {v}"))?,
            Err(_) => SocketAddr::from(DEFAULT_DAEMON_ADDR),
        };

        let redis_url = std::env::var(ENV_REDIS_URL)
            .with_context(|| format!("missing env var {ENV_REDIS_URL}"))?;

        let consumer_concurrency = parse_env_or(ENV_CONSUMER_CONCURRENCY, DEFAULT_CONSUMER_CONCURRENCY)?;
        let consumer_batch_size = parse_env_or(ENV_CONSUMER_BATCH_SIZE, DEFAULT_CONSUMER_BATCH_SIZE)?;
        let consumer_visibility_secs =
            parse_env_or(ENV_CONSUMER_VISIBILITY_SECS, DEFAULT_CONSUMER_VISIBILITY_SECS)?;
        let consumer_retry_limit = parse_env_or(ENV_CONSUMER_RETRY_LIMIT, DEFAULT_CONSUMER_RETRY_LIMIT)?;

        Ok(Self {
            daemon_addr,
            redis_url,
            consumer_concurrency,
            consumer_batch_size,
            consumer_visibility_secs,
            consumer_retry_limit,
        })
    }
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is not valid: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment-variable mutation must be serialized across tests in
    // this module, since std::env is process-global.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_all() {
        for k in [
            ENV_DAEMON_ADDR,
            ENV_REDIS_URL,
            ENV_CONSUMER_CONCURRENCY,
            ENV_CONSUMER_BATCH_SIZE,
            ENV_CONSUMER_VISIBILITY_SECS,
            ENV_CONSUMER_RETRY_LIMIT,
        ] {
            std::env::remove_var(k);
        }
    }

    #[test]
    fn missing_redis_url_fails_fast() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        let err = ServiceConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_REDIS_URL));
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        std::env::set_var(ENV_REDIS_URL, "redis://127.0.0.1:6379");
        let cfg = ServiceConfig::from_env().unwrap();
        assert_eq!(cfg.daemon_addr, SocketAddr::from(DEFAULT_DAEMON_ADDR));
        assert_eq!(cfg.consumer_concurrency, DEFAULT_CONSUMER_CONCURRENCY);
        assert_eq!(cfg.consumer_batch_size, DEFAULT_CONSUMER_BATCH_SIZE);
        clear_all();
    }

    #[test]
    fn explicit_vars_override_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        std::env::set_var(ENV_REDIS_URL, "redis://127.0.0.1:6379");
        std::env::set_var(ENV_CONSUMER_CONCURRENCY, "16");
        std::env::set_var(ENV_DAEMON_ADDR, "0.0.0.0:9000");
        let cfg = ServiceConfig::from_env().unwrap();
        assert_eq!(cfg.consumer_concurrency, 16);
        assert_eq!(cfg.daemon_addr, "0.0.0.0:9000".parse().unwrap());
        clear_all();
    }
}

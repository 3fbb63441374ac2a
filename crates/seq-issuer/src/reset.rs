use seq_schemas::{SeqError, SeqResult};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use seq_counter::CounterStore;

#[derive(Debug, Clone, Copy)]
pub struct ResetOutcome {
    pub old: i64,
    pub new: i64,
}

/// Replace a prefix's counter with an administrator-supplied value,
/// rejecting the change unless it moves the counter forward or `force`
/// is set.
///
/// On counter-store failure, `ResetLog` is never written. A `ResetLog` or
/// checkpoint write failure *after* the counter has already been replaced
/// is logged as a warning but never unwinds the counter or fails the
/// call — the reset did occur, and the caller still gets back the
/// `ResetOutcome` and `reset_id` for the change that happened.
pub async fn reset(
    pool: &PgPool,
    counter: &dyn CounterStore,
    prefix: &str,
    set_to: i64,
    reason: &str,
    admin_user: &str,
    force: bool,
) -> SeqResult<(ResetOutcome, Uuid)> {
    validate_inputs(set_to, reason, admin_user)?;

    let current = counter.read(prefix).await?;
    if !force && set_to <= current {
        return Err(SeqError::UnsafeReset {
            current,
            requested: set_to,
        });
    }

    let old = counter.reset(prefix, set_to).await?;
    let reset_id = Uuid::new_v4();

    if let Err(e) = seq_db::append_reset_log(pool, reset_id, prefix, old, set_to, reason, admin_user).await {
        warn!(prefix = %prefix, reset_id = %reset_id, error = %e, "reset log write failed after counter replacement");
    }
    if let Err(e) = seq_db::upsert_checkpoint(pool, prefix, set_to, admin_user).await {
        warn!(prefix = %prefix, reset_id = %reset_id, error = %e, "checkpoint write failed after counter replacement");
    }

    Ok((ResetOutcome { old, new: set_to }, reset_id))
}

fn validate_inputs(set_to: i64, reason: &str, admin_user: &str) -> SeqResult<()> {
    if set_to < 0 {
        return Err(SeqError::invalid("set_to must be >= 0"));
    }
    if reason.trim().is_empty() {
        return Err(SeqError::invalid("reason must not be empty"));
    }
    if admin_user.trim().is_empty() {
        return Err(SeqError::invalid("admin_user must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_set_to_is_rejected() {
        assert!(matches!(
            validate_inputs(-1, "why", "admin"),
            Err(SeqError::InvalidRequest(_))
        ));
    }

    #[test]
    fn empty_reason_is_rejected() {
        assert!(matches!(
            validate_inputs(0, "", "admin"),
            Err(SeqError::InvalidRequest(_))
        ));
    }

    #[test]
    fn empty_admin_user_is_rejected() {
        assert!(matches!(
            validate_inputs(0, "why", ""),
            Err(SeqError::InvalidRequest(_))
        ));
    }

    #[test]
    fn valid_inputs_pass() {
        assert!(validate_inputs(5, "why", "admin").is_ok());
    }
}

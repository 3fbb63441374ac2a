use chrono::Utc;
use seq_schemas::{PrefixConfig, ResetRule, SeqError, SeqResult};
use sqlx::{PgPool, Row};

fn reset_rule_to_str(r: ResetRule) -> &'static str {
    match r {
        ResetRule::Never => "never",
        ResetRule::Daily => "daily",
        ResetRule::Monthly => "monthly",
        ResetRule::Yearly => "yearly",
    }
}

fn reset_rule_from_str(s: &str) -> ResetRule {
    match s {
        "daily" => ResetRule::Daily,
        "monthly" => ResetRule::Monthly,
        "yearly" => ResetRule::Yearly,
        _ => ResetRule::Never,
    }
}

fn row_to_config(row: &sqlx::postgres::PgRow) -> sqlx::Result<PrefixConfig> {
    let reset_rule: String = row.try_get("reset_rule")?;
    Ok(PrefixConfig {
        prefix: row.try_get("prefix")?,
        padding_length: row.try_get::<i32, _>("padding_length")? as u32,
        format_template: row.try_get("format_template")?,
        reset_rule: reset_rule_from_str(&reset_rule),
        last_reset_at: row.try_get("last_reset_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        updated_by: row.try_get("updated_by")?,
    })
}

/// All configured prefixes, in no particular order. Used at daemon
/// startup to decide which prefixes to reconcile.
pub async fn list_prefixes(pool: &PgPool) -> SeqResult<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(r#"select prefix from seq_config"#)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(p,)| p).collect())
}

/// `GetConfig(prefix)`. Returns `None` if the prefix has never been
/// configured.
pub async fn get_config(pool: &PgPool, prefix: &str) -> SeqResult<Option<PrefixConfig>> {
    let row = sqlx::query(
        r#"
        select prefix, padding_length, format_template, reset_rule,
               last_reset_at, created_at, updated_at, updated_by
        from seq_config
        where prefix = $1
        "#,
    )
    .bind(prefix)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_config).transpose().map_err(SeqError::from)
}

/// `GetConfig(prefix)`, failing with `UnknownPrefix` instead of `None`.
/// This is the lookup the Issuer uses on the hot path.
pub async fn require_config(pool: &PgPool, prefix: &str) -> SeqResult<PrefixConfig> {
    get_config(pool, prefix)
        .await?
        .ok_or_else(|| SeqError::UnknownPrefix(prefix.to_string()))
}

/// A partial update for `UpdateConfig`; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub padding_length: Option<u32>,
    pub format_template: Option<String>,
    pub reset_rule: Option<ResetRule>,
}

/// `UpdateConfig(prefix, partial_config, admin_user, create_if_missing)`.
/// Validates the resulting template before committing, and records a
/// `seq_config_audit` row describing the change.
pub async fn update_config(
    pool: &PgPool,
    prefix: &str,
    patch: ConfigPatch,
    admin_user: &str,
    create_if_missing: bool,
) -> SeqResult<PrefixConfig> {
    if admin_user.trim().is_empty() {
        return Err(SeqError::invalid("admin_user must not be empty"));
    }

    let mut tx = pool.begin().await?;

    let existing = sqlx::query(
        r#"
        select prefix, padding_length, format_template, reset_rule,
               last_reset_at, created_at, updated_at, updated_by
        from seq_config where prefix = $1 for update
        "#,
    )
    .bind(prefix)
    .fetch_optional(&mut *tx)
    .await?
    .as_ref()
    .map(row_to_config)
    .transpose()?;

    if existing.is_none() && !create_if_missing {
        return Err(SeqError::UnknownPrefix(prefix.to_string()));
    }

    let padding_length = patch
        .padding_length
        .or_else(|| existing.as_ref().map(|c| c.padding_length))
        .ok_or_else(|| SeqError::invalid("padding_length required to create a new prefix"))?;
    let format_template = patch
        .format_template
        .clone()
        .or_else(|| existing.as_ref().map(|c| c.format_template.clone()))
        .ok_or_else(|| SeqError::invalid("format_template required to create a new prefix"))?;
    let reset_rule = patch
        .reset_rule
        .or_else(|| existing.as_ref().map(|c| c.reset_rule))
        .unwrap_or(ResetRule::Never);

    // Reject templates with no integer placeholder before committing.
    seq_schemas::parse_template_shape(&format_template, padding_length as usize)?;

    let now = Utc::now();
    let row = sqlx::query(
        r#"
        insert into seq_config (prefix, padding_length, format_template, reset_rule, updated_at, updated_by, created_at)
        values ($1, $2, $3, $4, $5, $6, $5)
        on conflict (prefix) do update
            set padding_length  = excluded.padding_length,
                format_template = excluded.format_template,
                reset_rule      = excluded.reset_rule,
                updated_at      = excluded.updated_at,
                updated_by      = excluded.updated_by
        returning prefix, padding_length, format_template, reset_rule,
                  last_reset_at, created_at, updated_at, updated_by
        "#,
    )
    .bind(prefix)
    .bind(padding_length as i32)
    .bind(&format_template)
    .bind(reset_rule_to_str(reset_rule))
    .bind(now)
    .bind(admin_user)
    .fetch_one(&mut *tx)
    .await?;

    let updated = row_to_config(&row)?;

    let diff = serde_json::json!({
        "before": existing,
        "after": &updated,
    });
    sqlx::query(
        r#"insert into seq_config_audit (prefix, changed_by, diff_json) values ($1, $2, $3)"#,
    )
    .bind(prefix)
    .bind(admin_user)
    .bind(diff)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_rule_round_trips() {
        for r in [ResetRule::Never, ResetRule::Daily, ResetRule::Monthly, ResetRule::Yearly] {
            assert_eq!(reset_rule_from_str(reset_rule_to_str(r)), r);
        }
    }
}

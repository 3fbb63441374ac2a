//! Operator CLI for the sequential identifier issuance and audit service.
//!
//! Thin wrapper over the same core crates `seq-daemon` uses: every
//! subcommand connects directly to Postgres/Redis and calls into
//! `seq-db`/`seq-counter`/`seq-issuer`/`seq-reconcile` rather than talking
//! to a running daemon over HTTP.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use seq_counter::{CounterStore, RedisCounterStore};
use seq_db::{AuditStore, PgAuditStore};
use seq_schemas::ResetRule;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "seq")]
#[command(about = "Sequential identifier issuance and audit service CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },
    /// Issue a single identifier
    Issue {
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        generated_by: String,
        #[arg(long)]
        correlation_id: Option<String>,
    },
    /// Issue a contiguous batch of identifiers
    IssueBatch {
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        count: u32,
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        generated_by: String,
        #[arg(long)]
        correlation_id: Option<String>,
    },
    /// Print current/next counter value and store health for a prefix
    Status {
        #[arg(long)]
        prefix: String,
    },
    /// Administrative counter reset
    Reset {
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        set_to: i64,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        admin_user: String,
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Reconcile one prefix, or every configured prefix with --all
    Reconcile {
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Per-prefix configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,
    Migrate,
}

#[derive(Subcommand)]
enum ConfigCmd {
    Get {
        #[arg(long)]
        prefix: String,
    },
    Update {
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        padding_length: Option<u32>,
        #[arg(long)]
        format_template: Option<String>,
        #[arg(long, value_enum)]
        reset_rule: Option<CliResetRule>,
        #[arg(long)]
        admin_user: String,
        #[arg(long, default_value_t = false)]
        create_if_missing: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliResetRule {
    Never,
    Daily,
    Monthly,
    Yearly,
}

impl From<CliResetRule> for ResetRule {
    fn from(r: CliResetRule) -> Self {
        match r {
            CliResetRule::Never => ResetRule::Never,
            CliResetRule::Daily => ResetRule::Daily,
            CliResetRule::Monthly => ResetRule::Monthly,
            CliResetRule::Yearly => ResetRule::Yearly,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Db { cmd } => {
            let pool = seq_db::connect_from_env().await?;
            match cmd {
                DbCmd::Status => {
                    let s = seq_db::status(&pool).await?;
                    println!("db_ok={} has_seq_config_table={}", s.ok, s.has_seq_config_table);
                }
                DbCmd::Migrate => {
                    seq_db::migrate(&pool).await?;
                    println!("migrations_applied=true");
                }
            }
        }

        Commands::Issue {
            prefix,
            client_id,
            generated_by,
            correlation_id,
        } => {
            let (pool, counter) = connect().await?;
            let audit: Arc<dyn AuditStore> = Arc::new(PgAuditStore::new(pool.clone()));
            let issuer = seq_issuer::Issuer::new(pool, counter, audit);
            let issued = issuer
                .issue(&prefix, &client_id, &generated_by, correlation_id)
                .await?;
            println!("counter={} full_number={} message_id={}", issued.counter, issued.full_number, issued.message_id);
        }

        Commands::IssueBatch {
            prefix,
            count,
            client_id,
            generated_by,
            correlation_id,
        } => {
            let (pool, counter) = connect().await?;
            let audit: Arc<dyn AuditStore> = Arc::new(PgAuditStore::new(pool.clone()));
            let issuer = seq_issuer::Issuer::new(pool, counter, audit);
            let batch = issuer
                .issue_batch(&prefix, count, &client_id, &generated_by, correlation_id)
                .await?;
            println!("batch_id={}", batch.batch_id);
            for id in &batch.ids {
                println!("counter={} full_number={}", id.counter, id.full_number);
            }
        }

        Commands::Status { prefix } => {
            let (pool, counter) = connect().await?;
            let status = seq_issuer::status(&pool, counter.as_ref(), &prefix).await?;
            println!("current={} next={}", status.current, status.next);
            for h in &status.store_health {
                println!("component={} healthy={} detail={:?}", h.component, h.healthy, h.detail);
            }
        }

        Commands::Reset {
            prefix,
            set_to,
            reason,
            admin_user,
            force,
        } => {
            let (pool, counter) = connect().await?;
            let (outcome, reset_id) =
                seq_issuer::reset(&pool, counter.as_ref(), &prefix, set_to, &reason, &admin_user, force).await?;
            println!("old={} new={} reset_id={}", outcome.old, outcome.new, reset_id);
        }

        Commands::Reconcile { prefix, all } => {
            let (pool, counter) = connect().await?;
            let prefixes = match (prefix, all) {
                (Some(p), _) => vec![p],
                (None, true) => seq_db::list_prefixes(&pool).await?,
                (None, false) => anyhow::bail!("provide --prefix or --all"),
            };
            let outcomes = seq_reconcile::reconcile_all(&pool, counter.as_ref(), &prefixes).await?;
            for (prefix, outcome) in outcomes {
                println!(
                    "prefix={} max_counter={} current={} repaired_to={:?}",
                    prefix, outcome.max_counter, outcome.current, outcome.repaired_to
                );
            }
        }

        Commands::Config { cmd } => match cmd {
            ConfigCmd::Get { prefix } => {
                let pool = seq_db::connect_from_env().await?;
                match seq_db::get_config(&pool, &prefix).await? {
                    Some(cfg) => println!("{}", serde_json::to_string_pretty(&cfg)?),
                    None => anyhow::bail!("unknown prefix: {prefix}"),
                }
            }
            ConfigCmd::Update {
                prefix,
                padding_length,
                format_template,
                reset_rule,
                admin_user,
                create_if_missing,
            } => {
                let pool = seq_db::connect_from_env().await?;
                let patch = seq_db::ConfigPatch {
                    padding_length,
                    format_template,
                    reset_rule: reset_rule.map(Into::into),
                };
                let cfg = seq_db::update_config(&pool, &prefix, patch, &admin_user, create_if_missing).await?;
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}

async fn connect() -> Result<(PgPool, std::sync::Arc<dyn CounterStore>)> {
    let pool = seq_db::connect_from_env().await?;
    let cfg = seq_config::ServiceConfig::from_env()?;
    let counter: std::sync::Arc<dyn CounterStore> = std::sync::Arc::new(RedisCounterStore::connect(&cfg.redis_url).await?);
    Ok((pool, counter))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

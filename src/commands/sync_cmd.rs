//! `catsync sync`: run one sync for a tenant.

use clap::Args;
use sqlx::SqlitePool;
use std::process::ExitCode;
use std::time::Duration;

use super::OutputFormat;
use catsync::config::Config;
use catsync::sync::{sync_if_enabled, GateOutcome};
use catsync::{ApiClient, CatRepository, FeatureFlags, SyncResult, SyncService};

/// Exit status for a sync the integration refused or could not serve.
const EXIT_SYNC_FAILED: u8 = 2;

/// Exit status when the feature flag is disabled and nothing ran.
const EXIT_SYNC_SKIPPED: u8 = 3;

#[derive(Args)]
pub struct SyncCommand {
    /// Tenant (company) identifier
    tenant_id: String,

    /// Seconds to wait for the integration API before giving up
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Run even when the cat_sync feature flag is disabled
    #[arg(long)]
    ignore_flag: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl SyncCommand {
    pub async fn run(
        &self,
        pool: &SqlitePool,
        config: &Config,
    ) -> Result<ExitCode, Box<dyn std::error::Error>> {
        let tenant_id = self.tenant_id.trim();
        if tenant_id.is_empty() {
            return Err("Tenant id cannot be empty".into());
        }

        let client = ApiClient::from_config(&config.remote)?;
        let deadline =
            Duration::from_secs(self.deadline_secs.unwrap_or(config.deadline_secs.value));
        let service = SyncService::new(client, CatRepository::new(pool.clone()));
        let flags = FeatureFlags::new(pool.clone());

        let outcome =
            sync_if_enabled(&service, &flags, tenant_id, deadline, self.ignore_flag).await?;

        if let OutputFormat::Json = self.format {
            println!("{}", serde_json::to_string_pretty(&outcome.to_json()?)?);
        }

        let result = match outcome {
            GateOutcome::Skipped { flag } => {
                if let OutputFormat::Text = self.format {
                    println!(
                        "Cat sync is disabled. Enable it with `catsync flag enable {}`.",
                        flag
                    );
                }
                return Ok(ExitCode::from(EXIT_SYNC_SKIPPED));
            }
            GateOutcome::Ran(result) => result,
        };

        if let OutputFormat::Text = self.format {
            match &result {
                SyncResult::Success { ids } => {
                    println!("Synced {} cat(s) for {}", ids.len(), tenant_id);
                }
                SyncResult::Failure { kind, message } => {
                    println!("Sync failed ({}): {}", kind, message);
                    if kind.is_retryable() {
                        println!("This failure is temporary; try again later.");
                    }
                }
            }
        }

        if result.is_success() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::from(EXIT_SYNC_FAILED))
        }
    }
}

//! Feature-flag gate in front of [`SyncService`].

use std::time::Duration;

use serde_json::{json, Value};

use super::result::SyncResult;
use super::service::{SyncError, SyncService};
use crate::db::FeatureFlags;
use crate::remote::CatSource;

/// Feature flag that must be enabled before cats are synced.
pub const SYNC_FEATURE_FLAG: &str = "cat_sync";

/// What happened to a gated sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The flag was disabled; nothing was fetched or written.
    Skipped { flag: String },
    Ran(SyncResult),
}

impl GateOutcome {
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            GateOutcome::Skipped { flag } => Ok(json!({"status": "skipped", "flag": flag})),
            GateOutcome::Ran(result) => serde_json::to_value(result),
        }
    }
}

/// Registers [`SYNC_FEATURE_FLAG`] if needed and syncs `tenant_id` only when
/// it is enabled or `ignore_flag` is set.
pub async fn sync_if_enabled<S: CatSource>(
    service: &SyncService<S>,
    flags: &FeatureFlags,
    tenant_id: &str,
    deadline: Duration,
    ignore_flag: bool,
) -> Result<GateOutcome, SyncError> {
    let enabled = flags.ensure(SYNC_FEATURE_FLAG).await?;

    if !enabled && !ignore_flag {
        tracing::info!(tenant_id, flag = SYNC_FEATURE_FLAG, "cat sync disabled, skipping");
        return Ok(GateOutcome::Skipped {
            flag: SYNC_FEATURE_FLAG.to_string(),
        });
    }

    let result = service.sync_with_deadline(tenant_id, deadline).await?;
    Ok(GateOutcome::Ran(result))
}

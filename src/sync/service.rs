use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::classify::classify;
use super::locks::TenantLocks;
use super::result::SyncResult;
use crate::config::DEFAULT_DEADLINE_SECS;
use crate::db::{CatRepository, FlagError, UpsertError};
use crate::remote::{ApiError, CatSource};
use crate::transform::transform_all;

/// Failures that are not the integration's fault and abort the run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("storage fault while writing cats: {0}")]
    Storage(#[from] UpsertError),

    #[error("cat write task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("feature flag lookup failed: {0}")]
    Flag(#[from] FlagError),
}

/// Stages of a single sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Fetching,
    Transforming,
    Upserting,
    Succeeded,
    Failed,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Fetching => write!(f, "fetching"),
            SyncPhase::Transforming => write!(f, "transforming"),
            SyncPhase::Upserting => write!(f, "upserting"),
            SyncPhase::Succeeded => write!(f, "succeeded"),
            SyncPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Pulls a tenant's cats from a [`CatSource`] and merges them into the
/// `cats` table.
///
/// Runs for the same tenant are serialized; runs for different tenants
/// proceed independently.
pub struct SyncService<S> {
    source: S,
    cats: CatRepository,
    locks: TenantLocks,
    deadline: Duration,
}

impl<S: CatSource> SyncService<S> {
    pub fn new(source: S, cats: CatRepository) -> Self {
        Self {
            source,
            cats,
            locks: TenantLocks::new(),
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
        }
    }

    /// Sets the default deadline for the fetch step.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Shares a lock registry with other services writing the same table, so
    /// a tenant is exclusive across all of them.
    pub fn with_locks(mut self, locks: TenantLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Syncs a tenant using the configured deadline.
    pub async fn sync(&self, tenant_id: &str) -> Result<SyncResult, SyncError> {
        self.sync_with_deadline(tenant_id, self.deadline).await
    }

    /// Syncs a tenant, giving the integration at most `deadline` to answer.
    ///
    /// Integration failures come back as `Ok(SyncResult::Failure)`. Storage
    /// faults are returned as `Err` and leave the table untouched.
    ///
    /// Once the write has started it runs to completion on its own task even
    /// if this future is dropped.
    pub async fn sync_with_deadline(
        &self,
        tenant_id: &str,
        deadline: Duration,
    ) -> Result<SyncResult, SyncError> {
        let guard = self.locks.acquire(tenant_id).await;
        let started = Instant::now();
        tracing::info!(tenant_id, phase = %SyncPhase::Fetching, "starting cat sync");

        let fetched = tokio::time::timeout(deadline, self.source.fetch_cats(tenant_id))
            .await
            .unwrap_or(Err(ApiError::Timeout));

        let remote = match fetched {
            Ok(remote) => remote,
            Err(err) => {
                let (kind, message) = classify(&err);
                tracing::warn!(
                    tenant_id,
                    phase = %SyncPhase::Failed,
                    %kind,
                    error = %err,
                    "cat sync failed"
                );
                return Ok(SyncResult::failure(kind, message));
            }
        };

        tracing::debug!(tenant_id, phase = %SyncPhase::Transforming, records = remote.len());
        let batch = transform_all(&remote);

        tracing::debug!(tenant_id, phase = %SyncPhase::Upserting, records = batch.len());
        let cats = self.cats.clone();
        let write = tokio::spawn(async move {
            // The tenant stays locked until the write is finished.
            let _guard = guard;
            cats.upsert(&batch).await
        });

        match write.await? {
            Ok(ids) => {
                tracing::info!(
                    tenant_id,
                    phase = %SyncPhase::Succeeded,
                    written = ids.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "cat sync finished"
                );
                Ok(SyncResult::success(ids))
            }
            Err(err) => {
                tracing::error!(
                    tenant_id,
                    phase = %SyncPhase::Failed,
                    error = %err,
                    "cat sync aborted by storage fault"
                );
                Err(SyncError::Storage(err))
            }
        }
    }
}

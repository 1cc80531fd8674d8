//! Cat synchronization: fetch from the integration, transform, upsert.
//!
//! [`SyncService`] drives a run and reports it as a [`SyncResult`].
//! Integration failures are classified into an [`ErrorKind`]; storage faults
//! escape as [`SyncError`].

mod classify;
mod gate;
mod locks;
mod result;
mod service;

pub use classify::{classify, SERVICE_UNAVAILABLE_MESSAGE, TIMEOUT_MESSAGE};
pub use gate::{sync_if_enabled, GateOutcome, SYNC_FEATURE_FLAG};
pub use locks::{TenantGuard, TenantLocks};
pub use result::{ErrorKind, SyncResult};
pub use service::{SyncError, SyncPhase, SyncService};

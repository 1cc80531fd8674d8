//! One async mutex per tenant, so two syncs of the same tenant never overlap.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<Mutex<()>>>;

#[derive(Clone, Default)]
pub struct TenantLocks {
    locks: Arc<StdMutex<LockMap>>,
}

/// Held for the duration of a tenant's sync. Releasing the last guard for a
/// tenant drops its entry from the registry.
pub struct TenantGuard {
    tenant_id: String,
    lock: Arc<Mutex<()>>,
    locks: Arc<StdMutex<LockMap>>,
    _guard: OwnedMutexGuard<()>,
}

impl TenantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other sync holds `tenant_id`.
    pub async fn acquire(&self, tenant_id: &str) -> TenantGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(tenant_id.to_string()).or_default().clone()
        };

        let guard = lock.clone().lock_owned().await;

        TenantGuard {
            tenant_id: tenant_id.to_string(),
            lock,
            locks: self.locks.clone(),
            _guard: guard,
        }
    }

    /// Number of tenants that currently have a sync running or waiting.
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for TenantGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Registry entry, `self.lock` and the owned guard: nobody else is waiting.
        if Arc::strong_count(&self.lock) == 3 {
            locks.remove(&self.tenant_id);
        }
    }
}

//! Per-domain advisory locks
//!
//! Jobs for the same domain write the same per-domain files, so at most one
//! of them may run at a time. Jobs for different domains never contend.
//! A domain's entry is dropped from the table once no job holds or waits
//! for it, so a long-lived runner does not accumulate one lock per domain.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// One async lock per domain, created on first use
#[derive(Debug, Default)]
pub struct DomainLocks {
    locks: LockTable,
}

/// Holds a domain until dropped
#[derive(Debug)]
pub struct DomainGuard {
    guard: Option<OwnedMutexGuard<()>>,
    domain: String,
    locks: LockTable,
}

impl DomainLocks {
    /// Creates an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other job holds `domain`, then holds it
    ///
    /// The lock is released when the returned guard is dropped.
    pub async fn acquire(&self, domain: &str) -> DomainGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(domain.to_string()).or_default().clone()
        };

        let guard = match lock.clone().try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::info!("Waiting for the running job on {} to finish", domain);
                lock.lock_owned().await
            }
        };

        DomainGuard {
            guard: Some(guard),
            domain: domain.to_string(),
            locks: self.locks.clone(),
        }
    }
}

impl Drop for DomainGuard {
    fn drop(&mut self) {
        // Table lock first: nobody can clone the entry between release and removal
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();

        let unused = locks
            .get(&self.domain)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if unused {
            locks.remove(&self.domain);
        }
    }
}

#[cfg(test)]
impl DomainLocks {
    fn is_held(&self, domain: &str) -> bool {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .get(domain)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

//! Per-subject mutual exclusion
//!
//! Each subject gets its own async mutex, created on first use. Holding a
//! [`SubjectGuard`] gives exclusive access to that subject's balance; other
//! subjects are unaffected.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::entities::account::SubjectId;
use crate::errors::{DomainError, DomainResult, LedgerError};

/// Map size above which idle entries are pruned on acquisition
const PRUNE_THRESHOLD: usize = 1024;

/// Exclusive access to one subject, released on drop
pub struct SubjectGuard {
    subject: SubjectId,
    _guard: OwnedMutexGuard<()>,
}

impl SubjectGuard {
    pub fn subject(&self) -> SubjectId {
        self.subject
    }
}

/// Registry of per-subject locks
#[derive(Default)]
pub struct SubjectLocks {
    locks: Mutex<HashMap<SubjectId, Arc<AsyncMutex<()>>>>,
}

impl SubjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits at most `timeout` for exclusive access to `subject`
    ///
    /// # Returns
    /// * `Ok(SubjectGuard)` - Access granted until the guard is dropped
    /// * `Err(LedgerError::ConcurrencyConflict)` - The wait timed out
    pub async fn acquire(&self, subject: SubjectId, timeout: Duration) -> DomainResult<SubjectGuard> {
        let lock = self.lock_for(subject)?;

        let guard = tokio::time::timeout(timeout, lock.lock_owned())
            .await
            .map_err(|_| LedgerError::ConcurrencyConflict)?;

        Ok(SubjectGuard {
            subject,
            _guard: guard,
        })
    }

    fn lock_for(&self, subject: SubjectId) -> DomainResult<Arc<AsyncMutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| DomainError::Internal {
            message: "subject lock registry poisoned".to_string(),
        })?;

        if locks.len() > PRUNE_THRESHOLD {
            // Only the map holds these, so nobody waits on or holds them
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }

        Ok(locks.entry(subject).or_default().clone())
    }

    /// Number of subjects with a registered lock
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_acquire_times_out_while_held() {
        let locks = SubjectLocks::new();
        let subject = SubjectId::new(1);

        let guard = locks.acquire(subject, Duration::from_millis(50)).await.unwrap();
        assert_eq!(guard.subject(), subject);

        let second = locks.acquire(subject, Duration::from_millis(20)).await;
        assert_eq!(
            second.err(),
            Some(DomainError::Ledger(LedgerError::ConcurrencyConflict))
        );

        drop(guard);
        assert!(locks.acquire(subject, Duration::from_millis(20)).await.is_ok());
    }

    #[tokio::test]
    async fn test_different_subjects_do_not_contend() {
        let locks = SubjectLocks::new();

        let _a = locks.acquire(SubjectId::new(1), Duration::from_millis(20)).await.unwrap();
        let _b = locks.acquire(SubjectId::new(2), Duration::from_millis(20)).await.unwrap();
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_locks_are_pruned() {
        let locks = SubjectLocks::new();
        for id in 0..=(PRUNE_THRESHOLD as i64) {
            let _guard = locks.acquire(SubjectId::new(id), Duration::from_millis(20)).await.unwrap();
        }
        assert_eq!(locks.len(), PRUNE_THRESHOLD + 1);

        let _held = locks.acquire(SubjectId::new(-1), Duration::from_millis(20)).await.unwrap();
        assert_eq!(locks.len(), 1);
    }
}

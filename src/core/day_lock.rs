//! Per-employee-day critical section.
//!
//! The engine is invoked from several independent entry points (self-service
//! punch, kiosk punch, admin correction, lock sweep) that may race on the
//! same `(employee_id, work_date)`. Each key gets its own async mutex so at
//! most one recompute is in flight per employee-day while distinct
//! employee-days proceed fully in parallel.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed registry of employee-day mutexes.
#[derive(Debug, Default)]
pub struct DayLockRegistry {
    locks: Mutex<HashMap<(i64, NaiveDate), Arc<Mutex<()>>>>,
}

impl DayLockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the critical section for one employee-day, waiting if another
    /// recompute holds it. The guard releases on drop.
    pub async fn acquire(&self, employee_id: i64, work_date: NaiveDate) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Keep the registry bounded: entries nobody holds can be dropped.
            if locks.len() > 1024 {
                locks.retain(|_, l| Arc::strong_count(l) > 1);
            }
            Arc::clone(
                locks
                    .entry((employee_id, work_date))
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

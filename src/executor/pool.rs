/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Worker pools.
//!
//! A [`WorkerPool`] decides how dispatched units are scheduled. The
//! concurrent strategy only relies on one [`JoinHandle`] per submitted unit,
//! so the degree of concurrency can change without touching the collection
//! logic.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// A boxed unit of work, ready to be spawned.
pub type UnitFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Schedules units of work.
///
/// Must be called from within a Tokio runtime.
pub trait WorkerPool: Send + Sync + fmt::Debug {
    /// Submits one unit and returns the handle that settles when it
    /// finishes, panics or is aborted.
    fn submit(&self, unit: UnitFuture) -> JoinHandle<()>;

    /// Maximum units run at once, or `None` if unbounded.
    fn max_concurrency(&self) -> Option<usize> {
        None
    }
}

/// Spawns one task per unit with no limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnboundedPool;

impl WorkerPool for UnboundedPool {
    fn submit(&self, unit: UnitFuture) -> JoinHandle<()> {
        tokio::spawn(unit)
    }
}

/// Spawns one task per unit, letting at most `limit` of them run at once.
///
/// Units beyond the limit wait for a permit, so large batches queue
/// instead of flooding the runtime.
///
/// Only the number of units *running* is bounded. Every unit is still
/// spawned up front and owns its copy of the sequence while it waits, so a
/// batch of `n` sequences costs `n` parked tasks plus a full copy of the
/// batch in memory. A fixed set of `limit` workers pulling from a shared
/// queue would cap that too, at the price of a second channel and losing
/// the per-unit `JoinHandle` the completion barrier relies on.
///
/// # Examples
///
/// ```
/// use batchsort_rs::{BoundedPool, WorkerPool};
///
/// let pool = BoundedPool::new(4);
/// assert_eq!(pool.max_concurrency(), Some(4));
/// assert_eq!(BoundedPool::new(0).max_concurrency(), Some(1));
/// ```
#[derive(Clone)]
pub struct BoundedPool {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl BoundedPool {
    /// Creates a pool running at most `limit` units at once. Zero is treated
    /// as one.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Returns the number of permits currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl fmt::Debug for BoundedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedPool")
            .field("limit", &self.limit)
            .field("available", &self.available())
            .finish()
    }
}

impl WorkerPool for BoundedPool {
    fn submit(&self, unit: UnitFuture) -> JoinHandle<()> {
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            // The semaphore is never closed; a failed acquire runs unthrottled.
            let _permit = permits.acquire_owned().await.ok();
            unit.await;
        })
    }

    fn max_concurrency(&self) -> Option<usize> {
        Some(self.limit)
    }
}

/// Builds the pool matching a `max_concurrency` setting.
#[must_use]
pub fn from_limit(max_concurrency: Option<usize>) -> Arc<dyn WorkerPool> {
    match max_concurrency {
        Some(limit) => Arc::new(BoundedPool::new(limit)),
        None => Arc::new(UnboundedPool),
    }
}

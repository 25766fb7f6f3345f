/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Batch executor module.
//!
//! The [`BatchExecutor`] runs a batch of sequences under a [`Strategy`] and
//! returns an [`ExecutionResult`] pairing the sorted sequences with the
//! elapsed wall-clock time.
//!
//! # Strategies
//!
//! - [`Strategy::Sequential`]: units run one after another on the caller's
//!   task. Output order matches input order.
//! - [`Strategy::Concurrent`]: one task per unit, results collected through
//!   a completion channel in arrival order. Output order is **not**
//!   guaranteed to match input order.
//! - [`Strategy::ConcurrentOrdered`]: same fan-out, results written back to
//!   their input position.
//!
//! # Timing
//!
//! The clock starts immediately before the first unit is created and stops
//! immediately after the last result is appended to the output, for every
//! strategy.
//!
//! # Failures
//!
//! A unit that panics, under any strategy, is reported as
//! [`ExecutorError::UnitFailed`] once the rest of the batch has settled; it
//! never hangs the batch or unwinds into the caller. A configured
//! [`ExecutorConfig::batch_timeout`] cancels outstanding units and returns
//! [`ExecutorError::Timeout`]. Dropping a concurrent run before it completes
//! aborts its units.
//!
//! # Examples
//!
//! ```no_run
//! use batchsort_rs::{BatchExecutor, ExecutorConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = BatchExecutor::new(
//!     ExecutorConfig::default()
//!         .with_unit_delay(Duration::from_millis(100))
//!         .with_max_concurrency(64)
//!         .with_batch_timeout(Duration::from_secs(5)),
//! );
//!
//! let result = executor.run_concurrent(&[vec![3, 1, 2], vec![5, 4]]).await?;
//! assert_eq!(result.len(), 2);
//! println!("sorted in {} ns", result.time_ns());
//! # Ok(())
//! # }
//! ```

mod concurrent;
pub mod config;
pub mod error;
pub mod pool;
pub mod result;
mod sequential;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use config::ExecutorConfig;
pub use error::{ExecutorError, ParseStrategyError, UnitFailure};
pub use pool::{BoundedPool, UnboundedPool, UnitFuture, WorkerPool};
pub use result::ExecutionResult;
pub use strategy::Strategy;

use crate::unit::{FixedDelay, UnitSorter, WorkSimulator};
use crate::{Batch, Sequence};
use concurrent::ResultOrdering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Runs batches under the sequential or concurrent strategy.
///
/// The executor holds only immutable configuration and shared read-only
/// collaborators, so one instance can serve many batches at once.
#[derive(Debug)]
pub struct BatchExecutor<S = FixedDelay> {
    sorter: Arc<UnitSorter<S>>,
    pool: Arc<dyn WorkerPool>,
    config: ExecutorConfig,
}

impl<S> Clone for BatchExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            sorter: Arc::clone(&self.sorter),
            pool: Arc::clone(&self.pool),
            config: self.config.clone(),
        }
    }
}

impl BatchExecutor<FixedDelay> {
    /// Creates an executor whose units sleep for `config.unit_delay`.
    ///
    /// # Examples
    ///
    /// ```
    /// use batchsort_rs::{BatchExecutor, ExecutorConfig};
    ///
    /// let executor = BatchExecutor::new(ExecutorConfig::default());
    /// assert_eq!(executor.config().max_concurrency, None);
    /// ```
    #[must_use]
    pub fn new(config: ExecutorConfig) -> Self {
        let simulator = FixedDelay::new(config.unit_delay);
        Self::with_simulator(config, simulator)
    }
}

impl Default for BatchExecutor<FixedDelay> {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl<S: WorkSimulator> BatchExecutor<S> {
    /// Creates an executor running `simulator` once per unit.
    ///
    /// `config.unit_delay` is ignored; the simulator decides the per-unit
    /// work.
    #[must_use]
    pub fn with_simulator(config: ExecutorConfig, simulator: S) -> Self {
        Self {
            sorter: Arc::new(UnitSorter::new(simulator)),
            pool: pool::from_limit(config.max_concurrency),
            config,
        }
    }

    /// Replaces the worker pool used by the concurrent strategies.
    #[must_use]
    pub fn with_pool<P: WorkerPool + 'static>(mut self, pool: P) -> Self {
        self.pool = Arc::new(pool);
        self
    }

    /// Returns the executor configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Returns the shared unit sorter.
    #[must_use]
    pub fn sorter(&self) -> &UnitSorter<S> {
        &self.sorter
    }

    /// Returns the worker pool used by the concurrent strategies.
    #[must_use]
    pub fn pool(&self) -> &dyn WorkerPool {
        self.pool.as_ref()
    }

    /// Runs `batch` under `strategy`.
    ///
    /// # Errors
    ///
    /// See [`run_sequential`](Self::run_sequential) and
    /// [`run_concurrent`](Self::run_concurrent).
    pub async fn run(
        &self,
        strategy: Strategy,
        batch: &Batch,
    ) -> Result<ExecutionResult, ExecutorError> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", %batch_id, %strategy, size = batch.len());

        async move {
            info!("running batch");
            let start = Instant::now();

            let sorted = match strategy {
                Strategy::Sequential => {
                    sequential::run(self.sorter.as_ref(), batch, self.config.batch_timeout).await
                }
                Strategy::Concurrent => self.fan_out(batch, ResultOrdering::Arrival).await,
                Strategy::ConcurrentOrdered => self.fan_out(batch, ResultOrdering::Input).await,
            }?;

            let elapsed = start.elapsed();
            info!(?elapsed, "batch complete");
            Ok::<_, ExecutorError>(ExecutionResult::new(batch_id, strategy, sorted, elapsed))
        }
        .instrument(span)
        .await
    }

    /// Sorts every sequence one at a time, in input order, on the caller's
    /// task.
    ///
    /// # Errors
    ///
    /// - [`ExecutorError::UnitFailed`] if any unit panicked; the remaining
    ///   units still run
    /// - [`ExecutorError::Timeout`] if a batch timeout is configured and exceeded
    pub async fn run_sequential(&self, batch: &Batch) -> Result<ExecutionResult, ExecutorError> {
        self.run(Strategy::Sequential, batch).await
    }

    /// Sorts every sequence in its own task and collects results in arrival
    /// order.
    ///
    /// # Errors
    ///
    /// - [`ExecutorError::UnitFailed`] if any unit panicked
    /// - [`ExecutorError::Timeout`] if a batch timeout is configured and exceeded
    /// - [`ExecutorError::IncompleteBatch`] if the collector saw a report
    ///   count different from the batch size
    pub async fn run_concurrent(&self, batch: &Batch) -> Result<ExecutionResult, ExecutorError> {
        self.run(Strategy::Concurrent, batch).await
    }

    /// Like [`run_concurrent`](Self::run_concurrent), but results keep their
    /// input order.
    ///
    /// # Errors
    ///
    /// Same as [`run_concurrent`](Self::run_concurrent).
    pub async fn run_concurrent_ordered(
        &self,
        batch: &Batch,
    ) -> Result<ExecutionResult, ExecutorError> {
        self.run(Strategy::ConcurrentOrdered, batch).await
    }

    async fn fan_out(
        &self,
        batch: &Batch,
        ordering: ResultOrdering,
    ) -> Result<Vec<Sequence>, ExecutorError> {
        concurrent::run(
            &self.sorter,
            self.pool.as_ref(),
            batch,
            ordering,
            self.config.batch_timeout,
        )
        .await
    }
}

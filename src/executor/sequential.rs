/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Sequential strategy.
//!
//! Sorts every sequence in input order on the caller's task. Total latency
//! is the sum of the per-unit costs.
//!
//! A unit that panics is caught at the unit boundary and the remaining units
//! still run, so the batch settles the same way the concurrent strategy
//! does: [`ExecutorError::UnitFailed`] with the lowest failed index and the
//! number of failed units.

use super::concurrent::panic_message;
use super::error::{ExecutorError, UnitFailure};
use crate::unit::{UnitSorter, WorkSimulator};
use crate::{Batch, Sequence};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::warn;

/// Sorts `batch` one unit at a time, appending results in input order.
pub(super) async fn run<S: WorkSimulator>(
    sorter: &UnitSorter<S>,
    batch: &Batch,
    timeout: Option<Duration>,
) -> Result<Vec<Sequence>, ExecutorError> {
    let mut sorted = Vec::with_capacity(batch.len());
    let mut failures = Vec::new();
    let work = sort_in_order(sorter, batch, &mut sorted, &mut failures);

    match timeout {
        Some(limit) => {
            if tokio::time::timeout(limit, work).await.is_err() {
                warn!(completed = sorted.len(), total = batch.len(), "batch timed out");
                return Err(ExecutorError::Timeout {
                    timeout: limit,
                    completed: sorted.len(),
                    total: batch.len(),
                });
            }
        }
        None => work.await,
    }

    let failed_units = failures.len();
    match failures.into_iter().next() {
        Some((index, failure)) => Err(ExecutorError::UnitFailed {
            index,
            failure,
            failed_units,
        }),
        None => Ok(sorted),
    }
}

/// Runs every unit in input order. Failures are recorded in index order.
async fn sort_in_order<S: WorkSimulator>(
    sorter: &UnitSorter<S>,
    batch: &Batch,
    sorted: &mut Vec<Sequence>,
    failures: &mut Vec<(usize, UnitFailure)>,
) {
    for (index, sequence) in batch.iter().enumerate() {
        match AssertUnwindSafe(sorter.sort(sequence.clone()))
            .catch_unwind()
            .await
        {
            Ok(sequence) => sorted.push(sequence),
            Err(payload) => {
                let failure = UnitFailure::Panicked {
                    message: panic_message(payload.as_ref()),
                };
                warn!(index, %failure, "unit failed");
                failures.push((index, failure));
            }
        }
    }
}

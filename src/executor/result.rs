/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Execution result types.

use super::strategy::Strategy;
use crate::Sequence;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Sorted sequences of one batch paired with the time taken to produce them.
///
/// `sorted.len()` always equals the size of the submitted batch. Ordering
/// depends on [`strategy`](Self::strategy): see
/// [`Strategy::preserves_order`].
///
/// # Examples
///
/// ```
/// use batchsort_rs::{ExecutionResult, Strategy};
/// use std::time::Duration;
/// use uuid::Uuid;
///
/// let result = ExecutionResult::new(
///     Uuid::new_v4(),
///     Strategy::Sequential,
///     vec![vec![1, 2, 3]],
///     Duration::from_micros(5),
/// );
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.time_ns(), 5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Identifier of the batch run, used to correlate log events.
    pub batch_id: Uuid,

    /// Strategy the batch ran under.
    pub strategy: Strategy,

    /// Sorted sequences, one per input sequence.
    pub sorted: Vec<Sequence>,

    /// Time from the first dispatch to the last appended result.
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// Creates a new execution result.
    #[must_use]
    pub fn new(batch_id: Uuid, strategy: Strategy, sorted: Vec<Sequence>, elapsed: Duration) -> Self {
        Self {
            batch_id,
            strategy,
            sorted,
            elapsed,
        }
    }

    /// Returns the number of sorted sequences.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns `true` if the batch was empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Elapsed time in nanoseconds, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub fn time_ns(&self) -> u64 {
        u64::try_from(self.elapsed.as_nanos()).unwrap_or(u64::MAX)
    }

    /// Consumes the result, returning the sorted sequences.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Sequence> {
        self.sorted
    }
}

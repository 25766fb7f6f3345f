/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Executor error types.

use std::time::Duration;
use thiserror::Error;

/// Why a single dispatched unit did not report a sorted sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitFailure {
    /// The unit panicked while sorting or simulating work.
    #[error("unit panicked: {message}")]
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },

    /// The unit was aborted before it could report.
    #[error("unit was cancelled")]
    Cancelled,
}

/// Errors returned by the [`BatchExecutor`](super::BatchExecutor).
///
/// A failed batch never carries partial results: the caller either gets a
/// complete [`ExecutionResult`](super::ExecutionResult) or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// At least one unit failed. Reported only after every other unit of
    /// the batch has been accounted for.
    #[error("unit {index} failed ({failed_units} failed units in batch): {failure}")]
    UnitFailed {
        /// Input position of the lowest-indexed failed unit.
        index: usize,
        /// What happened to that unit.
        failure: UnitFailure,
        /// Total number of failed units in the batch.
        failed_units: usize,
    },

    /// The batch did not finish within the configured timeout.
    #[error("batch timed out after {timeout:?}: {completed} of {total} units completed")]
    Timeout {
        /// The configured batch timeout.
        timeout: Duration,
        /// Units that had reported a sorted sequence when the timeout fired.
        completed: usize,
        /// Units in the batch.
        total: usize,
    },

    /// The collector saw fewer (or more) reports than dispatched units.
    #[error("incomplete batch: expected {expected} results, received {received}")]
    IncompleteBatch {
        /// Units dispatched.
        expected: usize,
        /// Reports collected.
        received: usize,
    },
}

impl ExecutorError {
    /// Returns `true` if the error was caused by the batch timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Error returned when parsing an unknown [`Strategy`](super::Strategy) name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown execution strategy: {0}")]
pub struct ParseStrategyError(pub String);

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! The unit sorter.

use super::simulator::{FixedDelay, WorkSimulator};
use crate::Sequence;
use tracing::debug;

/// Sorts one sequence per call and runs the injected [`WorkSimulator`].
///
/// The sorter holds no mutable state; a single instance is shared (behind
/// an `Arc`) by every unit of a batch.
#[derive(Debug, Clone, Default)]
pub struct UnitSorter<S = FixedDelay> {
    simulator: S,
}

impl<S: WorkSimulator> UnitSorter<S> {
    /// Creates a sorter that runs `simulator` once per unit.
    #[must_use]
    pub fn new(simulator: S) -> Self {
        Self { simulator }
    }

    /// Returns the injected simulator.
    #[inline]
    #[must_use]
    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Sorts `sequence` into non-decreasing order, then simulates one unit
    /// of work.
    ///
    /// The sequence is taken by value: callers hand over an owned copy, so
    /// the result never aliases their input. Sorting a well-formed integer
    /// sequence cannot fail.
    pub async fn sort(&self, mut sequence: Sequence) -> Sequence {
        sequence.sort_unstable();
        self.simulator.simulate().await;
        debug!(len = sequence.len(), "unit sorted");
        sequence
    }
}

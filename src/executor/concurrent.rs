/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Concurrent fan-out/fan-in strategy.
//!
//! # Flow
//!
//! 1. A completion channel is created with one slot per unit, so no unit
//!    ever waits on a full channel.
//! 2. One unit is submitted to the [`WorkerPool`] per sequence. Each unit
//!    sorts its own copy and sends exactly one `UnitReport::Sorted`.
//! 3. A supervisor task owns the root sender and every unit's
//!    [`JoinHandle`]. The handle collection is the completion barrier: the
//!    supervisor awaits each handle, reports `UnitReport::Failed` on
//!    behalf of any unit that panicked or was aborted, and only then drops
//!    its sender. The channel is therefore closed exactly once, after the
//!    last producer is gone.
//! 4. The collector (the caller's task) drains the channel until it is
//!    closed, then checks that it saw one report per unit.
//!
//! If the `run` future is dropped before the channel closes (for example by
//! an outer `tokio::time::timeout`), an `AbortOnDrop` guard aborts every
//! outstanding unit, so an abandoned batch never keeps sorting in the
//! background.
//!
//! A unit sends its report as its final action, so a handle that resolves
//! `Ok` always belongs to a unit that reported, and a handle that resolves
//! `Err` belongs to one that did not. Every unit is reported exactly once.

use super::error::{ExecutorError, UnitFailure};
use super::pool::{UnitFuture, WorkerPool};
use crate::unit::{UnitSorter, WorkSimulator};
use crate::{Batch, Sequence};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tracing::{Instrument, debug, warn};

/// Where the collector places each arriving result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ResultOrdering {
    /// Append in arrival order.
    Arrival,
    /// Write into the slot of the input index.
    Input,
}

/// Message sent through the completion channel, one per unit.
#[derive(Debug)]
enum UnitReport {
    Sorted { index: usize, sequence: Sequence },
    Failed { index: usize, failure: UnitFailure },
}

/// Fans `batch` out to `pool` and collects the sorted results.
pub(super) async fn run<S: WorkSimulator>(
    sorter: &Arc<UnitSorter<S>>,
    pool: &dyn WorkerPool,
    batch: &Batch,
    ordering: ResultOrdering,
    timeout: Option<Duration>,
) -> Result<Vec<Sequence>, ExecutorError> {
    let total = batch.len();
    let (tx, mut rx) = mpsc::channel(total.max(1));

    let units: Vec<JoinHandle<()>> = batch
        .iter()
        .enumerate()
        .map(|(index, sequence)| {
            pool.submit(make_unit(sorter, index, sequence.clone(), tx.clone()))
        })
        .collect();
    let guard = AbortOnDrop::new(units.iter().map(JoinHandle::abort_handle).collect());

    let supervisor = tokio::spawn(supervise(units, tx).in_current_span());

    let mut collector = Collector::new(total, ordering);
    let expired = match timeout {
        Some(limit) => tokio::time::timeout(limit, collector.drain(&mut rx))
            .await
            .err()
            .map(|_| limit),
        None => {
            collector.drain(&mut rx).await;
            None
        }
    };

    if let Some(limit) = expired {
        warn!(
            completed = collector.completed(),
            total, "batch timed out, cancelling outstanding units"
        );
        guard.abort_all();
        guard.disarm();
        drop(rx);
        settle(supervisor).await;
        return Err(ExecutorError::Timeout {
            timeout: limit,
            completed: collector.completed(),
            total,
        });
    }

    guard.disarm();
    settle(supervisor).await;
    collector.finish()
}

/// Aborts every held unit when dropped, unless disarmed first.
///
/// The handles are detached from the tasks, so aborting a unit that already
/// finished is a no-op.
struct AbortOnDrop {
    handles: Vec<AbortHandle>,
    armed: bool,
}

impl AbortOnDrop {
    fn new(handles: Vec<AbortHandle>) -> Self {
        Self {
            handles,
            armed: true,
        }
    }

    fn abort_all(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }

    /// Called once every unit has settled or been aborted explicitly.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if self.armed {
            debug!(units = self.handles.len(), "batch abandoned, aborting units");
            self.abort_all();
        }
    }
}

fn make_unit<S: WorkSimulator>(
    sorter: &Arc<UnitSorter<S>>,
    index: usize,
    sequence: Sequence,
    tx: mpsc::Sender<UnitReport>,
) -> UnitFuture {
    let sorter = Arc::clone(sorter);
    Box::pin(
        async move {
            let sequence = sorter.sort(sequence).await;
            // A closed receiver means the batch was abandoned.
            let _ = tx.send(UnitReport::Sorted { index, sequence }).await;
        }
        .in_current_span(),
    )
}

/// Waits for every unit to settle, reports failed units, then closes the
/// channel by dropping the last sender.
async fn supervise(units: Vec<JoinHandle<()>>, tx: mpsc::Sender<UnitReport>) {
    let total = units.len();
    let mut failed = 0usize;

    for (index, handle) in units.into_iter().enumerate() {
        if let Err(error) = handle.await {
            failed += 1;
            let failure = describe(error);
            warn!(index, %failure, "unit failed");
            let _ = tx.send(UnitReport::Failed { index, failure }).await;
        }
    }

    debug!(total, failed, "all units settled, closing completion channel");
    drop(tx);
}

async fn settle(supervisor: JoinHandle<()>) {
    if let Err(error) = supervisor.await {
        warn!(%error, "supervisor task did not complete");
    }
}

fn describe(error: JoinError) -> UnitFailure {
    match error.try_into_panic() {
        Ok(payload) => UnitFailure::Panicked {
            message: panic_message(payload.as_ref()),
        },
        Err(_) => UnitFailure::Cancelled,
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Fan-in side: accumulates reports until the channel closes.
#[derive(Debug)]
struct Collector {
    total: usize,
    ordering: ResultOrdering,
    arrived: Vec<Sequence>,
    slots: Vec<Option<Sequence>>,
    failures: Vec<(usize, UnitFailure)>,
    received: usize,
}

impl Collector {
    fn new(total: usize, ordering: ResultOrdering) -> Self {
        let (arrived, slots) = match ordering {
            ResultOrdering::Arrival => (Vec::with_capacity(total), Vec::new()),
            ResultOrdering::Input => (Vec::new(), vec![None; total]),
        };
        Self {
            total,
            ordering,
            arrived,
            slots,
            failures: Vec::new(),
            received: 0,
        }
    }

    async fn drain(&mut self, rx: &mut mpsc::Receiver<UnitReport>) {
        while let Some(report) = rx.recv().await {
            self.accept(report);
        }
    }

    fn accept(&mut self, report: UnitReport) {
        self.received += 1;
        match report {
            UnitReport::Sorted { index, sequence } => match self.ordering {
                ResultOrdering::Arrival => self.arrived.push(sequence),
                ResultOrdering::Input => {
                    if let Some(slot) = self.slots.get_mut(index) {
                        *slot = Some(sequence);
                    }
                }
            },
            UnitReport::Failed { index, failure } => self.failures.push((index, failure)),
        }
    }

    /// Units that reported a sorted sequence so far.
    fn completed(&self) -> usize {
        self.received - self.failures.len()
    }

    fn finish(mut self) -> Result<Vec<Sequence>, ExecutorError> {
        if !self.failures.is_empty() {
            let failed_units = self.failures.len();
            self.failures.sort_by_key(|(index, _)| *index);
            let (index, failure) = self.failures.swap_remove(0);
            return Err(ExecutorError::UnitFailed {
                index,
                failure,
                failed_units,
            });
        }

        let incomplete = ExecutorError::IncompleteBatch {
            expected: self.total,
            received: self.received,
        };
        if self.received != self.total {
            return Err(incomplete);
        }

        match self.ordering {
            ResultOrdering::Arrival => Ok(self.arrived),
            ResultOrdering::Input => self
                .slots
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .ok_or(incomplete),
        }
    }
}

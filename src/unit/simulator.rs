/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Work simulators.
//!
//! A [`WorkSimulator`] is invoked once per unit, after the sequence has been
//! sorted. It decouples the timing contract from any specific delay value:
//! production runs use [`FixedDelay`], tests use [`NoDelay`] or a short
//! delay, and [`FnSimulator`] plugs in arbitrary work.

use std::future::Future;
use std::time::Duration;

/// Delay applied per unit when no other value is configured.
pub const DEFAULT_UNIT_DELAY: Duration = Duration::from_secs(1);

/// Per-unit work run by the [`UnitSorter`](super::UnitSorter).
///
/// Implementations are shared across concurrently running units, so they
/// must be `Send + Sync + 'static`.
pub trait WorkSimulator: Send + Sync + 'static {
    /// Performs one unit of simulated work.
    fn simulate(&self) -> impl Future<Output = ()> + Send;
}

/// Sleeps for a constant duration on every unit.
///
/// # Examples
///
/// ```
/// use batchsort_rs::unit::FixedDelay;
/// use std::time::Duration;
///
/// let delay = FixedDelay::new(Duration::from_millis(10));
/// assert_eq!(delay.delay(), Duration::from_millis(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(Duration);

impl FixedDelay {
    /// Creates a simulator sleeping `delay` per unit.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self(delay)
    }

    /// Returns the configured per-unit delay.
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.0
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_UNIT_DELAY)
    }
}

impl WorkSimulator for FixedDelay {
    fn simulate(&self) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(self.0)
    }
}

/// Simulator that performs no extra work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl WorkSimulator for NoDelay {
    async fn simulate(&self) {}
}

/// Adapts a closure returning a future into a [`WorkSimulator`].
///
/// # Examples
///
/// ```
/// use batchsort_rs::unit::{FnSimulator, UnitSorter};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// # async fn example() {
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = calls.clone();
/// let sorter = UnitSorter::new(FnSimulator::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
///     async {}
/// }));
///
/// sorter.sort(vec![2, 1]).await;
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct FnSimulator<F> {
    work: F,
}

impl<F> FnSimulator<F> {
    /// Wraps `work`, which is called once per unit.
    #[must_use]
    pub fn new(work: F) -> Self {
        Self { work }
    }
}

impl<F> std::fmt::Debug for FnSimulator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSimulator").finish_non_exhaustive()
    }
}

impl<F, Fut> WorkSimulator for FnSimulator<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send,
{
    fn simulate(&self) -> impl Future<Output = ()> + Send {
        (self.work)()
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Unit sorter module.
//!
//! A *unit* is the work of sorting exactly one sequence. The [`UnitSorter`]
//! sorts the sequence and then runs its injected [`WorkSimulator`] once,
//! which stands in for nontrivial per-unit work. The simulator is the same
//! for every execution strategy, so timings stay comparable.
//!
//! # Examples
//!
//! ```
//! use batchsort_rs::unit::{NoDelay, UnitSorter};
//!
//! # async fn example() {
//! let sorter = UnitSorter::new(NoDelay);
//! let sorted = sorter.sort(vec![3, -1, 2, 2]).await;
//! assert_eq!(sorted, vec![-1, 2, 2, 3]);
//! # }
//! ```

pub mod simulator;
pub mod sorter;

#[cfg(test)]
mod tests;

pub use simulator::{DEFAULT_UNIT_DELAY, FixedDelay, FnSimulator, NoDelay, WorkSimulator};
pub use sorter::UnitSorter;

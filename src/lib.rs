/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # batchsort-rs
//!
//! Sorts a batch of integer sequences under two interchangeable execution
//! strategies and reports the wall-clock time taken for the whole batch.
//!
//! - **Sequential**: every sequence is sorted in input order on the caller's
//!   task, one after another.
//! - **Concurrent**: every sequence is dispatched as its own unit of work
//!   (fan-out), each unit reports through a completion channel, and a
//!   collector gathers the results (fan-in) once a supervisor has seen every
//!   unit settle.
//!
//! Both strategies share the same [`UnitSorter`] and the same timing
//! boundary, so their [`ExecutionResult`]s are directly comparable.
//!
//! # Architecture
//!
//! - [`unit`] — the unit sorter and the injected [`WorkSimulator`] that
//!   stands in for per-unit work (a fixed delay by default).
//! - [`executor`] — the [`BatchExecutor`], its strategies, the worker pools
//!   and the error and configuration types.
//! - [`wire`] — the JSON request/response contract used at the service
//!   boundary (`to_sort` in, `sorted_arrays` and `time_ns` out).
//!
//! # Examples
//!
//! ```no_run
//! use batchsort_rs::{BatchExecutor, ExecutorConfig, Strategy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExecutorConfig::default().with_unit_delay(Duration::from_millis(50));
//! let executor = BatchExecutor::new(config);
//!
//! let batch = vec![vec![3, 1, 2], vec![5, 4]];
//! let sequential = executor.run(Strategy::Sequential, &batch).await?;
//! let concurrent = executor.run(Strategy::Concurrent, &batch).await?;
//!
//! assert_eq!(sequential.sorted, vec![vec![1, 2, 3], vec![4, 5]]);
//! assert!(concurrent.elapsed < sequential.elapsed);
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod unit;
pub mod wire;

pub use executor::{
    BatchExecutor, BoundedPool, ExecutionResult, ExecutorConfig, ExecutorError, Strategy,
    UnboundedPool, UnitFailure, WorkerPool,
};
pub use unit::{FixedDelay, FnSimulator, NoDelay, UnitSorter, WorkSimulator};
pub use wire::{SortRequest, SortResponse, WireError};

/// One ordered list of integers to be sorted.
pub type Sequence = Vec<i64>;

/// The full set of sequences submitted in one request.
pub type Batch = [Sequence];

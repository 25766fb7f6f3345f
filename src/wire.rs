/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! JSON request/response contract of the sorting service.
//!
//! The HTTP layer itself lives outside this crate. This module owns the
//! payload shapes and the decode → execute → encode step, so malformed
//! input is rejected before the executor ever sees it.
//!
//! ```text
//! request:  {"to_sort": [[3, 1, 2], [5, 4]]}
//! response: {"sorted_arrays": [[1, 2, 3], [4, 5]], "time_ns": 2002117000}
//! ```

use crate::executor::{BatchExecutor, ExecutionResult, ExecutorError, Strategy};
use crate::unit::WorkSimulator;
use crate::Sequence;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors raised at the service boundary.
#[derive(Debug, Error)]
pub enum WireError {
    /// The request body is not a valid batch.
    #[error("invalid JSON payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// The response could not be encoded.
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// The batch was decoded but its execution failed.
    #[error(transparent)]
    Execution(#[from] ExecutorError),
}

/// Batch submitted by a caller.
///
/// A missing `to_sort` field decodes as an empty batch.
///
/// # Examples
///
/// ```
/// use batchsort_rs::SortRequest;
///
/// let request = SortRequest::from_json(br#"{"to_sort": [[3, 1, 2], [5, 4]]}"#)?;
/// assert_eq!(request.to_sort, vec![vec![3, 1, 2], vec![5, 4]]);
///
/// assert!(SortRequest::from_json(br#"{"to_sort": [["a"]]}"#).is_err());
/// # Ok::<(), batchsort_rs::WireError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    /// Sequences to sort.
    #[serde(default)]
    pub to_sort: Vec<Sequence>,
}

impl SortRequest {
    /// Decodes a request body.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidPayload`] for anything that is not an
    /// object holding arrays of 64-bit integers.
    pub fn from_json(body: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(body).map_err(WireError::InvalidPayload)
    }
}

/// Result returned to a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortResponse {
    /// Sorted sequences, ordered as the strategy guarantees.
    pub sorted_arrays: Vec<Sequence>,

    /// Elapsed batch time in nanoseconds.
    pub time_ns: u64,
}

impl SortResponse {
    /// Encodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(WireError::Encode)
    }
}

impl From<ExecutionResult> for SortResponse {
    fn from(result: ExecutionResult) -> Self {
        let time_ns = result.time_ns();
        Self {
            sorted_arrays: result.into_sorted(),
            time_ns,
        }
    }
}

/// Decodes `body`, runs it under `strategy` and encodes the response.
///
/// # Errors
///
/// - [`WireError::InvalidPayload`] if the body is not a valid batch
/// - [`WireError::Execution`] if the executor fails
/// - [`WireError::Encode`] if the response cannot be encoded
///
/// # Examples
///
/// ```no_run
/// use batchsort_rs::{BatchExecutor, ExecutorConfig, SortResponse, Strategy};
/// use batchsort_rs::wire::process_payload;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = BatchExecutor::new(ExecutorConfig::default());
/// let body = process_payload(&executor, Strategy::Sequential, br#"{"to_sort": [[2, 1]]}"#).await?;
/// let response: SortResponse = serde_json::from_slice(&body)?;
/// assert_eq!(response.sorted_arrays, vec![vec![1, 2]]);
/// # Ok(())
/// # }
/// ```
pub async fn process_payload<S: WorkSimulator>(
    executor: &BatchExecutor<S>,
    strategy: Strategy,
    body: &[u8],
) -> Result<Vec<u8>, WireError> {
    let request = SortRequest::from_json(body).inspect_err(|error| {
        warn!(%error, %strategy, "rejected payload");
    })?;
    let result = executor.run(strategy, &request.to_sort).await?;
    SortResponse::from(result).to_json()
}

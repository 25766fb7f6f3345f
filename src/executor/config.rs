/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Executor configuration.
//!
//! Durations are expressed in milliseconds on the wire
//! (`unit_delay_ms`, `batch_timeout_ms`); every field has a default, so an
//! empty JSON object is a valid configuration.

use crate::unit::DEFAULT_UNIT_DELAY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables of a [`BatchExecutor`](super::BatchExecutor).
///
/// # Examples
///
/// ```
/// use batchsort_rs::ExecutorConfig;
/// use std::time::Duration;
///
/// let config = ExecutorConfig::from_json(r#"{"unit_delay_ms": 250, "max_concurrency": 8}"#)
///     .expect("valid config");
/// assert_eq!(config.unit_delay, Duration::from_millis(250));
/// assert_eq!(config.max_concurrency, Some(8));
/// assert_eq!(config.batch_timeout, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Delay simulated once per unit by the default `FixedDelay` simulator.
    #[serde(rename = "unit_delay_ms", with = "millis")]
    pub unit_delay: Duration,

    /// Maximum units in flight. `None` dispatches one task per unit with no
    /// limit.
    pub max_concurrency: Option<usize>,

    /// Upper bound on a whole batch run. `None` waits indefinitely.
    #[serde(rename = "batch_timeout_ms", with = "optional_millis")]
    pub batch_timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            unit_delay: DEFAULT_UNIT_DELAY,
            max_concurrency: None,
            batch_timeout: None,
        }
    }
}

impl ExecutorConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is not a valid
    /// configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the per-unit delay.
    #[must_use]
    pub fn with_unit_delay(mut self, delay: Duration) -> Self {
        self.unit_delay = delay;
        self
    }

    /// Bounds the number of units in flight. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// Sets the batch timeout.
    #[must_use]
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = Some(timeout);
        self
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}

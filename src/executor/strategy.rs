/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Execution strategy selection.

use super::error::ParseStrategyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a batch is executed.
///
/// # Examples
///
/// ```
/// use batchsort_rs::Strategy;
///
/// assert_eq!("concurrent".parse::<Strategy>().ok(), Some(Strategy::Concurrent));
/// assert_eq!(Strategy::from_route("/process-single"), Some(Strategy::Sequential));
/// assert!(Strategy::Sequential.preserves_order());
/// assert!(!Strategy::Concurrent.preserves_order());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One unit at a time, in input order, on the caller's task.
    Sequential,

    /// One task per unit; results in arrival order.
    Concurrent,

    /// One task per unit; results placed back in input order.
    ConcurrentOrdered,
}

impl Strategy {
    /// All strategies, in declaration order.
    pub const ALL: [Strategy; 3] = [
        Strategy::Sequential,
        Strategy::Concurrent,
        Strategy::ConcurrentOrdered,
    ];

    /// Returns the snake_case name of the strategy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
            Self::ConcurrentOrdered => "concurrent_ordered",
        }
    }

    /// Returns the service route that selects this strategy.
    #[must_use]
    pub fn route(&self) -> &'static str {
        match self {
            Self::Sequential => "/process-single",
            Self::Concurrent => "/process-concurrent",
            Self::ConcurrentOrdered => "/process-concurrent-ordered",
        }
    }

    /// Resolves a service route to its strategy.
    #[must_use]
    pub fn from_route(route: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.route() == route)
    }

    /// Returns `true` if output position matches input position.
    #[inline]
    #[must_use]
    pub fn preserves_order(&self) -> bool {
        !matches!(self, Self::Concurrent)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "single" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            "concurrent_ordered" | "concurrent-ordered" => Ok(Self::ConcurrentOrdered),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

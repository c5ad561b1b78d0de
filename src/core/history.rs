//! Record of committed transitions.
//!
//! Every transition a machine commits is appended here before its
//! post-commit hooks run. The history can be capped, in which case the
//! oldest records are dropped first.

use super::token::Token;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use flying_fsm::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "normal".to_string(),
///     event: "friday".to_string(),
///     to: "pirate".to_string(),
///     probability: 1.0,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "pirate");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: Token, E: Token> {
    /// The state being left
    pub from: S,
    /// The event that caused the move
    pub event: E,
    /// The state entered
    pub to: S,
    /// Declared weight of the selected transition
    pub probability: f64,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, optionally bounded, history of committed transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: Token, E: Token> {
    records: VecDeque<TransitionRecord<S, E>>,
    limit: Option<usize>,
}

impl<S: Token, E: Token> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Token, E: Token> StateHistory<S, E> {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` records.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(64)),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append a record, evicting the oldest ones beyond the limit.
    pub fn record(&mut self, record: TransitionRecord<S, E>) {
        if self.limit == Some(0) {
            return;
        }
        self.records.push_back(record);
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// Get the path of states traversed by the retained records.
    ///
    /// Returns the `from` state of the oldest record, then the `to` state of
    /// each record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flying_fsm::core::{StateHistory, TransitionRecord};
    /// use chrono::Utc;
    ///
    /// let mut history = StateHistory::new();
    /// for (from, to) in [("a", "b"), ("b", "c")] {
    ///     history.record(TransitionRecord {
    ///         from: from.to_string(),
    ///         event: "next".to_string(),
    ///         to: to.to_string(),
    ///         probability: 1.0,
    ///         timestamp: Utc::now(),
    ///     });
    /// }
    ///
    /// assert_eq!(history.get_path(), vec!["a", "b", "c"]);
    /// ```
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|record| &record.to));
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<S, E>> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord<S, E>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

//! Load status shared by the coordinators

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Status of a coordinator's most recent request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Success,
    /// The last request failed; holds a human-readable message
    Error(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    /// Error message, if the last request failed
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Monotonic request counter
///
/// Each issued request takes a new generation; only a completion carrying
/// the latest generation may update state.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    /// Starts a new request and returns its generation
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True if `generation` is the most recently issued one
    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}
